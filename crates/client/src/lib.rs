//! Upstream catalog clients for marquee.
//!
//! This crate provides the two `MovieSource` implementations, OMDb (primary)
//! and TMDB (secondary), their raw payload types and normalizers, and the
//! retry policy and HTTP helpers they share.

pub mod http;
pub mod omdb;
pub mod retry;
pub mod tmdb;

pub use omdb::{OmdbClient, OmdbConfig, OmdbRecord};
pub use retry::RetryPolicy;
pub use tmdb::{TmdbClient, TmdbConfig, TmdbKind, TmdbRecord};

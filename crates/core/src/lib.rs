//! Core types and the aggregation pipeline for marquee.
//!
//! This crate provides:
//! - The canonical `Movie` model and search request/response types
//! - The upstream source trait implemented by the catalog clients
//! - In-memory TTL/LRU result caches
//! - The merge, filter and pagination pipeline behind `AggregationService`
//! - Unified error types and configuration

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod movie;
pub mod source;

pub use aggregate::{AggregationService, ServiceOptions};
pub use cache::{CacheStatus, DetailCache, FilterKey, SearchCache, TtlCache};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use movie::{MediaType, Movie, PagedResult, SearchRequest};
pub use source::{DropReason, MovieSource, NativeQuery, SourceError, SourceTag};

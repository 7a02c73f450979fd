//! MCP tool implementations.
//!
//! This module contains all tools exposed by the marquee server. Each tool is
//! a free function over `AggregationService`, so tests can drive it with
//! in-memory sources.

pub mod cache;
pub mod movie_get;
pub mod movie_search;

pub use movie_get::MovieGetParams;
pub use movie_search::MovieSearchParams;

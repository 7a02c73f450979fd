//! The aggregation pipeline.
//!
//! cache lookup → concurrent upstream fetch → normalize → merge → cache store
//! → filter → sort → paginate.

pub mod filter;
pub mod merge;
pub mod paginate;
pub mod service;

pub use merge::{dedupe_key, merge};
pub use paginate::{Page, paginate, sort_default};
pub use service::{AggregationService, ServiceOptions};

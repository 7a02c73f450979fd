//! In-memory result caches.
//!
//! Two caches sit in front of the upstream sources:
//!
//! - the search cache, keyed by [`FilterKey`], holding the merged and
//!   normalized result of a logical query before filtering and pagination
//! - the detail cache, keyed by external id, holding single records
//!
//! Both are [`TtlCache`] instances: bounded, LRU-evicting, and expiring
//! entries lazily on read.

pub mod key;
pub mod store;

pub use key::FilterKey;
pub use store::{CacheStatus, TtlCache};

use crate::movie::Movie;

/// Merged, pre-filter search results by filter key.
pub type SearchCache = TtlCache<FilterKey, Vec<Movie>>;

/// Single records by external id.
pub type DetailCache = TtlCache<String, Movie>;

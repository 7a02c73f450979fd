//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and emptying the in-memory result caches.

pub mod clear;
pub mod status;

pub use clear::{CacheClearOutput, clear_impl};
pub use status::status_impl;

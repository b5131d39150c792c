//! Utility functions shared across layers.
//!
//! - [`url_extractor`] - URL extraction, normalization and deduplication

pub mod url_extractor;

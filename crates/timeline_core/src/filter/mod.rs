//! Filtering entry points.
//!
//! # Responsibility
//! - Expose the record filter used by every recompute.
//! - Keep control-value normalization inside core.

pub mod record_filter;

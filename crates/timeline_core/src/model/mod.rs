//! Record model for timeline characters and events.
//!
//! # Responsibility
//! - Define the canonical record shapes loaded from the record source.
//! - Own the year-label grammar used for chronological ordering.
//!
//! # Invariants
//! - Records are immutable for the lifetime of a session.
//! - Every event `year` label is parseable by [`year::parse_year`].

pub mod record;
pub mod year;

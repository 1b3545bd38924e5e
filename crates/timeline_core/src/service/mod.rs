//! Use-case services layered over the catalog.
//!
//! # Responsibility
//! - Build detail-view projections for a selected record.
//! - Keep UI/FFI layers decoupled from catalog lookups.

pub mod detail_service;

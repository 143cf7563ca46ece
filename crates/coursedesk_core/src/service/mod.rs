//! Catalog use-case services.
//!
//! # Responsibility
//! - Assemble the four stores around one persistence backend.
//! - Host cross-store behavior (cascading renames, readiness checks) so the
//!   stores stay independent of each other.

pub mod catalog;

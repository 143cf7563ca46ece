//! Catalog domain model.
//!
//! # Responsibility
//! - Define the four record shapes persisted by the catalog stores.
//! - Keep wire naming (`type`, `date`) stable for previously saved slots.
//!
//! # Invariants
//! - Cross-collection references are plain string copies, never handles.
//! - Offerings and registrations are identified by `id`, names by value.

pub mod kind;
pub mod offering;
pub mod record;
pub mod registration;
pub mod validation;

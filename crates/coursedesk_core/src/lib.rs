//! Core domain logic for coursedesk.
//! This crate is the single source of truth for catalog invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod store;

pub use config::{ReferencePolicy, RenamePolicy, StorePolicy};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::kind::{EntityKind, NameKind};
pub use model::offering::Offering;
pub use model::record::RecordId;
pub use model::registration::Registration;
pub use model::validation::ValidationError;
pub use service::catalog::{Catalog, CatalogSummary, Prerequisites};
pub use storage::memory::MemoryKeyValueStore;
pub use storage::sqlite::SqliteKeyValueStore;
pub use storage::{KeyValueStore, StorageError, StorageResult};
pub use store::name_store::{NameChange, NameStore};
pub use store::offering_store::OfferingStore;
pub use store::registration_store::RegistrationStore;
pub use store::{CatalogError, CatalogResult, ErrorCategory};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

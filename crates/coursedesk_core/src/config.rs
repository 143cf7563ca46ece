//! Store behavior policies.
//!
//! # Responsibility
//! - Name the design choices that differ from the permissive legacy
//!   behavior, so callers select them instead of the stores guessing.
//!
//! # Invariants
//! - `Default` is the recommended configuration: by-value references,
//!   colliding renames rejected, upstream references enforced.
//! - `ReferencePolicy::Cascade` always rejects colliding renames.

use serde::{Deserialize, Serialize};

/// How dependents react when a referenced name or pair changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// Dependents keep the string copy they recorded. Renames never cascade.
    #[default]
    ByValue,
    /// Renames rewrite the copies held by offerings and registrations.
    Cascade,
}

/// Whether a rename/update may collide with a different existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenamePolicy {
    #[default]
    RejectCollisions,
    /// Skips the duplicate check on edits, as earlier releases did.
    AllowCollisions,
}

/// Policy bundle handed to every store at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorePolicy {
    pub references: ReferencePolicy,
    pub renames: RenamePolicy,
    /// Offerings must name persisted types/courses; registrations must name
    /// a persisted offering.
    pub require_known_references: bool,
}

impl Default for StorePolicy {
    fn default() -> Self {
        Self {
            references: ReferencePolicy::ByValue,
            renames: RenamePolicy::RejectCollisions,
            require_known_references: true,
        }
    }
}

impl StorePolicy {
    /// Permissive policy matching data written by earlier releases.
    pub fn legacy() -> Self {
        Self {
            references: ReferencePolicy::ByValue,
            renames: RenamePolicy::AllowCollisions,
            require_known_references: false,
        }
    }

    /// Whether edits must be checked against other records.
    pub fn rejects_rename_collisions(&self) -> bool {
        self.references == ReferencePolicy::Cascade
            || self.renames == RenamePolicy::RejectCollisions
    }

    pub fn cascades(&self) -> bool {
        self.references == ReferencePolicy::Cascade
    }
}

#[cfg(test)]
mod tests {
    use super::{ReferencePolicy, RenamePolicy, StorePolicy};

    #[test]
    fn cascade_forces_collision_checks() {
        let policy = StorePolicy {
            references: ReferencePolicy::Cascade,
            renames: RenamePolicy::AllowCollisions,
            require_known_references: false,
        };
        assert!(policy.rejects_rename_collisions());
        assert!(!StorePolicy::legacy().rejects_rename_collisions());
        assert!(StorePolicy::default().rejects_rename_collisions());
    }

    #[test]
    fn policy_deserializes_with_defaults() {
        let policy: StorePolicy = serde_json::from_str(r#"{"references":"cascade"}"#).unwrap();
        assert_eq!(policy.references, ReferencePolicy::Cascade);
        assert_eq!(policy.renames, RenamePolicy::RejectCollisions);
        assert!(policy.require_known_references);
    }
}

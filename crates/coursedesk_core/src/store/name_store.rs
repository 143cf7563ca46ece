//! Course type and course collections.
//!
//! Both collections share one contract and differ only by `NameKind`: the
//! slot they persist to and the offering field that references them.
//!
//! # Invariants
//! - Stored names are trimmed, non-empty and unique case-insensitively.
//! - Renames keep the entry's position.
//! - A name referenced by any persisted offering cannot be deleted.

use crate::config::StorePolicy;
use crate::model::kind::{names_match, normalize_name, EntityKind, NameKind};
use crate::model::offering::Offering;
use crate::model::validation::ValidationError;
use crate::storage::{load_collection, save_collection, KeyValueStore};
use crate::store::{CatalogError, CatalogResult};
use log::{debug, info};

/// Result of a successful rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameChange {
    pub previous: String,
    pub current: String,
}

/// Ordered, write-through collection of names.
pub struct NameStore<'kv, S: KeyValueStore + ?Sized> {
    kv: &'kv S,
    kind: NameKind,
    policy: StorePolicy,
    names: Vec<String>,
}

impl<'kv, S: KeyValueStore + ?Sized> NameStore<'kv, S> {
    /// Loads the collection for `kind` from its slot.
    pub fn open(kv: &'kv S, kind: NameKind, policy: StorePolicy) -> Self {
        let names: Vec<String> = load_collection(kv, kind.slot_key());
        info!(
            "event=store_open module=store status=ok slot={} items={}",
            kind.slot_key(),
            names.len()
        );
        Self {
            kv,
            kind,
            policy,
            names,
        }
    }

    pub fn course_types(kv: &'kv S, policy: StorePolicy) -> Self {
        Self::open(kv, NameKind::CourseType, policy)
    }

    pub fn courses(kv: &'kv S, policy: StorePolicy) -> Self {
        Self::open(kv, NameKind::Course, policy)
    }

    pub fn kind(&self) -> NameKind {
        self.kind
    }

    /// All names in insertion order.
    pub fn list(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of `name`, compared case-insensitively after trimming.
    pub fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.names
            .iter()
            .position(|stored| stored == name)
            .or_else(|| self.names.iter().position(|stored| names_match(stored, name)))
    }

    /// Exact membership, the comparison offerings rely on.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|stored| stored == name)
    }

    /// Appends a new name.
    ///
    /// # Errors
    /// - `Validation(EmptyName)` when the trimmed input is blank.
    /// - `DuplicateName` when the name exists case-insensitively.
    pub fn add(&mut self, name: &str) -> CatalogResult<String> {
        let name = self.validated(name)?;
        if self.names.iter().any(|stored| names_match(stored, &name)) {
            return Err(self.rejected("name_add", CatalogError::DuplicateName {
                kind: self.kind,
                name,
            }));
        }

        self.names.push(name.clone());
        self.persist("name_add");
        Ok(name)
    }

    /// Renames the entry currently called `current` in place.
    ///
    /// Collisions with a different entry are rejected unless the policy
    /// allows them. Renaming an entry onto itself (or changing its case) is
    /// always allowed.
    ///
    /// # Errors
    /// - `NotFound` when `current` does not exist.
    /// - `Validation(EmptyName)` when the trimmed input is blank.
    /// - `DuplicateName` on a rejected collision.
    pub fn rename(&mut self, current: &str, new_name: &str) -> CatalogResult<NameChange> {
        let (index, change) = self.plan_rename(current, new_name)?;
        self.names[index] = change.current.clone();
        self.persist("name_rename");
        Ok(change)
    }

    /// Runs every check of `rename` without mutating anything.
    pub(crate) fn preview_rename(&self, current: &str, new_name: &str) -> CatalogResult<NameChange> {
        self.plan_rename(current, new_name).map(|(_, change)| change)
    }

    /// Removes a name no persisted offering references.
    ///
    /// # Errors
    /// - `NotFound` when `name` does not exist.
    /// - `NameInUse` when an offering still references it.
    pub fn delete(&mut self, name: &str) -> CatalogResult<String> {
        let offerings: Vec<Offering> =
            load_collection(self.kv, EntityKind::Offering.slot_key());
        self.delete_unreferenced(name, &offerings)
    }

    /// Removes a name none of `offerings` references.
    ///
    /// Callers holding the live offering collection pass it here so the
    /// guard does not depend on the last successful save.
    pub(crate) fn delete_unreferenced(
        &mut self,
        name: &str,
        offerings: &[Offering],
    ) -> CatalogResult<String> {
        let index = self.require(name)?;
        let stored = &self.names[index];

        if offerings
            .iter()
            .any(|offering| self.kind.field_of(offering) == stored)
        {
            let err = CatalogError::NameInUse {
                kind: self.kind,
                name: stored.clone(),
            };
            return Err(self.rejected("name_delete", err));
        }

        let removed = self.names.remove(index);
        self.persist("name_delete");
        Ok(removed)
    }

    fn plan_rename(&self, current: &str, new_name: &str) -> CatalogResult<(usize, NameChange)> {
        let index = self.require(current)?;
        let new_name = self.validated(new_name)?;

        if self.policy.rejects_rename_collisions() {
            let collides = self
                .names
                .iter()
                .enumerate()
                .any(|(other, stored)| other != index && names_match(stored, &new_name));
            if collides {
                return Err(self.rejected("name_rename", CatalogError::DuplicateName {
                    kind: self.kind,
                    name: new_name,
                }));
            }
        }

        Ok((
            index,
            NameChange {
                previous: self.names[index].clone(),
                current: new_name,
            },
        ))
    }

    fn validated(&self, raw: &str) -> CatalogResult<String> {
        normalize_name(raw).ok_or(CatalogError::Validation(ValidationError::EmptyName(
            self.kind,
        )))
    }

    fn require(&self, name: &str) -> CatalogResult<usize> {
        self.position(name).ok_or_else(|| CatalogError::NotFound {
            kind: self.kind.entity(),
            key: name.trim().to_string(),
        })
    }

    fn rejected(&self, event: &str, err: CatalogError) -> CatalogError {
        debug!(
            "event={event} module=store status=rejected slot={} reason={}",
            self.kind.slot_key(),
            err.reason()
        );
        err
    }

    fn persist(&self, event: &str) {
        let persisted = save_collection(self.kv, self.kind.slot_key(), &self.names);
        info!(
            "event={event} module=store status=ok slot={} items={} persisted={persisted}",
            self.kind.slot_key(),
            self.names.len()
        );
    }
}

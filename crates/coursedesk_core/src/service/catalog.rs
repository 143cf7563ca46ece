//! Catalog service facade.
//!
//! # Responsibility
//! - Construct every store once per process from an injected backend.
//! - Route mutations to the owning store and apply the reference policy.
//!
//! # Invariants
//! - Under `ReferencePolicy::ByValue` no operation touches more than one
//!   collection.
//! - Under `ReferencePolicy::Cascade` a rename is applied to the owner
//!   first; dependents are rewritten only after it succeeded.
//! - A cascade that would duplicate an offering pair or a registration is
//!   rejected before any collection changes.
//! - Delete guards and known-reference checks read the live sibling
//!   collections, which may be ahead of the slots after a failed save.

use crate::config::StorePolicy;
use crate::model::kind::{EntityKind, NameKind};
use crate::model::offering::Offering;
use crate::model::registration::Registration;
use crate::storage::KeyValueStore;
use crate::store::name_store::{NameChange, NameStore};
use crate::store::offering_store::{KnownNames, OfferingStore};
use crate::store::registration_store::RegistrationStore;
use crate::store::{CatalogError, CatalogResult};
use log::info;
use std::fmt::{Display, Formatter};

/// Whether offerings can be composed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisites {
    Ready,
    MissingCourseTypes,
    MissingCourses,
    MissingBoth,
}

impl Display for Prerequisites {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => write!(f, "Ready to create offerings"),
            Self::MissingCourseTypes => {
                write!(f, "Please add course types before creating offerings")
            }
            Self::MissingCourses => write!(f, "Please add courses before creating offerings"),
            Self::MissingBoth => write!(
                f,
                "Please add course types and courses before creating offerings"
            ),
        }
    }
}

/// Collection sizes at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogSummary {
    pub course_types: usize,
    pub courses: usize,
    pub offerings: usize,
    pub registrations: usize,
}

/// Facade owning the four catalog stores.
pub struct Catalog<'kv, S: KeyValueStore + ?Sized> {
    policy: StorePolicy,
    course_types: NameStore<'kv, S>,
    courses: NameStore<'kv, S>,
    offerings: OfferingStore<'kv, S>,
    registrations: RegistrationStore<'kv, S>,
}

impl<'kv, S: KeyValueStore + ?Sized> Catalog<'kv, S> {
    /// Loads every collection from `kv`.
    pub fn open(kv: &'kv S, policy: StorePolicy) -> Self {
        let catalog = Self {
            policy,
            course_types: NameStore::course_types(kv, policy),
            courses: NameStore::courses(kv, policy),
            offerings: OfferingStore::open(kv, policy),
            registrations: RegistrationStore::open(kv, policy),
        };
        info!(
            "event=catalog_open module=service status=ok references={:?} renames={:?} require_known_references={}",
            policy.references, policy.renames, policy.require_known_references
        );
        catalog
    }

    pub fn policy(&self) -> StorePolicy {
        self.policy
    }

    pub fn course_types(&self) -> &NameStore<'kv, S> {
        &self.course_types
    }

    pub fn courses(&self) -> &NameStore<'kv, S> {
        &self.courses
    }

    pub fn names(&self, kind: NameKind) -> &NameStore<'kv, S> {
        match kind {
            NameKind::CourseType => &self.course_types,
            NameKind::Course => &self.courses,
        }
    }

    pub fn offerings(&self) -> &OfferingStore<'kv, S> {
        &self.offerings
    }

    pub fn registrations(&self) -> &RegistrationStore<'kv, S> {
        &self.registrations
    }

    pub fn add_name(&mut self, kind: NameKind, name: &str) -> CatalogResult<String> {
        self.names_mut(kind).add(name)
    }

    /// Renames a course type or course, cascading when the policy says so.
    ///
    /// Under cascade every dependent rewrite is checked before the first
    /// store changes, so a rejected rename leaves all collections as they
    /// were.
    pub fn rename_name(
        &mut self,
        kind: NameKind,
        current: &str,
        new_name: &str,
    ) -> CatalogResult<NameChange> {
        let planned = self.names(kind).preview_rename(current, new_name)?;
        let cascade = self.policy.cascades() && planned.previous != planned.current;
        if cascade {
            self.offerings
                .check_retarget(kind, &planned.previous, &planned.current)?;
            self.registrations
                .check_retarget_name(kind, &planned.previous, &planned.current)?;
        }

        let change = self.names_mut(kind).rename(current, new_name)?;

        if cascade {
            let offerings =
                self.offerings
                    .retarget_name(kind, &change.previous, &change.current);
            let registrations =
                self.registrations
                    .retarget_name(kind, &change.previous, &change.current);
            info!(
                "event=cascade_rename module=service status=ok slot={} offerings={offerings} registrations={registrations}",
                kind.slot_key()
            );
        }

        Ok(change)
    }

    /// Deletes a name unless a live offering still references it.
    pub fn delete_name(&mut self, kind: NameKind, name: &str) -> CatalogResult<String> {
        let offerings = self.offerings.list();
        let store = match kind {
            NameKind::CourseType => &mut self.course_types,
            NameKind::Course => &mut self.courses,
        };
        store.delete_unreferenced(name, offerings)
    }

    pub fn create_offering(&mut self, course_type: &str, course: &str) -> CatalogResult<Offering> {
        let known = KnownNames {
            course_types: self.course_types.list(),
            courses: self.courses.list(),
        };
        self.offerings.create_known(course_type, course, known)
    }

    /// Updates an offering's pair, moving its registrations under cascade.
    pub fn update_offering(
        &mut self,
        id: &str,
        course_type: &str,
        course: &str,
    ) -> CatalogResult<Offering> {
        let known = KnownNames {
            course_types: self.course_types.list(),
            courses: self.courses.list(),
        };

        let previous = match self.offerings.get(id) {
            Some(previous) if self.policy.cascades() => {
                let previous = previous.clone();
                let planned = self
                    .offerings
                    .preview_update(id, course_type, course, known)?;
                self.registrations
                    .check_retarget_offering(&previous, &planned)?;
                Some(previous)
            }
            _ => None,
        };

        let updated = self
            .offerings
            .update_known(id, course_type, course, known)?;

        if let Some(previous) = previous {
            let registrations = self.registrations.retarget_offering(&previous, &updated);
            info!(
                "event=cascade_offering module=service status=ok id={} registrations={registrations}",
                updated.id
            );
        }

        Ok(updated)
    }

    /// Deletes an offering unless live registrations still use its pair.
    pub fn delete_offering(&mut self, id: &str) -> CatalogResult<Offering> {
        let registrations = self.registrations.list();
        self.offerings.delete_unregistered(id, registrations)
    }

    /// Registers a student for the offering with `offering_id`.
    ///
    /// # Errors
    /// - `Validation(MissingOffering)` when no id is given.
    /// - `NotFound` when the id does not name an offering.
    /// - Every error of `RegistrationStore::register`.
    pub fn register(
        &mut self,
        student: &str,
        offering_id: Option<&str>,
    ) -> CatalogResult<Registration> {
        let offering = match offering_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Some(self.offerings.get(id).ok_or_else(|| {
                CatalogError::NotFound {
                    kind: EntityKind::Offering,
                    key: id.to_string(),
                }
            })?),
            None => None,
        };
        self.registrations
            .register_known(student, offering, self.offerings.list())
    }

    /// Idempotent removal of one registration.
    pub fn unregister(&mut self, id: &str) -> Option<Registration> {
        self.registrations.delete(id)
    }

    /// Students registered for the offering with `offering_id`.
    pub fn registrations_for_offering(&self, offering_id: &str) -> CatalogResult<Vec<&Registration>> {
        let offering = self
            .offerings
            .get(offering_id)
            .ok_or_else(|| CatalogError::NotFound {
                kind: EntityKind::Offering,
                key: offering_id.to_string(),
            })?;
        Ok(self
            .registrations
            .list_by_offering(&offering.course_type, &offering.course))
    }

    pub fn prerequisites(&self) -> Prerequisites {
        match (self.course_types.is_empty(), self.courses.is_empty()) {
            (true, true) => Prerequisites::MissingBoth,
            (true, false) => Prerequisites::MissingCourseTypes,
            (false, true) => Prerequisites::MissingCourses,
            (false, false) => Prerequisites::Ready,
        }
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            course_types: self.course_types.len(),
            courses: self.courses.len(),
            offerings: self.offerings.len(),
            registrations: self.registrations.len(),
        }
    }

    fn names_mut(&mut self, kind: NameKind) -> &mut NameStore<'kv, S> {
        match kind {
            NameKind::CourseType => &mut self.course_types,
            NameKind::Course => &mut self.courses,
        }
    }
}

//! Course offering collection.
//!
//! # Invariants
//! - `(course_type, course)` pairs are unique (edits follow the rename
//!   policy).
//! - With `require_known_references`, both halves of a pair must exist
//!   among the known course types and courses at write time: the live
//!   collections when called through `Catalog`, the persisted slots
//!   otherwise.
//! - An offering whose pair is used by a persisted registration cannot be
//!   deleted.

use crate::config::StorePolicy;
use crate::model::kind::{EntityKind, NameKind};
use crate::model::offering::Offering;
use crate::model::registration::Registration;
use crate::model::validation::ValidationError;
use crate::storage::{load_collection, save_collection, KeyValueStore};
use crate::store::{CatalogError, CatalogResult};
use log::{debug, info};

const SLOT: &str = EntityKind::Offering.slot_key();

/// Course type and course names an offering may point at.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KnownNames<'a> {
    pub course_types: &'a [String],
    pub courses: &'a [String],
}

impl KnownNames<'_> {
    fn ensure(&self, kind: NameKind, name: &str) -> CatalogResult<()> {
        let names = match kind {
            NameKind::CourseType => self.course_types,
            NameKind::Course => self.courses,
        };
        if names.iter().any(|stored| stored == name) {
            Ok(())
        } else {
            Err(CatalogError::UnknownReference {
                kind,
                name: name.to_string(),
            })
        }
    }
}

/// Upstream names read back from their slots, for stores used on their own.
struct PersistedNames {
    course_types: Vec<String>,
    courses: Vec<String>,
}

impl PersistedNames {
    fn load<S: KeyValueStore + ?Sized>(kv: &S) -> Self {
        Self {
            course_types: load_collection(kv, NameKind::CourseType.slot_key()),
            courses: load_collection(kv, NameKind::Course.slot_key()),
        }
    }

    fn known(&self) -> KnownNames<'_> {
        KnownNames {
            course_types: &self.course_types,
            courses: &self.courses,
        }
    }
}

/// Ordered, write-through collection of offerings.
pub struct OfferingStore<'kv, S: KeyValueStore + ?Sized> {
    kv: &'kv S,
    policy: StorePolicy,
    offerings: Vec<Offering>,
}

impl<'kv, S: KeyValueStore + ?Sized> OfferingStore<'kv, S> {
    pub fn open(kv: &'kv S, policy: StorePolicy) -> Self {
        let offerings: Vec<Offering> = load_collection(kv, SLOT);
        info!(
            "event=store_open module=store status=ok slot={SLOT} items={}",
            offerings.len()
        );
        Self {
            kv,
            policy,
            offerings,
        }
    }

    pub fn list(&self) -> &[Offering] {
        &self.offerings
    }

    pub fn len(&self) -> usize {
        self.offerings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offerings.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Offering> {
        self.offerings.iter().find(|offering| offering.id == id)
    }

    /// Finds the offering for an exact pair.
    pub fn find(&self, course_type: &str, course: &str) -> Option<&Offering> {
        self.offerings
            .iter()
            .find(|offering| offering.matches(course_type, course))
    }

    /// Offerings of one course type; an empty filter returns all.
    pub fn list_by_type(&self, course_type: &str) -> Vec<&Offering> {
        self.offerings
            .iter()
            .filter(|offering| course_type.is_empty() || offering.course_type == course_type)
            .collect()
    }

    /// Creates and appends a new offering.
    ///
    /// # Errors
    /// - `Validation(MissingType | MissingCourse)` on empty inputs.
    /// - `UnknownReference` when a half of the pair is not persisted.
    /// - `DuplicateOffering` when the pair already exists.
    pub fn create(&mut self, course_type: &str, course: &str) -> CatalogResult<Offering> {
        let upstream = PersistedNames::load(self.kv);
        self.create_known(course_type, course, upstream.known())
    }

    /// `create` checked against caller-supplied upstream names.
    pub(crate) fn create_known(
        &mut self,
        course_type: &str,
        course: &str,
        known: KnownNames<'_>,
    ) -> CatalogResult<Offering> {
        let (course_type, course) = self
            .validated_pair(course_type, course, known)
            .map_err(|err| self.rejected("offering_create", err))?;

        if self.find(&course_type, &course).is_some() {
            return Err(self.rejected(
                "offering_create",
                CatalogError::DuplicateOffering {
                    course_type,
                    course,
                },
            ));
        }

        let offering = Offering::new(course_type, course);
        self.offerings.push(offering.clone());
        self.persist("offering_create", &offering.id);
        Ok(offering)
    }

    /// Re-points an existing offering at a new pair, keeping `id` and date.
    ///
    /// # Errors
    /// - `NotFound` for an unknown id.
    /// - The validation, reference and duplicate errors of `create`.
    pub fn update(&mut self, id: &str, course_type: &str, course: &str) -> CatalogResult<Offering> {
        let upstream = PersistedNames::load(self.kv);
        self.update_known(id, course_type, course, upstream.known())
    }

    /// `update` checked against caller-supplied upstream names.
    pub(crate) fn update_known(
        &mut self,
        id: &str,
        course_type: &str,
        course: &str,
        known: KnownNames<'_>,
    ) -> CatalogResult<Offering> {
        let (index, updated) = self.plan_update(id, course_type, course, known)?;
        self.offerings[index] = updated.clone();
        self.persist("offering_update", &updated.id);
        Ok(updated)
    }

    /// Runs every check of `update` and returns the would-be record.
    pub(crate) fn preview_update(
        &self,
        id: &str,
        course_type: &str,
        course: &str,
        known: KnownNames<'_>,
    ) -> CatalogResult<Offering> {
        self.plan_update(id, course_type, course, known)
            .map(|(_, updated)| updated)
    }

    /// Removes an offering no persisted registration refers to.
    ///
    /// # Errors
    /// - `NotFound` for an unknown id.
    /// - `OfferingInUse` while registrations match the pair.
    pub fn delete(&mut self, id: &str) -> CatalogResult<Offering> {
        let registrations: Vec<Registration> =
            load_collection(self.kv, EntityKind::Registration.slot_key());
        self.delete_unregistered(id, &registrations)
    }

    /// Removes an offering none of `registrations` refers to.
    pub(crate) fn delete_unregistered(
        &mut self,
        id: &str,
        registrations: &[Registration],
    ) -> CatalogResult<Offering> {
        let index = self.require(id)?;
        let target = &self.offerings[index];

        if registrations
            .iter()
            .any(|registration| registration.matches_offering(&target.course_type, &target.course))
        {
            let err = CatalogError::OfferingInUse {
                course_type: target.course_type.clone(),
                course: target.course.clone(),
            };
            return Err(self.rejected("offering_delete", err));
        }

        let removed = self.offerings.remove(index);
        self.persist("offering_delete", &removed.id);
        Ok(removed)
    }

    /// Fails when rewriting `kind` fields from `from` to `to` would leave two
    /// offerings with the same pair.
    pub(crate) fn check_retarget(&self, kind: NameKind, from: &str, to: &str) -> CatalogResult<()> {
        let pairs: Vec<(&str, &str, bool)> = self
            .offerings
            .iter()
            .map(|offering| {
                let (course_type, course) = (offering.course_type.as_str(), offering.course.as_str());
                match kind {
                    NameKind::CourseType if course_type == from => (to, course, true),
                    NameKind::Course if course == from => (course_type, to, true),
                    _ => (course_type, course, false),
                }
            })
            .collect();

        let collision = pairs.iter().enumerate().find(|(index, (course_type, course, moved))| {
            *moved
                && pairs.iter().enumerate().any(|(other, (other_type, other_course, _))| {
                    other != *index && other_type == course_type && other_course == course
                })
        });

        match collision {
            Some((_, (course_type, course, _))) => Err(self.rejected(
                "offering_cascade",
                CatalogError::DuplicateOffering {
                    course_type: course_type.to_string(),
                    course: course.to_string(),
                },
            )),
            None => Ok(()),
        }
    }

    /// Rewrites every offering field of `kind` equal to `from`.
    ///
    /// Used by the cascade reference policy; returns the number of rewrites.
    pub(crate) fn retarget_name(&mut self, kind: NameKind, from: &str, to: &str) -> usize {
        let mut changed = 0;
        for offering in &mut self.offerings {
            let field = match kind {
                NameKind::CourseType => &mut offering.course_type,
                NameKind::Course => &mut offering.course,
            };
            if *field == from {
                *field = to.to_string();
                changed += 1;
            }
        }
        if changed > 0 {
            self.persist("offering_cascade", "-");
        }
        changed
    }

    fn plan_update(
        &self,
        id: &str,
        course_type: &str,
        course: &str,
        known: KnownNames<'_>,
    ) -> CatalogResult<(usize, Offering)> {
        let index = self.require(id)?;
        let (course_type, course) = self
            .validated_pair(course_type, course, known)
            .map_err(|err| self.rejected("offering_update", err))?;

        if self.policy.rejects_rename_collisions() {
            let collides = self.offerings.iter().enumerate().any(|(other, offering)| {
                other != index && offering.matches(&course_type, &course)
            });
            if collides {
                return Err(self.rejected(
                    "offering_update",
                    CatalogError::DuplicateOffering {
                        course_type,
                        course,
                    },
                ));
            }
        }

        let mut updated = self.offerings[index].clone();
        updated.course_type = course_type;
        updated.course = course;
        Ok((index, updated))
    }

    fn validated_pair(
        &self,
        course_type: &str,
        course: &str,
        known: KnownNames<'_>,
    ) -> CatalogResult<(String, String)> {
        let course_type = course_type.trim();
        let course = course.trim();
        if course_type.is_empty() {
            return Err(ValidationError::MissingType.into());
        }
        if course.is_empty() {
            return Err(ValidationError::MissingCourse.into());
        }
        if self.policy.require_known_references {
            known.ensure(NameKind::CourseType, course_type)?;
            known.ensure(NameKind::Course, course)?;
        }
        Ok((course_type.to_string(), course.to_string()))
    }

    fn require(&self, id: &str) -> CatalogResult<usize> {
        self.offerings
            .iter()
            .position(|offering| offering.id == id)
            .ok_or_else(|| CatalogError::NotFound {
                kind: EntityKind::Offering,
                key: id.to_string(),
            })
    }

    fn rejected(&self, event: &str, err: CatalogError) -> CatalogError {
        debug!(
            "event={event} module=store status=rejected slot={SLOT} reason={}",
            err.reason()
        );
        err
    }

    fn persist(&self, event: &str, id: &str) {
        let persisted = save_collection(self.kv, SLOT, &self.offerings);
        info!(
            "event={event} module=store status=ok slot={SLOT} id={id} items={} persisted={persisted}",
            self.offerings.len()
        );
    }
}

//! Student registration collection.
//!
//! # Invariants
//! - `(student lowercased, course_type, course)` is unique.
//! - Registrations copy the offering pair; there is no live foreign key.
//! - Delete is idempotent by id.

use crate::config::StorePolicy;
use crate::model::kind::{names_match, normalize_name, EntityKind, NameKind};
use crate::model::offering::Offering;
use crate::model::registration::Registration;
use crate::model::validation::ValidationError;
use crate::storage::{load_collection, save_collection, KeyValueStore};
use crate::store::{CatalogError, CatalogResult};
use log::{debug, info};

const SLOT: &str = EntityKind::Registration.slot_key();

/// Ordered, write-through collection of registrations.
pub struct RegistrationStore<'kv, S: KeyValueStore + ?Sized> {
    kv: &'kv S,
    policy: StorePolicy,
    registrations: Vec<Registration>,
}

impl<'kv, S: KeyValueStore + ?Sized> RegistrationStore<'kv, S> {
    pub fn open(kv: &'kv S, policy: StorePolicy) -> Self {
        let registrations: Vec<Registration> = load_collection(kv, SLOT);
        info!(
            "event=store_open module=store status=ok slot={SLOT} items={}",
            registrations.len()
        );
        Self {
            kv,
            policy,
            registrations,
        }
    }

    pub fn list(&self) -> &[Registration] {
        &self.registrations
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Registration> {
        self.registrations
            .iter()
            .find(|registration| registration.id == id)
    }

    /// Who is registered for the exact `(course_type, course)` pair.
    pub fn list_by_offering(&self, course_type: &str, course: &str) -> Vec<&Registration> {
        self.registrations
            .iter()
            .filter(|registration| registration.matches_offering(course_type, course))
            .collect()
    }

    /// Registrations of one course type; an empty filter returns all.
    pub fn list_by_type(&self, course_type: &str) -> Vec<&Registration> {
        self.registrations
            .iter()
            .filter(|registration| {
                course_type.is_empty() || registration.course_type == course_type
            })
            .collect()
    }

    /// Registers `student` for `offering`.
    ///
    /// # Errors
    /// - `Validation(MissingStudent)` when the trimmed name is blank.
    /// - `Validation(MissingOffering)` when no offering is given.
    /// - `UnknownOffering` when the offering is no longer persisted.
    /// - `DuplicateRegistration` when the student already holds the pair.
    pub fn register(
        &mut self,
        student: &str,
        offering: Option<&Offering>,
    ) -> CatalogResult<Registration> {
        let offerings: Vec<Offering> = load_collection(self.kv, EntityKind::Offering.slot_key());
        self.register_known(student, offering, &offerings)
    }

    /// `register` checked against a caller-supplied offering collection.
    pub(crate) fn register_known(
        &mut self,
        student: &str,
        offering: Option<&Offering>,
        offerings: &[Offering],
    ) -> CatalogResult<Registration> {
        let student = normalize_name(student).ok_or_else(|| {
            self.rejected("registration_create", ValidationError::MissingStudent.into())
        })?;
        let offering = offering.ok_or_else(|| {
            self.rejected("registration_create", ValidationError::MissingOffering.into())
        })?;

        if self.policy.require_known_references
            && !offerings
                .iter()
                .any(|stored| stored.matches(&offering.course_type, &offering.course))
        {
            return Err(self.rejected(
                "registration_create",
                CatalogError::UnknownOffering {
                    course_type: offering.course_type.clone(),
                    course: offering.course.clone(),
                },
            ));
        }

        if self.registrations.iter().any(|registration| {
            registration.is_enrollment_of(&student, &offering.course_type, &offering.course)
        }) {
            return Err(self.rejected(
                "registration_create",
                CatalogError::DuplicateRegistration {
                    student,
                    course_type: offering.course_type.clone(),
                    course: offering.course.clone(),
                },
            ));
        }

        let registration = Registration::for_offering(student, offering);
        self.registrations.push(registration.clone());
        self.persist("registration_create", &registration.id);
        Ok(registration)
    }

    /// Removes the registration with `id`, if any.
    ///
    /// An unknown id is not an error; the slot is still rewritten.
    pub fn delete(&mut self, id: &str) -> Option<Registration> {
        let index = self
            .registrations
            .iter()
            .position(|registration| registration.id == id);
        let removed = index.map(|index| self.registrations.remove(index));
        self.persist("registration_delete", id);
        removed
    }

    /// Fails when rewriting `kind` fields from `from` to `to` would enroll a
    /// student twice in the same pair.
    pub(crate) fn check_retarget_name(
        &self,
        kind: NameKind,
        from: &str,
        to: &str,
    ) -> CatalogResult<()> {
        self.check_moves(|registration| {
            let (course_type, course) = (
                registration.course_type.as_str(),
                registration.course.as_str(),
            );
            match kind {
                NameKind::CourseType if course_type == from => Some((to, course)),
                NameKind::Course if course == from => Some((course_type, to)),
                _ => None,
            }
        })
    }

    /// Fails when moving the registrations of `previous` onto `current`
    /// would enroll a student twice in the same pair.
    pub(crate) fn check_retarget_offering(
        &self,
        previous: &Offering,
        current: &Offering,
    ) -> CatalogResult<()> {
        self.check_moves(|registration| {
            registration
                .matches_offering(&previous.course_type, &previous.course)
                .then_some((current.course_type.as_str(), current.course.as_str()))
        })
    }

    /// Rewrites the `kind` field of every registration equal to `from`.
    pub(crate) fn retarget_name(&mut self, kind: NameKind, from: &str, to: &str) -> usize {
        let mut changed = 0;
        for registration in &mut self.registrations {
            let field = match kind {
                NameKind::CourseType => &mut registration.course_type,
                NameKind::Course => &mut registration.course,
            };
            if *field == from {
                *field = to.to_string();
                changed += 1;
            }
        }
        if changed > 0 {
            self.persist("registration_cascade", "-");
        }
        changed
    }

    /// Moves every registration of `previous` onto `current`.
    pub(crate) fn retarget_offering(&mut self, previous: &Offering, current: &Offering) -> usize {
        let mut changed = 0;
        for registration in &mut self.registrations {
            if registration.matches_offering(&previous.course_type, &previous.course) {
                registration.course_type = current.course_type.clone();
                registration.course = current.course.clone();
                changed += 1;
            }
        }
        if changed > 0 {
            self.persist("registration_cascade", &current.id);
        }
        changed
    }

    /// `moved` returns the new pair of a registration that would be
    /// rewritten, `None` for one that stays.
    fn check_moves<'a, F>(&'a self, moved: F) -> CatalogResult<()>
    where
        F: Fn(&'a Registration) -> Option<(&'a str, &'a str)>,
    {
        let triples: Vec<(&str, &str, &str, bool)> = self
            .registrations
            .iter()
            .map(|registration| match moved(registration) {
                Some((course_type, course)) => {
                    (registration.student.as_str(), course_type, course, true)
                }
                None => (
                    registration.student.as_str(),
                    registration.course_type.as_str(),
                    registration.course.as_str(),
                    false,
                ),
            })
            .collect();

        for (index, (student, course_type, course, was_moved)) in triples.iter().enumerate() {
            if !*was_moved {
                continue;
            }
            let collides = triples.iter().enumerate().any(
                |(other, (other_student, other_type, other_course, _))| {
                    other != index
                        && other_type == course_type
                        && other_course == course
                        && names_match(other_student, student)
                },
            );
            if collides {
                return Err(self.rejected(
                    "registration_cascade",
                    CatalogError::DuplicateRegistration {
                        student: student.to_string(),
                        course_type: course_type.to_string(),
                        course: course.to_string(),
                    },
                ));
            }
        }
        Ok(())
    }

    fn rejected(&self, event: &str, err: CatalogError) -> CatalogError {
        debug!(
            "event={event} module=store status=rejected slot={SLOT} reason={}",
            err.reason()
        );
        err
    }

    fn persist(&self, event: &str, id: &str) {
        let persisted = save_collection(self.kv, SLOT, &self.registrations);
        info!(
            "event={event} module=store status=ok slot={SLOT} id={id} items={} persisted={persisted}",
            self.registrations.len()
        );
    }
}

//! Collection stores and their shared error type.
//!
//! # Responsibility
//! - Own one collection each, cached in memory and written through to its
//!   slot after every successful mutation.
//! - Enforce uniqueness and referential-integrity guards before mutating.
//!
//! # Invariants
//! - A failing operation leaves the collection and its slot unchanged.
//! - Stores see each other only by reading persisted slots.
//! - Collections keep insertion order; nothing is re-sorted.

use crate::model::kind::{EntityKind, NameKind};
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod name_store;
pub mod offering_store;
pub mod registration_store;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Coarse error family, useful for callers that only branch on the kind of
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Duplicate,
    ReferentialIntegrity,
    NotFound,
}

/// Recoverable failure of a catalog operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Validation(ValidationError),
    DuplicateName {
        kind: NameKind,
        name: String,
    },
    DuplicateOffering {
        course_type: String,
        course: String,
    },
    DuplicateRegistration {
        student: String,
        course_type: String,
        course: String,
    },
    /// Delete blocked: offerings still reference the name.
    NameInUse {
        kind: NameKind,
        name: String,
    },
    /// Delete blocked: registrations still reference the pair.
    OfferingInUse {
        course_type: String,
        course: String,
    },
    NotFound {
        kind: EntityKind,
        key: String,
    },
    /// Offering names a type or course that is not persisted.
    UnknownReference {
        kind: NameKind,
        name: String,
    },
    /// Registration names an offering that is not persisted.
    UnknownOffering {
        course_type: String,
        course: String,
    },
}

impl CatalogError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::DuplicateName { .. }
            | Self::DuplicateOffering { .. }
            | Self::DuplicateRegistration { .. } => ErrorCategory::Duplicate,
            Self::NameInUse { .. }
            | Self::OfferingInUse { .. }
            | Self::UnknownReference { .. }
            | Self::UnknownOffering { .. } => ErrorCategory::ReferentialIntegrity,
            Self::NotFound { .. } => ErrorCategory::NotFound,
        }
    }

    /// Short machine-friendly reason for log lines.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::DuplicateName { .. }
            | Self::DuplicateOffering { .. }
            | Self::DuplicateRegistration { .. } => "duplicate",
            Self::NameInUse { .. } | Self::OfferingInUse { .. } => "in_use",
            Self::NotFound { .. } => "not_found",
            Self::UnknownReference { .. } | Self::UnknownOffering { .. } => "unknown_reference",
        }
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateName { kind, name } => {
                write!(f, "{} \"{name}\" already exists", capitalized(*kind))
            }
            Self::DuplicateOffering {
                course_type,
                course,
            } => write!(
                f,
                "The combination \"{course_type} - {course}\" already exists."
            ),
            Self::DuplicateRegistration {
                student,
                course_type,
                course,
            } => write!(
                f,
                "{student} is already registered for {course_type} - {course}"
            ),
            Self::NameInUse { name, .. } => write!(
                f,
                "Cannot delete \"{name}\" as it's being used in course offerings."
            ),
            Self::OfferingInUse { .. } => {
                write!(f, "Cannot delete this offering. It has registered students.")
            }
            Self::NotFound { kind, key } => write!(f, "{kind} not found: {key}"),
            Self::UnknownReference { kind, name } => {
                write!(f, "{} \"{name}\" does not exist", capitalized(*kind))
            }
            Self::UnknownOffering {
                course_type,
                course,
            } => write!(
                f,
                "Invalid course offering selected: {course_type} - {course}"
            ),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for CatalogError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

fn capitalized(kind: NameKind) -> &'static str {
    match kind {
        NameKind::CourseType => "Course type",
        NameKind::Course => "Course",
    }
}

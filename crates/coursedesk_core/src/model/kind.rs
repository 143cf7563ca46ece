//! Entity kinds shared by stores, errors and persistence slots.

use crate::model::offering::Offering;
use std::fmt::{Display, Formatter};

/// Every collection managed by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    CourseType,
    Course,
    Offering,
    Registration,
}

impl EntityKind {
    /// Human-readable singular label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::CourseType => "course type",
            Self::Course => "course",
            Self::Offering => "offering",
            Self::Registration => "registration",
        }
    }

    /// Persistence slot holding this collection.
    ///
    /// Keys match the slots written by earlier releases and must not change.
    pub const fn slot_key(self) -> &'static str {
        match self {
            Self::CourseType => "courseTypes",
            Self::Course => "courses",
            Self::Offering => "courseOfferings",
            Self::Registration => "registrations",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The two flat name collections an offering points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    CourseType,
    Course,
}

impl NameKind {
    pub fn entity(self) -> EntityKind {
        match self {
            Self::CourseType => EntityKind::CourseType,
            Self::Course => EntityKind::Course,
        }
    }

    pub fn slot_key(self) -> &'static str {
        self.entity().slot_key()
    }

    /// Returns the offering field that stores a name of this kind.
    pub fn field_of(self, offering: &Offering) -> &str {
        match self {
            Self::CourseType => offering.course_type.as_str(),
            Self::Course => offering.course.as_str(),
        }
    }
}

impl Display for NameKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.entity().label())
    }
}

/// Trims user input and rejects blank values.
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Case-insensitive name comparison used by every uniqueness check.
pub fn names_match(left: &str, right: &str) -> bool {
    left == right || left.to_lowercase() == right.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{names_match, normalize_name, EntityKind, NameKind};

    #[test]
    fn normalize_name_trims_and_rejects_blank() {
        assert_eq!(normalize_name("  Group \t").as_deref(), Some("Group"));
        assert_eq!(normalize_name("   "), None);
        assert_eq!(normalize_name(""), None);
    }

    #[test]
    fn names_match_ignores_case() {
        assert!(names_match("Maths", "mATHS"));
        assert!(names_match("Émile", "émile"));
        assert!(!names_match("Maths", "Math"));
    }

    #[test]
    fn slot_keys_are_stable() {
        assert_eq!(NameKind::CourseType.slot_key(), "courseTypes");
        assert_eq!(NameKind::Course.slot_key(), "courses");
        assert_eq!(EntityKind::Offering.slot_key(), "courseOfferings");
        assert_eq!(EntityKind::Registration.slot_key(), "registrations");
    }
}

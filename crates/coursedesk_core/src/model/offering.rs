//! Course offering record.
//!
//! # Invariants
//! - `(course_type, course)` is unique across the offering collection.
//! - `id` never changes once assigned, including across updates.

use crate::model::record::{display_date, new_record_id, RecordId};
use serde::{Deserialize, Serialize};

/// A concrete (course type, course) combination students can register for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    pub id: RecordId,
    /// Serialized as `type` to match the persisted slot shape.
    #[serde(rename = "type")]
    pub course_type: String,
    pub course: String,
    /// Display date of creation, serialized as `date`.
    #[serde(rename = "date")]
    pub created_at: String,
}

impl Offering {
    /// Creates an offering with a generated id and today's date.
    pub fn new(course_type: impl Into<String>, course: impl Into<String>) -> Self {
        Self {
            id: new_record_id(),
            course_type: course_type.into(),
            course: course.into(),
            created_at: display_date(),
        }
    }

    /// Exact pair comparison, the identity used by registrations.
    pub fn matches(&self, course_type: &str, course: &str) -> bool {
        self.course_type == course_type && self.course == course
    }

    /// `"<type> - <course>"`, the label shown to users.
    pub fn label(&self) -> String {
        format!("{} - {}", self.course_type, self.course)
    }
}

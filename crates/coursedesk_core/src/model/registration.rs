//! Student registration record.
//!
//! # Invariants
//! - `course_type`/`course` are copies taken at registration time.
//! - `(student lowercased, course_type, course)` is unique.

use crate::model::kind::names_match;
use crate::model::offering::Offering;
use crate::model::record::{display_date, new_record_id, RecordId};
use serde::{Deserialize, Serialize};

/// One student registered for one offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RecordId,
    pub student: String,
    #[serde(rename = "type")]
    pub course_type: String,
    pub course: String,
    #[serde(rename = "date")]
    pub created_at: String,
}

impl Registration {
    /// Registers `student` by copying the offering's pair by value.
    pub fn for_offering(student: impl Into<String>, offering: &Offering) -> Self {
        Self {
            id: new_record_id(),
            student: student.into(),
            course_type: offering.course_type.clone(),
            course: offering.course.clone(),
            created_at: display_date(),
        }
    }

    pub fn matches_offering(&self, course_type: &str, course: &str) -> bool {
        self.course_type == course_type && self.course == course
    }

    /// True when this registration already enrolls `student` in the pair.
    pub fn is_enrollment_of(&self, student: &str, course_type: &str, course: &str) -> bool {
        self.matches_offering(course_type, course) && names_match(&self.student, student)
    }
}

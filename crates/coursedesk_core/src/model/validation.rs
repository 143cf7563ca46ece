//! Input validation failures.

use crate::model::kind::NameKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A required input was empty or missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Name input is blank after trim.
    EmptyName(NameKind),
    MissingType,
    MissingCourse,
    MissingStudent,
    MissingOffering,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName(NameKind::CourseType) => write!(f, "Please enter a course type"),
            Self::EmptyName(NameKind::Course) => write!(f, "Please enter a course name"),
            Self::MissingType => write!(f, "Please select a course type"),
            Self::MissingCourse => write!(f, "Please select a course"),
            Self::MissingStudent => write!(f, "Please enter a student name"),
            Self::MissingOffering => write!(f, "Please select a course offering"),
        }
    }
}

impl Error for ValidationError {}

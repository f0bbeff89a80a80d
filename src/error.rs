use thiserror::Error;

use crate::model::CourseStatus;

/// Local, recoverable input problems. Nothing changes when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no lessons defined, generate or add at least one lesson")]
    NoLessons,

    #[error("test item question is required")]
    EmptyQuestion,

    #[error("test item answer is required")]
    EmptyAnswer,

    #[error("course status cannot move back from {from} to {to}")]
    StatusRegression { from: CourseStatus, to: CourseStatus },
}

/// Failures addressing an entity inside the course collection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CourseError {
    #[error("lesson '{lesson_id}' not found")]
    LessonNotFound { lesson_id: String },

    #[error("course '{course_id}' not found")]
    CourseNotFound { course_id: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CourseError {
    pub(crate) fn lesson_not_found(lesson_id: &str) -> Self {
        CourseError::LessonNotFound {
            lesson_id: lesson_id.to_string(),
        }
    }

    pub(crate) fn course_not_found(course_id: &str) -> Self {
        CourseError::CourseNotFound {
            course_id: course_id.to_string(),
        }
    }
}

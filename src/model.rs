mod assessment;
mod course;
mod lesson;

use thiserror::Error;

pub use assessment::{BloomLevel, TestItem, TestItemType, TestSet, TestVersion, VersionType};
pub use course::{total_duration_of, Course, CourseHeader, CourseStatus};
pub use lesson::{
    CheckOnLearning, EnablingObjective, ExerciseType, InstructionalMethod, LearningStepActivity,
    Lesson, PracticalExercise, Slide, Tlo,
};

/// A label that does not name any variant of a closed vocabulary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{label}'")]
pub struct UnknownLabel {
    kind: &'static str,
    label: String,
}

impl UnknownLabel {
    pub(crate) fn new(kind: &'static str, label: &str) -> Self {
        Self {
            kind,
            label: label.to_string(),
        }
    }
}

//! Read-only document views derived from a [`Course`].
//!
//! Every renderer is a pure fold over the course hierarchy. Optional values
//! that have not been authored yet are rendered as [`NOT_YET_DEFINED`] so the
//! shape of a document never depends on how complete the course is.

mod lesson_plan;
mod markdown;
mod poi;
mod slides;
mod tsp;

use serde::Serialize;

use crate::model::{
    CheckOnLearning, EnablingObjective, LearningStepActivity, PracticalExercise, Tlo,
};

pub use lesson_plan::{render_lesson_plan, Introduction, LessonPlan, LessonPlanHeader, Resources};
pub use markdown::ToMarkdown;
pub use poi::{render_poi, PoiLesson, PoiOutline};
pub use slides::{render_slides, SlideBlock, SlideDeck};
pub use tsp::{
    option_label, render_tsp, split_script, Cover, ExerciseEntry, LabeledOption, LessonScript,
    RenderedItem, ScriptSegment, TestBlock, TrainingSupportPackage,
};

pub const NOT_YET_DEFINED: &str = "Not yet defined";

/// An optional section of a document: either its content or the placeholder.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Slot<T> {
    Defined(T),
    Undefined(&'static str),
}

impl<T> Slot<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Slot::Defined(v),
            None => Slot::Undefined(NOT_YET_DEFINED),
        }
    }

    pub fn defined(&self) -> Option<&T> {
        match self {
            Slot::Defined(v) => Some(v),
            Slot::Undefined(_) => None,
        }
    }
}

/// Text of an optional field, or the placeholder when absent or blank.
pub(crate) fn text_or_placeholder(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_YET_DEFINED)
        .to_string()
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TloBlock {
    pub action: String,
    pub condition: String,
    pub standard: String,
}

impl TloBlock {
    pub(crate) fn from_tlo(tlo: Option<&Tlo>) -> Self {
        Self {
            action: text_or_placeholder(tlo.map(|t| t.action.as_str())),
            condition: text_or_placeholder(tlo.map(|t| t.condition.as_str())),
            standard: text_or_placeholder(tlo.map(|t| t.standard.as_str())),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ExerciseBlock {
    pub title: String,
    pub exercise_type: String,
    pub description: String,
    pub steps: Vec<String>,
    pub scoring_criteria: Vec<String>,
}

impl From<&PracticalExercise> for ExerciseBlock {
    fn from(pe: &PracticalExercise) -> Self {
        Self {
            title: pe.title.clone(),
            exercise_type: pe.exercise_type.as_str().to_string(),
            description: text_or_placeholder(Some(&pe.description)),
            steps: pe.steps.clone(),
            scoring_criteria: pe.scoring_criteria.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CheckBlock {
    pub question: String,
    pub answer: String,
    pub remediation: String,
}

impl From<&CheckOnLearning> for CheckBlock {
    fn from(check: &CheckOnLearning) -> Self {
        Self {
            question: check.question.clone(),
            answer: check.answer.clone(),
            remediation: text_or_placeholder(check.remediation.as_deref()),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ActivityBlock {
    pub title: String,
    pub method: String,
    pub time_minutes: u32,
    pub description: String,
    pub guidance: String,
    pub practical_exercise: Slot<ExerciseBlock>,
    pub check_on_learning: Slot<CheckBlock>,
}

impl From<&LearningStepActivity> for ActivityBlock {
    fn from(lsa: &LearningStepActivity) -> Self {
        Self {
            title: lsa.title.clone(),
            method: lsa.method.as_str().to_string(),
            time_minutes: lsa.time_minutes,
            description: text_or_placeholder(Some(&lsa.description)),
            guidance: text_or_placeholder(lsa.guidance.as_deref()),
            practical_exercise: Slot::from_option(
                lsa.practical_exercise.as_ref().map(ExerciseBlock::from),
            ),
            check_on_learning: Slot::from_option(
                lsa.check_on_learning.as_ref().map(CheckBlock::from),
            ),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ObjectiveBlock {
    pub id: String,
    pub title: String,
    pub activities: Vec<ActivityBlock>,
}

impl From<&EnablingObjective> for ObjectiveBlock {
    fn from(elo: &EnablingObjective) -> Self {
        Self {
            id: elo.id.clone(),
            title: elo.title.clone(),
            activities: elo
                .learning_step_activities
                .iter()
                .map(ActivityBlock::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_placeholder() {
        assert_eq!(text_or_placeholder(None), NOT_YET_DEFINED);
        assert_eq!(text_or_placeholder(Some("   ")), NOT_YET_DEFINED);
        assert_eq!(text_or_placeholder(Some(" 1:16 ")), "1:16");
    }

    #[test]
    fn missing_tlo_renders_every_part_as_placeholder() {
        let block = TloBlock::from_tlo(None);
        assert_eq!(block.action, NOT_YET_DEFINED);
        assert_eq!(block.condition, NOT_YET_DEFINED);
        assert_eq!(block.standard, NOT_YET_DEFINED);
    }

    #[test]
    fn undefined_slot_serializes_as_placeholder() {
        let slot: Slot<CheckBlock> = Slot::from_option(None);
        assert_eq!(serde_json::to_value(&slot).unwrap(), NOT_YET_DEFINED);
        assert!(slot.defined().is_none());
    }
}

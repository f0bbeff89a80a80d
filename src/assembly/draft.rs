use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{EnablingObjective, LearningStepActivity, Lesson, TestSet, Tlo};

pub const DEFAULT_LESSON_TITLE: &str = "New Lesson";
pub const DEFAULT_LESSON_HOURS: u32 = 1;

/// Opaque identifier for courses, lessons, objectives and test items.
pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Identifiers already used within one collection. A blank or repeated
/// candidate is replaced with a [`fresh_id`].
#[derive(Debug, Default)]
pub(crate) struct IdClaims {
    seen: HashSet<String>,
}

impl IdClaims {
    pub(crate) fn claim(&mut self, candidate: Option<String>) -> String {
        let id = non_blank(candidate)
            .filter(|id| !self.seen.contains(id))
            .unwrap_or_else(fresh_id);
        self.seen.insert(id.clone());
        id
    }
}

/// Field overrides for [`create_draft_lesson`]; `None` keeps the default.
#[derive(Debug, Clone, Default)]
pub struct LessonDraft {
    pub id: Option<String>,
    pub title: Option<String>,
    pub duration_hours: Option<u32>,
    pub tlo: Option<Tlo>,
    pub elos: Option<Vec<EnablingObjective>>,
}

pub fn create_draft_lesson(overrides: LessonDraft) -> Lesson {
    Lesson {
        id: overrides.id.unwrap_or_else(fresh_id),
        title: overrides
            .title
            .unwrap_or_else(|| DEFAULT_LESSON_TITLE.to_string()),
        duration_hours: overrides.duration_hours.unwrap_or(DEFAULT_LESSON_HOURS),
        tlo: overrides.tlo,
        elos: overrides.elos.unwrap_or_default(),
        slides: None,
        script: None,
        regulations: None,
        scope: None,
        prerequisites: None,
        instructor_qualifications: None,
        safety_considerations: None,
        summary: None,
        media: None,
        ratio: None,
        tests: TestSet::default(),
    }
}

/// An enabling objective as it arrives from generation or manual entry,
/// before it has been given an identifier.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EloSkeleton {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub learning_step_activities: Vec<LearningStepActivity>,
}

impl EloSkeleton {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub(crate) fn into_objective(self, claims: &mut IdClaims) -> EnablingObjective {
        EnablingObjective {
            id: claims.claim(self.id),
            title: self.title,
            learning_step_activities: self.learning_step_activities,
        }
    }
}

/// Objectives for one lesson, with ids distinct within that lesson.
pub(crate) fn objectives_from(elos: Vec<EloSkeleton>) -> Vec<EnablingObjective> {
    let mut claims = IdClaims::default();
    elos.into_iter()
        .map(|elo| elo.into_objective(&mut claims))
        .collect()
}

impl From<EnablingObjective> for EloSkeleton {
    fn from(elo: EnablingObjective) -> Self {
        Self {
            id: Some(elo.id),
            title: elo.title,
            learning_step_activities: elo.learning_step_activities,
        }
    }
}

/// A partial lesson: what the wizard holds before the course exists.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonSkeleton {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub duration_hours: u32,
    #[serde(default)]
    pub tlo: Option<Tlo>,
    #[serde(default)]
    pub elos: Vec<EloSkeleton>,
}

impl LessonSkeleton {
    pub(crate) fn into_lesson(self, claims: &mut IdClaims) -> Lesson {
        create_draft_lesson(LessonDraft {
            id: Some(claims.claim(self.id)),
            title: Some(self.title),
            duration_hours: Some(self.duration_hours),
            tlo: self.tlo,
            elos: Some(objectives_from(self.elos)),
        })
    }
}

impl From<Lesson> for LessonSkeleton {
    fn from(lesson: Lesson) -> Self {
        Self {
            id: Some(lesson.id),
            title: lesson.title,
            duration_hours: lesson.duration_hours,
            tlo: lesson.tlo,
            elos: lesson.elos.into_iter().map(EloSkeleton::from).collect(),
        }
    }
}

fn non_blank(id: Option<String>) -> Option<String> {
    id.filter(|id| !id.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_lesson_defaults() {
        let lesson = create_draft_lesson(LessonDraft::default());
        assert_eq!(lesson.title, "New Lesson");
        assert_eq!(lesson.duration_hours, 1);
        assert!(lesson.elos.is_empty());
        assert!(lesson.tlo.is_none());
        assert!(!lesson.id.is_empty());
    }

    #[test]
    fn draft_lessons_get_distinct_ids() {
        let a = create_draft_lesson(LessonDraft::default());
        let b = create_draft_lesson(LessonDraft::default());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn skeleton_fills_missing_and_blank_ids() {
        let skeleton = LessonSkeleton {
            id: Some("  ".into()),
            title: "Map Reading".into(),
            duration_hours: 2,
            tlo: None,
            elos: vec![
                EloSkeleton {
                    id: Some("E1".into()),
                    ..EloSkeleton::titled("Orient a map")
                },
                EloSkeleton::titled("Measure distance"),
            ],
        };
        let lesson = skeleton.into_lesson(&mut IdClaims::default());
        assert!(!lesson.id.trim().is_empty());
        assert_eq!(lesson.elos[0].id, "E1");
        assert!(!lesson.elos[1].id.is_empty());
        assert_eq!(lesson.elos[1].title, "Measure distance");
    }

    #[test]
    fn repeated_ids_are_replaced() {
        let mut claims = IdClaims::default();
        assert_eq!(claims.claim(Some("L1".into())), "L1");
        let second = claims.claim(Some("L1".into()));
        assert_ne!(second, "L1");
        assert!(!second.is_empty());
        assert_eq!(claims.claim(Some("L2".into())), "L2");

        let objectives = objectives_from(vec![
            EloSkeleton {
                id: Some("E1".into()),
                ..EloSkeleton::titled("Orient a map")
            },
            EloSkeleton {
                id: Some("E1".into()),
                ..EloSkeleton::titled("Measure distance")
            },
        ]);
        assert_eq!(objectives[0].id, "E1");
        assert_ne!(objectives[1].id, "E1");
    }
}

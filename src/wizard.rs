//! The course-creation wizard: Analysis, then Design, then a finalized course.
//!
//! Transitions are plain method calls so the flow can be driven and tested
//! without any interface attached. Every generation point has a manual-entry
//! fallback, and a failed generation leaves the wizard exactly as it was.

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    assembly::{
        create_draft_lesson, merge_generated_skeleton, CourseForm, CourseSkeleton, EloSkeleton,
        LessonDraft, LessonSkeleton,
    },
    error::ValidationError,
    gateway::{CourseStructureRequest, Gateway, GenerationError, Transport},
    model::{Course, Tlo},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    Analysis,
    Design,
    Finalized,
}

impl fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WizardPhase::Analysis => "Analysis",
            WizardPhase::Design => "Design",
            WizardPhase::Finalized => "Finalized",
        })
    }
}

#[derive(Error, Debug)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("cannot {action} during the {phase} phase")]
    InvalidTransition {
        phase: WizardPhase,
        action: &'static str,
    },

    #[error("course structure generation is already in progress")]
    Busy,

    #[error("lesson {index} does not exist")]
    NoSuchLesson { index: usize },

    #[error("objective {index} does not exist")]
    NoSuchObjective { index: usize },

    #[error("course structure generation failed: {0}")]
    Generation(#[from] GenerationError),
}

/// Edits to a wizard lesson; `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct LessonPatch {
    pub title: Option<String>,
    pub duration_hours: Option<u32>,
    pub tlo: Option<Tlo>,
}

#[derive(Debug, Clone)]
pub struct Wizard {
    phase: WizardPhase,
    form: CourseForm,
    outline: CourseSkeleton,
    generating: bool,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(CourseForm::default())
    }
}

impl Wizard {
    pub fn new(form: CourseForm) -> Self {
        Self {
            phase: WizardPhase::Analysis,
            form,
            outline: CourseSkeleton::default(),
            generating: false,
        }
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn form(&self) -> &CourseForm {
        &self.form
    }

    pub fn lessons(&self) -> &[LessonSkeleton] {
        &self.outline.lessons
    }

    pub fn references(&self) -> &[String] {
        &self.outline.references
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Sum of the hours of the lessons defined so far.
    pub fn running_total(&self) -> u32 {
        self.outline
            .lessons
            .iter()
            .fold(0u32, |total, l| total.saturating_add(l.duration_hours))
    }

    fn ensure_open(&self, action: &'static str) -> Result<(), WizardError> {
        if self.phase == WizardPhase::Finalized {
            return Err(WizardError::InvalidTransition {
                phase: self.phase,
                action,
            });
        }
        Ok(())
    }

    fn ensure_phase(&self, phase: WizardPhase, action: &'static str) -> Result<(), WizardError> {
        if self.phase != phase {
            return Err(WizardError::InvalidTransition {
                phase: self.phase,
                action,
            });
        }
        Ok(())
    }

    pub fn form_mut(&mut self) -> Result<&mut CourseForm, WizardError> {
        self.ensure_open("edit the analysis form")?;
        Ok(&mut self.form)
    }

    pub fn set_reference_material(&mut self, text: impl Into<String>) -> Result<(), WizardError> {
        let text = text.into();
        self.form_mut()?.reference_material = (!text.trim().is_empty()).then_some(text);
        Ok(())
    }

    /// Analysis moves to Design unconditionally; Design finalizes and
    /// returns the new course.
    pub fn next(&mut self) -> Result<Option<Course>, WizardError> {
        match self.phase {
            WizardPhase::Analysis => {
                self.phase = WizardPhase::Design;
                info!(phase = %self.phase, "wizard advanced");
                Ok(None)
            }
            WizardPhase::Design => self.finalize().map(Some),
            WizardPhase::Finalized => Err(WizardError::InvalidTransition {
                phase: self.phase,
                action: "advance",
            }),
        }
    }

    /// Design back to Analysis, keeping every lesson entered so far.
    pub fn back(&mut self) -> Result<(), WizardError> {
        self.ensure_phase(WizardPhase::Design, "go back")?;
        self.phase = WizardPhase::Analysis;
        info!(phase = %self.phase, "wizard went back");
        Ok(())
    }

    /// Closes the wizard with a draft course. An empty lesson list is
    /// rejected and the wizard stays in Design.
    pub fn finalize(&mut self) -> Result<Course, WizardError> {
        self.ensure_phase(WizardPhase::Design, "finalize")?;
        let course = merge_generated_skeleton(&self.form, self.outline.clone())?;
        self.phase = WizardPhase::Finalized;
        info!(
            course_id = %course.id,
            lessons = course.lessons().len(),
            total_duration = course.total_duration(),
            "wizard finalized course"
        );
        Ok(course)
    }

    /// Marks structure generation as in flight and returns the request to send.
    pub fn begin_generation(&mut self) -> Result<CourseStructureRequest, WizardError> {
        self.ensure_phase(WizardPhase::Design, "generate the course structure")?;
        if self.generating {
            return Err(WizardError::Busy);
        }
        self.generating = true;
        Ok(CourseStructureRequest::from(&self.form))
    }

    /// Applies the outcome of a structure request. A generated outline replaces
    /// the current lessons wholesale; a failure leaves them untouched.
    pub fn complete_generation(
        &mut self,
        outcome: Result<CourseSkeleton, GenerationError>,
    ) -> Result<usize, WizardError> {
        self.generating = false;
        let skeleton = match outcome {
            Ok(skeleton) => skeleton,
            Err(e) => {
                warn!(error = %e, "course structure generation failed, keeping current lessons");
                return Err(e.into());
            }
        };
        if let Err(e) = self.ensure_open("adopt a generated structure") {
            warn!("discarding course structure that arrived after finalize");
            return Err(e);
        }
        let count = skeleton.lessons.len();
        self.outline = skeleton;
        info!(lessons = count, total = self.running_total(), "adopted generated course structure");
        Ok(count)
    }

    pub fn generate_architecture<T: Transport>(
        &mut self,
        gateway: &Gateway<T>,
    ) -> Result<usize, WizardError> {
        let request = self.begin_generation()?;
        let outcome = gateway.course_structure(&request);
        self.complete_generation(outcome)
    }

    pub fn add_manual_lesson(&mut self, overrides: LessonDraft) -> Result<&LessonSkeleton, WizardError> {
        self.ensure_open("add a lesson")?;
        let lessons = &mut self.outline.lessons;
        lessons.push(create_draft_lesson(overrides).into());
        Ok(&lessons[lessons.len() - 1])
    }

    fn lesson_mut(&mut self, index: usize) -> Result<&mut LessonSkeleton, WizardError> {
        self.ensure_open("edit a lesson")?;
        self.outline
            .lessons
            .get_mut(index)
            .ok_or(WizardError::NoSuchLesson { index })
    }

    pub fn update_lesson(&mut self, index: usize, patch: LessonPatch) -> Result<(), WizardError> {
        let lesson = self.lesson_mut(index)?;
        if let Some(title) = patch.title {
            lesson.title = title;
        }
        if let Some(hours) = patch.duration_hours {
            lesson.duration_hours = hours;
        }
        if patch.tlo.is_some() {
            lesson.tlo = patch.tlo;
        }
        Ok(())
    }

    pub fn remove_lesson(&mut self, index: usize) -> Result<LessonSkeleton, WizardError> {
        self.lesson_mut(index)?;
        Ok(self.outline.lessons.remove(index))
    }

    pub fn add_objective(&mut self, lesson_index: usize, title: impl Into<String>) -> Result<(), WizardError> {
        self.lesson_mut(lesson_index)?
            .elos
            .push(EloSkeleton::titled(title));
        Ok(())
    }

    pub fn update_objective(
        &mut self,
        lesson_index: usize,
        objective_index: usize,
        title: impl Into<String>,
    ) -> Result<(), WizardError> {
        let elo = self
            .lesson_mut(lesson_index)?
            .elos
            .get_mut(objective_index)
            .ok_or(WizardError::NoSuchObjective {
                index: objective_index,
            })?;
        elo.title = title.into();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CourseStatus;

    fn manual(hours: u32) -> LessonDraft {
        LessonDraft {
            duration_hours: Some(hours),
            ..Default::default()
        }
    }

    #[test]
    fn analysis_advances_without_validation() {
        let mut wizard = Wizard::default();
        assert_eq!(wizard.next().unwrap(), None);
        assert_eq!(wizard.phase(), WizardPhase::Design);
    }

    #[test]
    fn empty_design_cannot_finalize() {
        let mut wizard = Wizard::default();
        wizard.next().unwrap();
        let err = wizard.next().unwrap_err();
        assert!(matches!(
            err,
            WizardError::Validation(ValidationError::NoLessons)
        ));
        assert_eq!(wizard.phase(), WizardPhase::Design);
    }

    #[test]
    fn back_keeps_lessons() {
        let mut wizard = Wizard::default();
        wizard.next().unwrap();
        wizard.add_manual_lesson(manual(3)).unwrap();
        wizard.back().unwrap();
        assert_eq!(wizard.phase(), WizardPhase::Analysis);
        assert_eq!(wizard.lessons().len(), 1);
        assert!(wizard.back().is_err());
    }

    #[test]
    fn manual_editing_and_finalize() {
        let mut wizard = Wizard::default();
        wizard.next().unwrap();
        wizard.add_manual_lesson(manual(1)).unwrap();
        wizard.add_manual_lesson(manual(5)).unwrap();
        wizard.add_manual_lesson(manual(9)).unwrap();
        wizard
            .update_lesson(
                0,
                LessonPatch {
                    title: Some("Intro".into()),
                    duration_hours: Some(2),
                    ..Default::default()
                },
            )
            .unwrap();
        wizard.add_objective(0, "Describe the course").unwrap();
        wizard.update_objective(0, 0, "Describe the POI").unwrap();
        wizard.remove_lesson(2).unwrap();
        assert!(matches!(
            wizard.remove_lesson(7).unwrap_err(),
            WizardError::NoSuchLesson { index: 7 }
        ));
        assert_eq!(wizard.running_total(), 7);

        let course = wizard.next().unwrap().unwrap();
        assert_eq!(wizard.phase(), WizardPhase::Finalized);
        assert_eq!(course.total_duration(), 7);
        assert_eq!(course.status, CourseStatus::Draft);
        assert_eq!(course.lessons()[0].title, "Intro");
        assert_eq!(course.lessons()[0].elos[0].title, "Describe the POI");
        assert!(!course.lessons()[0].elos[0].id.is_empty());

        assert!(matches!(
            wizard.add_manual_lesson(manual(1)).unwrap_err(),
            WizardError::InvalidTransition { .. }
        ));
        assert!(wizard.next().is_err());
    }

    #[test]
    fn generation_only_in_design_and_not_twice() {
        let mut wizard = Wizard::default();
        assert!(matches!(
            wizard.begin_generation().unwrap_err(),
            WizardError::InvalidTransition { .. }
        ));
        wizard.next().unwrap();
        let request = wizard.begin_generation().unwrap();
        assert_eq!(request.mos, "27D");
        assert!(wizard.is_generating());
        assert!(matches!(wizard.begin_generation().unwrap_err(), WizardError::Busy));
    }

    #[test]
    fn failed_generation_keeps_lessons() {
        let mut wizard = Wizard::default();
        wizard.next().unwrap();
        wizard.add_manual_lesson(manual(2)).unwrap();
        wizard.begin_generation().unwrap();
        let err = wizard
            .complete_generation(Err(GenerationError::EmptyResponse))
            .unwrap_err();
        assert!(matches!(err, WizardError::Generation(_)));
        assert!(!wizard.is_generating());
        assert_eq!(wizard.lessons().len(), 1);
        assert_eq!(wizard.phase(), WizardPhase::Design);
    }

    #[test]
    fn generated_outline_replaces_manual_lessons() {
        let mut wizard = Wizard::default();
        wizard.next().unwrap();
        wizard.add_manual_lesson(manual(2)).unwrap();
        wizard.begin_generation().unwrap();
        let skeleton = CourseSkeleton {
            references: vec!["AR 27-10".into()],
            ..CourseSkeleton::from_lessons(vec![
                create_draft_lesson(manual(4)).into(),
                create_draft_lesson(manual(4)).into(),
            ])
        };
        assert_eq!(wizard.complete_generation(Ok(skeleton)).unwrap(), 2);
        assert_eq!(wizard.running_total(), 8);
        assert_eq!(wizard.references(), ["AR 27-10".to_string()]);
    }

    #[test]
    fn blank_reference_material_is_cleared() {
        let mut wizard = Wizard::default();
        wizard.set_reference_material("Doctrine text").unwrap();
        assert_eq!(wizard.form().reference_material.as_deref(), Some("Doctrine text"));
        wizard.set_reference_material("  ").unwrap();
        assert!(wizard.form().reference_material.is_none());
    }
}

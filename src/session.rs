//! Owned application state: the course collection, in-flight generation
//! flags and an explicit load/flush lifecycle around a [`CourseStore`].
//!
//! Generation is split into `begin_*` (mark pending, build the request) and
//! `complete_*` (clear the flag, merge or report). Responses are keyed by
//! course and lesson id, so they can complete in any order.

use std::{collections::HashSet, fmt};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    assembly::{
        append_test_item, apply_tlo_suggestion, merge_course_tests, merge_lesson_content,
        update_lesson_script, LessonContent, TloSuggestion,
    },
    error::CourseError,
    gateway::{
        CourseTestsRequest, Gateway, GenerationError, LessonDetailRequest, Transport,
    },
    model::{Course, CourseStatus, TestItem, TestSet, VersionType},
    store::{CourseStore, StoreError},
};

/// A generation request that has been sent and not yet answered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PendingAction {
    LessonContent { course_id: String, lesson_id: String },
    CourseTests { course_id: String },
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingAction::LessonContent { lesson_id, .. } => {
                write!(f, "content generation for lesson '{lesson_id}'")
            }
            PendingAction::CourseTests { course_id } => {
                write!(f, "test generation for course '{course_id}'")
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{0} is already in progress")]
    Busy(PendingAction),

    #[error(transparent)]
    Course(#[from] CourseError),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One dashboard row.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub mos: String,
    pub lesson_count: usize,
    pub total_duration: u32,
    pub status: CourseStatus,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.clone(),
            title: course.title.clone(),
            mos: course.mos.clone(),
            lesson_count: course.lessons().len(),
            total_duration: course.total_duration(),
            status: course.status,
        }
    }
}

pub struct Session<S: CourseStore> {
    store: S,
    courses: Vec<Course>,
    pending: HashSet<PendingAction>,
    dirty: bool,
}

impl<S: CourseStore> Session<S> {
    pub fn load(store: S) -> Result<Self, SessionError> {
        let courses = store.load()?;
        info!(courses = courses.len(), "session loaded");
        Ok(Self {
            store,
            courses,
            pending: HashSet::new(),
            dirty: false,
        })
    }

    /// Writes the whole collection if anything changed since the last flush.
    /// Returns whether a write happened.
    pub fn flush(&mut self) -> Result<bool, SessionError> {
        if !self.dirty {
            return Ok(false);
        }
        self.store.save(&self.courses)?;
        self.dirty = false;
        info!(courses = self.courses.len(), "session flushed");
        Ok(true)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    fn require(&self, course_id: &str) -> Result<&Course, CourseError> {
        self.course(course_id)
            .ok_or_else(|| CourseError::course_not_found(course_id))
    }

    pub fn summaries(&self) -> Vec<CourseSummary> {
        self.courses.iter().map(CourseSummary::from).collect()
    }

    pub fn count_with_status(&self, status: CourseStatus) -> usize {
        self.courses.iter().filter(|c| c.status == status).count()
    }

    pub fn add_course(&mut self, course: Course) {
        info!(course_id = %course.id, title = %course.title, "course added");
        self.courses.push(course);
        self.dirty = true;
    }

    /// Swaps in a new value for the course with the same id.
    pub fn replace_course(&mut self, course: Course) -> Result<(), SessionError> {
        let slot = self
            .courses
            .iter_mut()
            .find(|c| c.id == course.id)
            .ok_or_else(|| CourseError::course_not_found(&course.id))?;
        *slot = course;
        self.dirty = true;
        Ok(())
    }

    fn update<F>(&mut self, course_id: &str, f: F) -> Result<(), SessionError>
    where
        F: FnOnce(&Course) -> Result<Course, CourseError>,
    {
        let next = f(self.require(course_id)?)?;
        self.replace_course(next)
    }

    pub fn is_pending(&self, action: &PendingAction) -> bool {
        self.pending.contains(action)
    }

    fn mark_pending(&mut self, action: PendingAction) -> Result<(), SessionError> {
        if self.pending.contains(&action) {
            return Err(SessionError::Busy(action));
        }
        self.pending.insert(action);
        Ok(())
    }

    pub fn begin_lesson_content(
        &mut self,
        course_id: &str,
        lesson_id: &str,
    ) -> Result<LessonDetailRequest, SessionError> {
        let course = self.require(course_id)?;
        let lesson = course
            .lesson(lesson_id)
            .ok_or_else(|| CourseError::lesson_not_found(lesson_id))?;
        let request = LessonDetailRequest {
            course_title: course.title.clone(),
            lesson: lesson.clone(),
            reference_material: course.reference_material.clone(),
        };
        self.mark_pending(PendingAction::LessonContent {
            course_id: course_id.to_string(),
            lesson_id: lesson_id.to_string(),
        })?;
        Ok(request)
    }

    /// Merges generated lesson detail into the lesson it was requested for.
    /// On any failure the course is left exactly as it was.
    pub fn complete_lesson_content(
        &mut self,
        course_id: &str,
        lesson_id: &str,
        outcome: Result<LessonContent, GenerationError>,
    ) -> Result<(), SessionError> {
        self.pending.remove(&PendingAction::LessonContent {
            course_id: course_id.to_string(),
            lesson_id: lesson_id.to_string(),
        });
        let content = outcome.map_err(|e| {
            warn!(course_id, lesson_id, error = %e, "lesson content generation failed");
            e
        })?;
        self.update(course_id, |course| merge_lesson_content(course, lesson_id, content))
            .map_err(|e| {
                warn!(course_id, lesson_id, error = %e, "discarding generated lesson content");
                e
            })?;
        info!(course_id, lesson_id, "lesson developed");
        Ok(())
    }

    pub fn develop_lesson<T: Transport>(
        &mut self,
        gateway: &Gateway<T>,
        course_id: &str,
        lesson_id: &str,
    ) -> Result<(), SessionError> {
        let request = self.begin_lesson_content(course_id, lesson_id)?;
        let outcome = gateway.lesson_detail(&request);
        self.complete_lesson_content(course_id, lesson_id, outcome)
    }

    pub fn begin_course_tests(&mut self, course_id: &str) -> Result<CourseTestsRequest, SessionError> {
        let course = self.require(course_id)?.clone();
        self.mark_pending(PendingAction::CourseTests {
            course_id: course_id.to_string(),
        })?;
        Ok(CourseTestsRequest { course })
    }

    /// Replaces the course-level test triple wholesale with a generated one.
    pub fn complete_course_tests(
        &mut self,
        course_id: &str,
        outcome: Result<TestSet, GenerationError>,
    ) -> Result<(), SessionError> {
        self.pending.remove(&PendingAction::CourseTests {
            course_id: course_id.to_string(),
        });
        let tests = outcome.map_err(|e| {
            warn!(course_id, error = %e, "test generation failed");
            e
        })?;
        let items = tests.item_count();
        self.update(course_id, |course| Ok(merge_course_tests(course, tests)))
            .map_err(|e| {
                warn!(course_id, error = %e, "discarding generated tests");
                e
            })?;
        info!(course_id, items, "course tests replaced");
        Ok(())
    }

    pub fn generate_tests<T: Transport>(
        &mut self,
        gateway: &Gateway<T>,
        course_id: &str,
    ) -> Result<(), SessionError> {
        let request = self.begin_course_tests(course_id)?;
        let outcome = gateway.course_tests(&request);
        self.complete_course_tests(course_id, outcome)
    }

    /// Adds a manually written item to a course-level test, or to a lesson's
    /// test when `lesson_id` is given.
    pub fn add_test_item(
        &mut self,
        course_id: &str,
        lesson_id: Option<&str>,
        version: VersionType,
        item: TestItem,
    ) -> Result<(), SessionError> {
        self.update(course_id, |course| {
            append_test_item(course, lesson_id, version, item)
        })
    }

    pub fn update_lesson_script(
        &mut self,
        course_id: &str,
        lesson_id: &str,
        script: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.update(course_id, |course| {
            update_lesson_script(course, lesson_id, script)
        })
    }

    pub fn apply_tlo_suggestion(
        &mut self,
        course_id: &str,
        suggestion: &TloSuggestion,
    ) -> Result<(), SessionError> {
        self.update(course_id, |course| apply_tlo_suggestion(course, suggestion))
    }

    pub fn promote(&mut self, course_id: &str, to: CourseStatus) -> Result<(), SessionError> {
        self.update(course_id, |course| {
            let mut next = course.clone();
            next.promote(to)?;
            Ok(next)
        })?;
        info!(course_id, status = %to, "course promoted");
        Ok(())
    }
}

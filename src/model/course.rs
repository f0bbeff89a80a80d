use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{assessment::TestSet, lesson::Lesson};
use crate::error::{CourseError, ValidationError};

/// Accreditation lifecycle; promotion only ever moves forward.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum CourseStatus {
    #[default]
    Draft,
    Validated,
    Accredited,
}

impl fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CourseStatus::Draft => "Draft",
            CourseStatus::Validated => "Validated",
            CourseStatus::Accredited => "Accredited",
        })
    }
}

/// Root aggregate of a training package.
///
/// `lessons` and `total_duration` are private so that the duration total is
/// recomputed by every operation that touches the lesson set. Deserializing a
/// course recomputes the total as well, whatever the stored value says.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", from = "CourseRecord")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub mos: String,
    pub audience: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
    total_duration: u32,
    lessons: Vec<Lesson>,
    pub course_tests: TestSet,
    pub references: Vec<String>,
    pub status: CourseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_material: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Course metadata without the lesson set, used to build a [`Course`].
#[derive(Debug, Clone, PartialEq)]
pub struct CourseHeader {
    pub id: String,
    pub title: String,
    pub mos: String,
    pub audience: String,
    pub description: String,
    pub course_number: Option<String>,
    pub school_name: Option<String>,
    pub references: Vec<String>,
    pub reference_material: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Course {
    pub fn new(header: CourseHeader, lessons: Vec<Lesson>) -> Self {
        let mut course = Self {
            id: header.id,
            title: header.title,
            mos: header.mos,
            audience: header.audience,
            description: header.description,
            course_number: header.course_number,
            school_name: header.school_name,
            total_duration: 0,
            lessons,
            course_tests: TestSet::default(),
            references: header.references,
            status: CourseStatus::Draft,
            reference_material: header.reference_material,
            created_at: header.created_at,
        };
        course.recompute_total_duration();
        course
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == lesson_id)
    }

    /// 1-based position of a lesson in the instructional sequence.
    pub fn lesson_number(&self, lesson_id: &str) -> Option<usize> {
        self.lessons
            .iter()
            .position(|l| l.id == lesson_id)
            .map(|idx| idx + 1)
    }

    pub fn total_duration(&self) -> u32 {
        self.total_duration
    }

    pub fn push_lesson(&mut self, lesson: Lesson) {
        self.lessons.push(lesson);
        self.recompute_total_duration();
    }

    pub fn remove_lesson(&mut self, lesson_id: &str) -> Result<Lesson, CourseError> {
        let idx = self
            .lessons
            .iter()
            .position(|l| l.id == lesson_id)
            .ok_or_else(|| CourseError::lesson_not_found(lesson_id))?;
        let removed = self.lessons.remove(idx);
        self.recompute_total_duration();
        Ok(removed)
    }

    pub fn set_lesson_duration(&mut self, lesson_id: &str, hours: u32) -> Result<(), CourseError> {
        self.update_lesson(lesson_id, |lesson| lesson.duration_hours = hours)
    }

    /// Runs `f` against one lesson, then refreshes the duration total.
    pub fn update_lesson<F>(&mut self, lesson_id: &str, f: F) -> Result<(), CourseError>
    where
        F: FnOnce(&mut Lesson),
    {
        let lesson = self
            .lessons
            .iter_mut()
            .find(|l| l.id == lesson_id)
            .ok_or_else(|| CourseError::lesson_not_found(lesson_id))?;
        f(lesson);
        self.recompute_total_duration();
        Ok(())
    }

    /// Moves the lifecycle status forward. Promoting to the current status is a no-op.
    pub fn promote(&mut self, to: CourseStatus) -> Result<(), ValidationError> {
        if to < self.status {
            return Err(ValidationError::StatusRegression {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    fn recompute_total_duration(&mut self) {
        self.total_duration = total_duration_of(&self.lessons);
    }
}

/// Sum of lesson hours; the only source of a course's total duration.
/// Saturates at `u32::MAX` rather than overflowing.
pub fn total_duration_of(lessons: &[Lesson]) -> u32 {
    lessons
        .iter()
        .fold(0u32, |total, l| total.saturating_add(l.duration_hours))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseRecord {
    id: String,
    title: String,
    mos: String,
    #[serde(default)]
    audience: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    course_number: Option<String>,
    #[serde(default)]
    school_name: Option<String>,
    #[serde(default)]
    lessons: Vec<Lesson>,
    #[serde(default)]
    course_tests: TestSet,
    #[serde(default)]
    references: Vec<String>,
    #[serde(default)]
    status: CourseStatus,
    #[serde(default)]
    reference_material: Option<String>,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
}

impl From<CourseRecord> for Course {
    fn from(record: CourseRecord) -> Self {
        let mut course = Course::new(
            CourseHeader {
                id: record.id,
                title: record.title,
                mos: record.mos,
                audience: record.audience,
                description: record.description,
                course_number: record.course_number,
                school_name: record.school_name,
                references: record.references,
                reference_material: record.reference_material,
                created_at: record.created_at,
            },
            record.lessons,
        );
        course.course_tests = record.course_tests;
        course.status = record.status;
        course
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Lesson;

    fn lesson(id: &str, hours: u32) -> Lesson {
        crate::assembly::create_draft_lesson(crate::assembly::LessonDraft {
            id: Some(id.to_string()),
            duration_hours: Some(hours),
            ..Default::default()
        })
    }

    fn course(lessons: Vec<Lesson>) -> Course {
        Course::new(
            CourseHeader {
                id: "C1".into(),
                title: "Land Navigation".into(),
                mos: "11B".into(),
                audience: "Infantry".into(),
                description: String::new(),
                course_number: None,
                school_name: None,
                references: vec![],
                reference_material: None,
                created_at: Utc::now(),
            },
            lessons,
        )
    }

    #[test]
    fn total_duration_follows_every_lesson_mutation() {
        let mut c = course(vec![lesson("a", 4), lesson("b", 6)]);
        assert_eq!(c.total_duration(), 10);

        c.push_lesson(lesson("c", 3));
        assert_eq!(c.total_duration(), 13);

        c.set_lesson_duration("a", 1).unwrap();
        assert_eq!(c.total_duration(), 10);

        c.remove_lesson("b").unwrap();
        assert_eq!(c.total_duration(), 4);
        assert_eq!(c.total_duration(), total_duration_of(c.lessons()));
    }

    #[test]
    fn huge_lesson_hours_saturate_the_total() {
        let c = course(vec![lesson("a", 4_000_000_000), lesson("b", 4_000_000_000)]);
        assert_eq!(c.total_duration(), u32::MAX);
    }

    #[test]
    fn unknown_lesson_is_reported() {
        let mut c = course(vec![lesson("a", 4)]);
        let err = c.set_lesson_duration("zzz", 2).unwrap_err();
        assert!(matches!(err, CourseError::LessonNotFound { .. }));
        assert_eq!(c.total_duration(), 4);
    }

    #[test]
    fn stale_stored_total_is_recomputed_on_load() {
        let c = course(vec![lesson("a", 4), lesson("b", 6)]);
        let mut json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["totalDuration"], 10);
        json["totalDuration"] = serde_json::json!(99);

        let loaded: Course = serde_json::from_value(json).unwrap();
        assert_eq!(loaded.total_duration(), 10);
        assert_eq!(loaded, c);
    }

    #[test]
    fn status_only_moves_forward() {
        let mut c = course(vec![lesson("a", 1)]);
        c.promote(CourseStatus::Validated).unwrap();
        c.promote(CourseStatus::Validated).unwrap();
        let err = c.promote(CourseStatus::Draft).unwrap_err();
        assert_eq!(
            err,
            ValidationError::StatusRegression {
                from: CourseStatus::Validated,
                to: CourseStatus::Draft
            }
        );
        c.promote(CourseStatus::Accredited).unwrap();
        assert_eq!(c.status, CourseStatus::Accredited);
    }

    #[test]
    fn lesson_numbers_follow_sequence() {
        let c = course(vec![lesson("a", 1), lesson("b", 1)]);
        assert_eq!(c.lesson_number("b"), Some(2));
        assert_eq!(c.lesson_number("nope"), None);
    }
}

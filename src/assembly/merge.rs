use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::draft::{fresh_id, objectives_from, EloSkeleton, IdClaims, LessonSkeleton};
use crate::{
    error::{CourseError, ValidationError},
    model::{total_duration_of, Course, CourseHeader, Lesson, Slide, TestSet, Tlo},
};

/// User-entered analysis inputs that seed a new course.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseForm {
    pub mos: String,
    pub topic: String,
    pub audience: String,
    /// target duration in hours, passed to generation as guidance only
    pub duration_hours: u32,
    #[serde(default)]
    pub reference_material: Option<String>,
    #[serde(default)]
    pub key_tasks: Option<String>,
}

impl Default for CourseForm {
    fn default() -> Self {
        Self {
            mos: "27D".to_string(),
            topic: "Administrative Law & Separation Boards".to_string(),
            audience: "Junior Enlisted (E1-E4)".to_string(),
            duration_hours: 40,
            reference_material: None,
            key_tasks: None,
        }
    }
}

impl CourseForm {
    pub(crate) fn reference_text(&self) -> Option<&str> {
        self.reference_material
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Generated or manually assembled course structure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CourseSkeleton {
    pub title: Option<String>,
    pub description: Option<String>,
    pub course_number: Option<String>,
    pub school_name: Option<String>,
    /// total the generator claims; never trusted over the lesson sum
    pub claimed_duration: Option<u32>,
    pub lessons: Vec<LessonSkeleton>,
    pub references: Vec<String>,
}

impl CourseSkeleton {
    pub fn from_lessons(lessons: Vec<LessonSkeleton>) -> Self {
        Self {
            lessons,
            ..Default::default()
        }
    }
}

/// Builds a fresh draft course from the analysis form and a lesson skeleton.
pub fn merge_generated_skeleton(
    form: &CourseForm,
    skeleton: CourseSkeleton,
) -> Result<Course, ValidationError> {
    if skeleton.lessons.is_empty() {
        return Err(ValidationError::NoLessons);
    }

    let description = skeleton.description.unwrap_or_else(|| {
        format!(
            "Comprehensive training course for MOS {} on {}.",
            form.mos, form.topic
        )
    });

    let mut claims = IdClaims::default();
    let lessons = skeleton
        .lessons
        .into_iter()
        .map(|lesson| lesson.into_lesson(&mut claims))
        .collect();

    Ok(Course::new(
        CourseHeader {
            id: fresh_id(),
            title: form.topic.clone(),
            mos: form.mos.clone(),
            audience: form.audience.clone(),
            description,
            course_number: skeleton.course_number,
            school_name: skeleton.school_name,
            references: skeleton.references,
            reference_material: form.reference_text().map(str::to_string),
            created_at: Utc::now(),
        },
        lessons,
    ))
}

/// Generated lesson detail. Every `Some` field replaces the lesson's value;
/// identity, title, duration and TLO are not part of the fragment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LessonContent {
    pub scope: Option<String>,
    pub prerequisites: Option<String>,
    pub instructor_qualifications: Option<String>,
    pub safety_considerations: Option<String>,
    pub summary: Option<String>,
    pub media: Option<String>,
    pub ratio: Option<String>,
    pub script: Option<String>,
    pub regulations: Option<Vec<String>>,
    pub elos: Option<Vec<EloSkeleton>>,
    pub slides: Option<Vec<Slide>>,
}

impl LessonContent {
    fn apply_to(self, lesson: &mut Lesson) {
        fn replace<T>(slot: &mut Option<T>, incoming: Option<T>) {
            if incoming.is_some() {
                *slot = incoming;
            }
        }

        replace(&mut lesson.scope, self.scope);
        replace(&mut lesson.prerequisites, self.prerequisites);
        replace(
            &mut lesson.instructor_qualifications,
            self.instructor_qualifications,
        );
        replace(&mut lesson.safety_considerations, self.safety_considerations);
        replace(&mut lesson.summary, self.summary);
        replace(&mut lesson.media, self.media);
        replace(&mut lesson.ratio, self.ratio);
        replace(&mut lesson.script, self.script);
        replace(&mut lesson.regulations, self.regulations);
        replace(&mut lesson.slides, self.slides);
        if let Some(elos) = self.elos {
            lesson.elos = objectives_from(elos);
        }
    }
}

pub fn merge_lesson_content(
    course: &Course,
    lesson_id: &str,
    content: LessonContent,
) -> Result<Course, CourseError> {
    let mut next = course.clone();
    next.update_lesson(lesson_id, |lesson| content.apply_to(lesson))?;
    Ok(next)
}

/// Replaces the course-level test triple wholesale.
pub fn merge_course_tests(course: &Course, tests: TestSet) -> Course {
    let mut next = course.clone();
    next.course_tests = tests;
    next
}

pub fn update_lesson_script(
    course: &Course,
    lesson_id: &str,
    script: impl Into<String>,
) -> Result<Course, CourseError> {
    let script = script.into();
    let mut next = course.clone();
    next.update_lesson(lesson_id, |lesson| lesson.script = Some(script))?;
    Ok(next)
}

/// A reviewed rewrite of one lesson's terminal learning objective.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TloSuggestion {
    pub lesson_id: String,
    pub lesson_title: String,
    pub suggested_action: String,
    pub suggested_condition: String,
    pub suggested_standard: String,
    pub reasoning: String,
}

pub fn apply_tlo_suggestion(
    course: &Course,
    suggestion: &TloSuggestion,
) -> Result<Course, CourseError> {
    let tlo = Tlo {
        action: suggestion.suggested_action.clone(),
        condition: suggestion.suggested_condition.clone(),
        standard: suggestion.suggested_standard.clone(),
    };
    let mut next = course.clone();
    next.update_lesson(&suggestion.lesson_id, |lesson| lesson.tlo = Some(tlo))?;
    Ok(next)
}

pub fn recompute_total_duration(course: &Course) -> u32 {
    total_duration_of(course.lessons())
}

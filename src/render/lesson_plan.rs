use serde::Serialize;

use super::{slides::slide_blocks, text_or_placeholder, ObjectiveBlock, SlideBlock, Slot, TloBlock};
use crate::{
    error::CourseError,
    model::{Course, Lesson},
};

/// Full instructor document for a single lesson.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LessonPlan {
    pub header: LessonPlanHeader,
    pub introduction: Introduction,
    pub tlo: TloBlock,
    pub objectives: Vec<ObjectiveBlock>,
    pub resources: Resources,
    pub slides: Slot<Vec<SlideBlock>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LessonPlanHeader {
    pub course_title: String,
    pub course_number: String,
    pub school_name: String,
    pub mos: String,
    pub lesson_id: String,
    pub lesson_number: usize,
    pub lesson_title: String,
    pub duration_hours: u32,
    /// planned learning-step minutes, for comparison with the lesson length
    pub activity_minutes: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Introduction {
    pub scope: String,
    pub target_audience: String,
    pub prerequisites: String,
    pub safety_considerations: String,
    pub summary: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Resources {
    pub media: String,
    pub ratio: String,
    pub regulations: Vec<String>,
    pub instructor_qualifications: String,
}

fn introduction(course: &Course, lesson: &Lesson) -> Introduction {
    Introduction {
        scope: text_or_placeholder(lesson.scope.as_deref()),
        target_audience: text_or_placeholder(Some(&course.audience)),
        prerequisites: text_or_placeholder(lesson.prerequisites.as_deref()),
        safety_considerations: text_or_placeholder(lesson.safety_considerations.as_deref()),
        summary: text_or_placeholder(lesson.summary.as_deref()),
    }
}

fn resources(lesson: &Lesson) -> Resources {
    Resources {
        media: text_or_placeholder(lesson.media.as_deref()),
        ratio: text_or_placeholder(lesson.ratio.as_deref()),
        regulations: lesson.regulations.clone().unwrap_or_default(),
        instructor_qualifications: text_or_placeholder(lesson.instructor_qualifications.as_deref()),
    }
}

pub fn render_lesson_plan(course: &Course, lesson_id: &str) -> Result<LessonPlan, CourseError> {
    let lesson = course
        .lesson(lesson_id)
        .ok_or_else(|| CourseError::lesson_not_found(lesson_id))?;
    let lesson_number = course.lesson_number(lesson_id).unwrap_or_default();

    Ok(LessonPlan {
        header: LessonPlanHeader {
            course_title: course.title.clone(),
            course_number: text_or_placeholder(course.course_number.as_deref()),
            school_name: text_or_placeholder(course.school_name.as_deref()),
            mos: course.mos.clone(),
            lesson_id: lesson.id.clone(),
            lesson_number,
            lesson_title: lesson.title.clone(),
            duration_hours: lesson.duration_hours,
            activity_minutes: lesson.activity_minutes(),
        },
        introduction: introduction(course, lesson),
        tlo: TloBlock::from_tlo(lesson.tlo.as_ref()),
        objectives: lesson.elos.iter().map(ObjectiveBlock::from).collect(),
        resources: resources(lesson),
        slides: slide_blocks(lesson.slides.as_deref()),
    })
}

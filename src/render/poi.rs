use serde::Serialize;

use super::{ObjectiveBlock, TloBlock};
use crate::model::{Course, CourseStatus, Lesson};

/// Program of Instruction: the lesson-by-lesson objective tree of a course.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PoiOutline {
    pub course_id: String,
    pub title: String,
    pub mos: String,
    pub status: CourseStatus,
    pub total_hours: u32,
    pub lessons: Vec<PoiLesson>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PoiLesson {
    /// 1-based position in the sequence
    pub number: usize,
    pub id: String,
    pub title: String,
    pub duration_hours: u32,
    pub tlo: TloBlock,
    pub objectives: Vec<ObjectiveBlock>,
}

impl PoiLesson {
    pub(crate) fn new(number: usize, lesson: &Lesson) -> Self {
        Self {
            number,
            id: lesson.id.clone(),
            title: lesson.title.clone(),
            duration_hours: lesson.duration_hours,
            tlo: TloBlock::from_tlo(lesson.tlo.as_ref()),
            objectives: lesson.elos.iter().map(ObjectiveBlock::from).collect(),
        }
    }
}

pub fn render_poi(course: &Course) -> PoiOutline {
    PoiOutline {
        course_id: course.id.clone(),
        title: course.title.clone(),
        mos: course.mos.clone(),
        status: course.status,
        total_hours: course.total_duration(),
        lessons: course
            .lessons()
            .iter()
            .enumerate()
            .map(|(idx, lesson)| PoiLesson::new(idx + 1, lesson))
            .collect(),
    }
}

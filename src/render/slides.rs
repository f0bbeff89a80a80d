use serde::Serialize;

use super::{text_or_placeholder, Slot};
use crate::{
    error::CourseError,
    model::{Course, Slide},
};

/// The presentation deck for one lesson.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SlideDeck {
    pub lesson_id: String,
    pub lesson_number: usize,
    pub lesson_title: String,
    pub slides: Slot<Vec<SlideBlock>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SlideBlock {
    /// 1-based position, the number a `[SHOW SLIDE n]` cue refers to
    pub number: usize,
    pub of: usize,
    pub title: String,
    pub bullet_points: Vec<String>,
    pub instructor_notes: String,
}

/// Numbered slides, or the placeholder when the lesson has no deck yet.
pub(crate) fn slide_blocks(slides: Option<&[Slide]>) -> Slot<Vec<SlideBlock>> {
    let slides = slides.filter(|s| !s.is_empty());
    Slot::from_option(slides.map(|slides| {
        slides
            .iter()
            .enumerate()
            .map(|(idx, slide)| SlideBlock {
                number: idx + 1,
                of: slides.len(),
                title: text_or_placeholder(Some(&slide.title)),
                bullet_points: slide.bullet_points.clone(),
                instructor_notes: text_or_placeholder(Some(&slide.instructor_notes)),
            })
            .collect()
    }))
}

pub fn render_slides(course: &Course, lesson_id: &str) -> Result<SlideDeck, CourseError> {
    let lesson = course
        .lesson(lesson_id)
        .ok_or_else(|| CourseError::lesson_not_found(lesson_id))?;

    Ok(SlideDeck {
        lesson_id: lesson.id.clone(),
        lesson_number: course.lesson_number(lesson_id).unwrap_or_default(),
        lesson_title: lesson.title.clone(),
        slides: slide_blocks(lesson.slides.as_deref()),
    })
}

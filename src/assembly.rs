mod draft;
mod items;
mod merge;

pub use draft::{
    create_draft_lesson, fresh_id, EloSkeleton, LessonDraft, LessonSkeleton,
    DEFAULT_LESSON_HOURS, DEFAULT_LESSON_TITLE,
};
pub use items::{append_test_item, normalize_test_item};
pub use merge::{
    apply_tlo_suggestion, merge_course_tests, merge_generated_skeleton, merge_lesson_content,
    recompute_total_duration, update_lesson_script, CourseForm, CourseSkeleton, LessonContent,
    TloSuggestion,
};

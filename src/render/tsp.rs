use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::{poi::render_poi, text_or_placeholder, ExerciseBlock, PoiOutline, Slot};
use crate::model::{Course, CourseStatus, TestItem, TestItemType, TestVersion, VersionType};

static SLIDE_CUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[SHOW SLIDE (\d+)\]").expect("slide cue pattern is valid"));

/// Cover page, references, POI, instructor scripts, exercises and the
/// course-level test battery, bundled as one document.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TrainingSupportPackage {
    pub cover: Cover,
    pub references: Vec<String>,
    pub poi: PoiOutline,
    pub scripts: Vec<LessonScript>,
    pub exercises: Vec<ExerciseEntry>,
    pub tests: Vec<TestBlock>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Cover {
    pub title: String,
    pub course_number: String,
    pub school_name: String,
    pub mos: String,
    pub audience: String,
    pub description: String,
    pub total_hours: u32,
    pub lesson_count: usize,
    pub status: CourseStatus,
    /// creation date, `YYYY-MM-DD`
    pub prepared: String,
}

/// A run of script text or a cue to advance the slide deck.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ScriptSegment {
    Text(String),
    SlideCue(u32),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LessonScript {
    pub lesson_number: usize,
    pub lesson_title: String,
    pub segments: Slot<Vec<ScriptSegment>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ExerciseEntry {
    pub lesson_number: usize,
    pub activity_title: String,
    pub exercise: ExerciseBlock,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TestBlock {
    pub version_type: VersionType,
    pub purpose: String,
    pub items: Vec<RenderedItem>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RenderedItem {
    pub number: usize,
    pub item_type: String,
    pub bloom_level: String,
    pub question: String,
    pub options: Vec<LabeledOption>,
    pub answer: String,
    /// essay items only; the placeholder when the essay has no rubric
    pub rubric: Option<Slot<String>>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LabeledOption {
    pub label: String,
    pub text: String,
}

/// `A` through `Z`, then the 1-based position for longer option lists.
pub fn option_label(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}

/// Splits an instructor script around its `[SHOW SLIDE n]` markers.
pub fn split_script(script: &str) -> Vec<ScriptSegment> {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in SLIDE_CUE.captures_iter(script) {
        let Some(marker) = caps.get(0) else { continue };
        // a slide number that does not fit stays in the text
        let Ok(slide) = caps[1].parse::<u32>() else {
            continue;
        };
        push_text(&mut segments, &script[last..marker.start()]);
        segments.push(ScriptSegment::SlideCue(slide));
        last = marker.end();
    }
    push_text(&mut segments, &script[last..]);
    segments
}

fn push_text(segments: &mut Vec<ScriptSegment>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        segments.push(ScriptSegment::Text(text.to_string()));
    }
}

fn render_item(number: usize, item: &TestItem) -> RenderedItem {
    RenderedItem {
        number,
        item_type: item.item_type.as_str().to_string(),
        bloom_level: item.bloom_level.as_str().to_string(),
        question: item.question.clone(),
        options: item
            .options
            .iter()
            .flatten()
            .enumerate()
            .map(|(idx, text)| LabeledOption {
                label: option_label(idx),
                text: text.clone(),
            })
            .collect(),
        answer: item.answer.clone(),
        rubric: (item.item_type == TestItemType::ShortAnswerEssay).then(|| {
            Slot::from_option(
                item.rubric
                    .as_deref()
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string),
            )
        }),
    }
}

fn render_version(version: &TestVersion) -> TestBlock {
    TestBlock {
        version_type: version.version_type,
        purpose: text_or_placeholder(Some(&version.purpose)),
        items: version
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| render_item(idx + 1, item))
            .collect(),
    }
}

pub fn render_tsp(course: &Course) -> TrainingSupportPackage {
    let cover = Cover {
        title: course.title.clone(),
        course_number: text_or_placeholder(course.course_number.as_deref()),
        school_name: text_or_placeholder(course.school_name.as_deref()),
        mos: course.mos.clone(),
        audience: text_or_placeholder(Some(&course.audience)),
        description: text_or_placeholder(Some(&course.description)),
        total_hours: course.total_duration(),
        lesson_count: course.lessons().len(),
        status: course.status,
        prepared: course.created_at.format("%Y-%m-%d").to_string(),
    };

    let scripts = course
        .lessons()
        .iter()
        .enumerate()
        .map(|(idx, lesson)| LessonScript {
            lesson_number: idx + 1,
            lesson_title: lesson.title.clone(),
            segments: Slot::from_option(
                lesson
                    .script
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
                    .map(split_script),
            ),
        })
        .collect();

    let exercises = course
        .lessons()
        .iter()
        .enumerate()
        .flat_map(|(idx, lesson)| {
            lesson.activities().filter_map(move |lsa| {
                lsa.practical_exercise.as_ref().map(|pe| ExerciseEntry {
                    lesson_number: idx + 1,
                    activity_title: lsa.title.clone(),
                    exercise: ExerciseBlock::from(pe),
                })
            })
        })
        .collect();

    TrainingSupportPackage {
        cover,
        references: course.references.clone(),
        poi: render_poi(course),
        scripts,
        exercises,
        tests: course.course_tests.iter().map(render_version).collect(),
    }
}

//! Decoding of generated JSON into the course model.
//!
//! Responses are first parsed into the `*Wire` shapes below, which mirror the
//! output-shape descriptors in `schema.rs`. Each shape is then mapped field by
//! field into model types; any mismatch becomes [`GenerationError::Shape`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::error::Category;

use super::GenerationError;
use crate::{
    assembly::{normalize_test_item, CourseSkeleton, EloSkeleton, LessonContent, LessonSkeleton},
    model::{
        BloomLevel, CheckOnLearning, ExerciseType, InstructionalMethod, LearningStepActivity,
        PracticalExercise, Slide, TestItem, TestItemType, TestSet, TestVersion, Tlo, VersionType,
    },
};

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("code fence pattern is valid")
});

/// Returns the body of the first fenced block, or the trimmed text when
/// there is no fence.
pub fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().trim(),
        None => text.trim(),
    }
}

fn parse<T: DeserializeOwned>(raw: &str) -> Result<T, GenerationError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    serde_json::from_str(body).map_err(|e| match e.classify() {
        Category::Data => GenerationError::Shape(e.to_string()),
        _ => GenerationError::Malformed(e),
    })
}

fn shape<E: std::fmt::Display>(context: &str) -> impl FnOnce(E) -> GenerationError + '_ {
    move |e| GenerationError::Shape(format!("{context}: {e}"))
}

/// Upper bound on a single lesson's hours or an activity's minutes.
pub const MAX_UNIT_DURATION: u32 = 10_000;

fn whole_number(value: f64, limit: u32, context: &str) -> Result<u32, GenerationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(GenerationError::Shape(format!(
            "{context}: {value} is not a valid non-negative number"
        )));
    }
    if value.round() > f64::from(limit) {
        return Err(GenerationError::Shape(format!(
            "{context}: {value} exceeds the limit of {limit}"
        )));
    }
    Ok(value.round() as u32)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TloWire {
    action: String,
    condition: String,
    standard: String,
}

impl From<TloWire> for Tlo {
    fn from(w: TloWire) -> Self {
        Tlo {
            action: w.action,
            condition: w.condition,
            standard: w.standard,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EloOutlineWire {
    #[serde(default)]
    id: Option<String>,
    title: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LessonOutlineWire {
    #[serde(default)]
    id: Option<String>,
    title: String,
    duration_hours: f64,
    tlo: TloWire,
    #[serde(default)]
    elos: Vec<EloOutlineWire>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseStructureWire {
    title: String,
    description: String,
    total_duration: f64,
    lessons: Vec<LessonOutlineWire>,
    #[serde(default)]
    references: Vec<String>,
    #[serde(default)]
    course_number: Option<String>,
    #[serde(default)]
    school_name: Option<String>,
}

pub fn decode_course_structure(raw: &str) -> Result<CourseSkeleton, GenerationError> {
    let wire: CourseStructureWire = parse(raw)?;

    let lessons = wire
        .lessons
        .into_iter()
        .enumerate()
        .map(|(idx, lesson)| {
            Ok(LessonSkeleton {
                id: lesson.id,
                duration_hours: whole_number(lesson.duration_hours, MAX_UNIT_DURATION, &format!("lesson {}", idx + 1))?,
                title: lesson.title,
                tlo: Some(lesson.tlo.into()),
                elos: lesson
                    .elos
                    .into_iter()
                    .map(|elo| EloSkeleton {
                        id: elo.id,
                        title: elo.title,
                        learning_step_activities: Vec::new(),
                    })
                    .collect(),
            })
        })
        .collect::<Result<Vec<_>, GenerationError>>()?;

    Ok(CourseSkeleton {
        title: Some(wire.title),
        description: Some(wire.description),
        course_number: wire.course_number,
        school_name: wire.school_name,
        claimed_duration: Some(whole_number(wire.total_duration, u32::MAX, "totalDuration")?),
        lessons,
        references: wire.references,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExerciseWire {
    title: String,
    #[serde(rename = "type")]
    exercise_type: String,
    description: String,
    #[serde(default)]
    steps: Vec<String>,
    #[serde(default)]
    scoring_criteria: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckWire {
    question: String,
    answer: String,
    #[serde(default)]
    remediation: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityWire {
    title: String,
    time_minutes: f64,
    method: String,
    description: String,
    #[serde(default)]
    guidance: Option<String>,
    #[serde(default)]
    practical_exercise: Option<ExerciseWire>,
    #[serde(default)]
    check_on_learning: Option<CheckWire>,
}

impl ActivityWire {
    fn into_activity(self) -> Result<LearningStepActivity, GenerationError> {
        let context = format!("activity '{}'", self.title);
        let practical_exercise = self
            .practical_exercise
            .map(|pe| -> Result<PracticalExercise, GenerationError> {
                Ok(PracticalExercise {
                    exercise_type: pe.exercise_type.parse::<ExerciseType>().map_err(shape(&context))?,
                    title: pe.title,
                    description: pe.description,
                    steps: pe.steps,
                    scoring_criteria: pe.scoring_criteria,
                })
            })
            .transpose()?;

        Ok(LearningStepActivity {
            time_minutes: whole_number(self.time_minutes, MAX_UNIT_DURATION, &context)?,
            method: self.method.parse::<InstructionalMethod>().map_err(shape(&context))?,
            title: self.title,
            description: self.description,
            guidance: self.guidance,
            practical_exercise,
            check_on_learning: self.check_on_learning.map(|c| CheckOnLearning {
                question: c.question,
                answer: c.answer,
                remediation: c.remediation,
            }),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EloDetailWire {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    learning_step_activities: Vec<ActivityWire>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlideWire {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    bullet_points: Vec<String>,
    #[serde(default)]
    instructor_notes: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LessonDetailWire {
    scope: String,
    summary: String,
    script: String,
    elos: Vec<EloDetailWire>,
    slides: Vec<SlideWire>,
    #[serde(default)]
    prerequisites: Option<String>,
    #[serde(default)]
    instructor_qualifications: Option<String>,
    #[serde(default)]
    safety_considerations: Option<String>,
    #[serde(default)]
    media: Option<String>,
    #[serde(default)]
    ratio: Option<String>,
    #[serde(default, alias = "armyRegulations")]
    regulations: Option<Vec<String>>,
}

pub fn decode_lesson_detail(raw: &str) -> Result<LessonContent, GenerationError> {
    let wire: LessonDetailWire = parse(raw)?;

    let elos = wire
        .elos
        .into_iter()
        .map(|elo| {
            Ok(EloSkeleton {
                id: elo.id,
                title: elo.title,
                learning_step_activities: elo
                    .learning_step_activities
                    .into_iter()
                    .map(ActivityWire::into_activity)
                    .collect::<Result<Vec<_>, _>>()?,
            })
        })
        .collect::<Result<Vec<_>, GenerationError>>()?;

    let slides = wire
        .slides
        .into_iter()
        .enumerate()
        .map(|(idx, slide)| Slide {
            id: slide.id.unwrap_or_else(|| (idx + 1).to_string()),
            title: slide.title,
            bullet_points: slide.bullet_points,
            instructor_notes: slide.instructor_notes,
        })
        .collect();

    Ok(LessonContent {
        scope: Some(wire.scope),
        prerequisites: wire.prerequisites,
        instructor_qualifications: wire.instructor_qualifications,
        safety_considerations: wire.safety_considerations,
        summary: Some(wire.summary),
        media: wire.media,
        ratio: wire.ratio,
        script: Some(wire.script),
        regulations: wire.regulations,
        elos: Some(elos),
        slides: Some(slides),
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestItemWire {
    #[serde(default, rename = "type")]
    item_type: Option<String>,
    question: String,
    #[serde(default)]
    options: Option<Vec<String>>,
    answer: String,
    #[serde(default)]
    rubric: Option<String>,
    bloom_level: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestVersionWire {
    #[serde(default)]
    purpose: Option<String>,
    #[serde(default)]
    items: Vec<TestItemWire>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestSetWire {
    diagnostic: TestVersionWire,
    formative: TestVersionWire,
    summative: TestVersionWire,
}

fn decode_version(
    version_type: VersionType,
    wire: TestVersionWire,
) -> Result<TestVersion, GenerationError> {
    let items = wire
        .items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let context = format!("{version_type} item {}", idx + 1);
            let has_options = item
                .options
                .as_ref()
                .is_some_and(|o| o.iter().any(|opt| !opt.trim().is_empty()));
            let item_type = match item.item_type.as_deref() {
                Some(label) => label.parse::<TestItemType>().map_err(shape(&context))?,
                None if has_options => TestItemType::MultipleChoice,
                None => TestItemType::ShortAnswerEssay,
            };
            let bloom_level = item
                .bloom_level
                .parse::<BloomLevel>()
                .map_err(shape(&context))?;
            normalize_test_item(TestItem {
                id: None,
                item_type,
                question: item.question,
                options: item.options,
                answer: item.answer,
                rubric: item.rubric,
                bloom_level,
            })
            .map_err(shape(&context))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TestVersion {
        version_type,
        purpose: wire
            .purpose
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| version_type.default_purpose().to_string()),
        items,
    })
}

pub fn decode_course_tests(raw: &str) -> Result<TestSet, GenerationError> {
    let wire: TestSetWire = parse(raw)?;
    Ok(TestSet {
        diagnostic: decode_version(VersionType::Diagnostic, wire.diagnostic)?,
        formative: decode_version(VersionType::Formative, wire.formative)?,
        summative: decode_version(VersionType::Summative, wire.summative)?,
    })
}

use std::{cell::Cell, collections::HashSet};

use addie::{
    assembly::{append_test_item, LessonDraft},
    gateway::{GenerationRequest, RequestKind},
    model::{BloomLevel, TestItem, TestItemType, VersionType},
    CourseError, CourseStatus, Gateway, GenerationError, MemoryStore, Session, SessionError,
    Transport, ValidationError, Wizard, WizardError, WizardPhase,
};

/// Answers each request kind with canned text, or fails it.
struct Stub {
    structure: Option<&'static str>,
    lesson: Option<&'static str>,
    calls: Cell<usize>,
}

impl Stub {
    fn new(structure: Option<&'static str>, lesson: Option<&'static str>) -> Self {
        Self {
            structure,
            lesson,
            calls: Cell::new(0),
        }
    }
}

impl Transport for Stub {
    fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.calls.set(self.calls.get() + 1);
        let canned = match request.kind {
            RequestKind::CourseStructure => self.structure,
            RequestKind::LessonDetail => self.lesson,
            RequestKind::CourseTests => None,
        };
        canned
            .map(str::to_string)
            .ok_or(GenerationError::Server { status: 500 })
    }
}

const THREE_LESSONS: &str = r#"```json
{
  "title": "Land Navigation",
  "description": "Map reading and terrain association",
  "totalDuration": 40,
  "references": ["TC 3-25.26"],
  "lessons": [
    {"id": "", "title": "Map Reading", "durationHours": 2,
     "tlo": {"action": "Evaluate", "condition": "Given a map", "standard": "Within 100m"},
     "elos": [{"id": "A", "title": "Identify terrain features"}]},
    {"id": "", "title": "Compass Use", "durationHours": 3,
     "tlo": {"action": "Synthesize", "condition": "Given a compass", "standard": "Within 3 degrees"},
     "elos": []},
    {"id": "", "title": "Night Navigation", "durationHours": 5,
     "tlo": {"action": "Create", "condition": "At night", "standard": "All points found"},
     "elos": []}
  ]
}
```"#;

const REPEATED_IDS: &str = r#"{
  "title": "Land Navigation",
  "description": "Map reading",
  "totalDuration": 3,
  "lessons": [
    {"id": "L1", "title": "Map Reading", "durationHours": 1,
     "tlo": {"action": "Evaluate", "condition": "Given a map", "standard": "Within 100m"},
     "elos": [{"id": "E1", "title": "Read grid"}, {"id": "E1", "title": "Plot points"}]},
    {"id": "L1", "title": "Compass Use", "durationHours": 2,
     "tlo": {"action": "Create", "condition": "Given a compass", "standard": "Within 3 degrees"},
     "elos": []}
  ]
}"#;

const OVERSIZED: &str = r#"{
  "title": "Land Navigation",
  "description": "Map reading",
  "totalDuration": 8000000000,
  "lessons": [
    {"title": "Map Reading", "durationHours": 4000000000,
     "tlo": {"action": "Evaluate", "condition": "Given a map", "standard": "Within 100m"}},
    {"title": "Compass Use", "durationHours": 4000000000,
     "tlo": {"action": "Create", "condition": "Given a compass", "standard": "Within 3 degrees"}}
  ]
}"#;

fn manual(hours: u32) -> LessonDraft {
    LessonDraft {
        duration_hours: Some(hours),
        ..Default::default()
    }
}

#[test]
fn scenario_a_manual_lessons_sum_to_total() {
    let mut wizard = Wizard::default();
    {
        let form = wizard.form_mut().unwrap();
        form.topic = "Land Navigation".into();
        form.duration_hours = 10;
    }
    wizard.next().unwrap();
    wizard.add_manual_lesson(manual(4)).unwrap();
    wizard.add_manual_lesson(manual(6)).unwrap();

    let course = wizard.next().unwrap().expect("design finalizes");
    assert_eq!(course.total_duration(), 10);
    assert_eq!(course.lessons().len(), 2);
    assert_eq!(course.status, CourseStatus::Draft);
    assert_eq!(course.title, "Land Navigation");
}

#[test]
fn scenario_b_generated_structure_sums_lesson_hours() {
    let stub = Stub::new(Some(THREE_LESSONS), None);
    let gateway = Gateway::new(&stub);
    let mut wizard = Wizard::default();
    wizard.next().unwrap();

    assert_eq!(wizard.generate_architecture(&gateway).unwrap(), 3);
    assert!(!wizard.is_generating());
    let course = wizard.finalize().unwrap();

    // the claimed 40 hours is ignored
    assert_eq!(course.total_duration(), 10);
    assert_eq!(course.references, vec!["TC 3-25.26".to_string()]);
    assert_eq!(course.description, "Map reading and terrain association");

    let ids: HashSet<&str> = course.lessons().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|id| !id.is_empty()));
}

#[test]
fn scenario_c_failed_lesson_detail_leaves_course_untouched() {
    let stub = Stub::new(Some(THREE_LESSONS), None);
    let gateway = Gateway::new(&stub);
    let mut wizard = Wizard::default();
    wizard.next().unwrap();
    wizard.generate_architecture(&gateway).unwrap();
    let course = wizard.finalize().unwrap();
    let course_id = course.id.clone();
    let lesson_id = course.lessons()[1].id.clone();

    let mut session = Session::load(MemoryStore::default()).unwrap();
    session.add_course(course.clone());

    let err = session
        .develop_lesson(&gateway, &course_id, &lesson_id)
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Generation(GenerationError::Server { status: 500 })
    ));
    assert_eq!(session.course(&course_id), Some(&course));
    assert!(!session.is_pending(&addie::session::PendingAction::LessonContent {
        course_id: course_id.clone(),
        lesson_id: lesson_id.clone(),
    }));

    // the flag is clear, so a retry goes out again
    let calls = stub.calls.get();
    let _ = session.develop_lesson(&gateway, &course_id, &lesson_id);
    assert_eq!(stub.calls.get(), calls + 1);
}

#[test]
fn scenario_d_essay_without_answer_is_rejected() {
    let mut wizard = Wizard::default();
    wizard.next().unwrap();
    wizard.add_manual_lesson(manual(2)).unwrap();
    let course = wizard.finalize().unwrap();

    let essay = TestItem {
        id: None,
        item_type: TestItemType::ShortAnswerEssay,
        question: "Explain the purpose of a separation board.".into(),
        options: None,
        answer: "   ".into(),
        rubric: Some("Mentions due process".into()),
        bloom_level: BloomLevel::K3,
    };
    let err = append_test_item(&course, None, VersionType::Summative, essay).unwrap_err();
    assert_eq!(err, CourseError::Validation(ValidationError::EmptyAnswer));
    assert!(course.course_tests.summative.items.is_empty());
}

#[test]
fn finalize_without_lessons_stays_in_design() {
    let mut wizard = Wizard::default();
    wizard.next().unwrap();
    let err = wizard.finalize().unwrap_err();
    assert!(matches!(err, WizardError::Validation(ValidationError::NoLessons)));
    assert_eq!(wizard.phase(), WizardPhase::Design);

    wizard.add_manual_lesson(manual(1)).unwrap();
    wizard.finalize().unwrap();
    assert_eq!(wizard.phase(), WizardPhase::Finalized);
}

#[test]
fn failed_structure_generation_keeps_manual_lessons() {
    let stub = Stub::new(None, None);
    let gateway = Gateway::new(&stub);
    let mut wizard = Wizard::default();
    wizard.next().unwrap();
    wizard.add_manual_lesson(manual(3)).unwrap();

    assert!(wizard.generate_architecture(&gateway).is_err());
    assert!(!wizard.is_generating());
    assert_eq!(wizard.running_total(), 3);
}

#[test]
fn repeated_generated_ids_become_distinct() {
    let stub = Stub::new(Some(REPEATED_IDS), None);
    let gateway = Gateway::new(&stub);
    let mut wizard = Wizard::default();
    wizard.next().unwrap();
    wizard.generate_architecture(&gateway).unwrap();
    let course = wizard.finalize().unwrap();

    let ids: HashSet<&str> = course.lessons().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    let elos = &course.lessons()[0].elos;
    assert_ne!(elos[0].id, elos[1].id);
    assert_eq!(course.total_duration(), 3);
}

#[test]
fn oversized_generated_durations_are_rejected() {
    let stub = Stub::new(Some(OVERSIZED), None);
    let gateway = Gateway::new(&stub);
    let mut wizard = Wizard::default();
    wizard.next().unwrap();
    wizard.add_manual_lesson(manual(2)).unwrap();

    let err = wizard.generate_architecture(&gateway).unwrap_err();
    assert!(matches!(
        err,
        WizardError::Generation(GenerationError::Shape(_))
    ));
    assert!(!wizard.is_generating());
    assert_eq!(wizard.running_total(), 2);
}

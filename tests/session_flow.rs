use addie::{
    assembly::{LessonDraft, TloSuggestion},
    gateway::{GenerationRequest, RequestKind},
    model::{ExerciseType, InstructionalMethod, TestItemType},
    render::{
        render_lesson_plan, render_slides, render_tsp, ScriptSegment, ToMarkdown, NOT_YET_DEFINED,
    },
    CourseStore, Gateway, GenerationError, JsonFileStore, Session, Transport, Wizard,
};

struct Canned;

const LESSON_DETAIL: &str = r#"{
  "scope": "Procedures for administrative separation boards",
  "summary": "Board members, evidence and findings",
  "prerequisites": "None",
  "ratio": "1:16",
  "script": "Good morning. [SHOW SLIDE 1] A board is convened by... [SHOW SLIDE 2] Questions?",
  "armyRegulations": ["AR 635-200", "AR 15-6"],
  "elos": [
    {"id": "A", "title": "Identify board composition", "learningStepActivities": [
      {"title": "Board members", "timeMinutes": 30, "method": "Lecture",
       "description": "Voting members and the recorder",
       "guidance": "Concrete experience, then reflection",
       "checkOnLearning": {"question": "Who records?", "answer": "The recorder"}},
      {"title": "Mock board", "timeMinutes": 60, "method": "Practical Exercise",
       "description": "Run a mock board", "guidance": "Assign roles",
       "practicalExercise": {"title": "Mock Board", "type": "Role Play",
         "description": "Students run a board", "steps": ["Assign roles", "Present evidence"],
         "scoringCriteria": ["Findings recorded"]}}
    ]}
  ],
  "slides": [
    {"title": "Separation Boards", "bulletPoints": ["Purpose", "Authority"], "instructorNotes": "Open"},
    {"id": "s2", "title": "Composition", "bulletPoints": [], "instructorNotes": ""}
  ]
}"#;

const COURSE_TESTS: &str = r#"{
  "diagnostic": {"purpose": "", "items": [
    {"type": "True/False", "question": "Boards are optional.", "options": ["True", "False"],
     "answer": "False", "bloomLevel": "K1"}
  ]},
  "formative": {"purpose": "Mid-course check", "items": []},
  "summative": {"items": [
    {"question": "Explain the board's findings process.", "answer": "Majority vote on each allegation",
     "rubric": "Mentions majority vote", "options": [], "bloomLevel": "K3"}
  ]}
}"#;

impl Transport for Canned {
    fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        match request.kind {
            RequestKind::LessonDetail => Ok(LESSON_DETAIL.to_string()),
            RequestKind::CourseTests => Ok(COURSE_TESTS.to_string()),
            RequestKind::CourseStructure => Err(GenerationError::EmptyResponse),
        }
    }
}

#[test]
fn author_develop_test_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path(), "army_courses");
    let gateway = Gateway::new(Canned);

    let mut wizard = Wizard::default();
    wizard.next().unwrap();
    wizard
        .add_manual_lesson(LessonDraft {
            title: Some("Separation Boards".into()),
            duration_hours: Some(3),
            ..Default::default()
        })
        .unwrap();
    wizard.add_manual_lesson(LessonDraft::default()).unwrap();
    let course = wizard.finalize().unwrap();
    let course_id = course.id.clone();
    let lesson_id = course.lessons()[0].id.clone();

    let mut session = Session::load(&store).unwrap();
    session.add_course(course);
    session.develop_lesson(&gateway, &course_id, &lesson_id).unwrap();
    session.generate_tests(&gateway, &course_id).unwrap();
    session
        .apply_tlo_suggestion(
            &course_id,
            &TloSuggestion {
                lesson_id: lesson_id.clone(),
                lesson_title: "Separation Boards".into(),
                suggested_action: "Evaluate a separation packet".into(),
                suggested_condition: "Given a case file".into(),
                suggested_standard: "IAW AR 635-200".into(),
                reasoning: "Raises the action to Bloom level 5".into(),
            },
        )
        .unwrap();
    assert!(session.flush().unwrap());

    let reloaded = Session::load(&store).unwrap();
    let course = reloaded.course(&course_id).unwrap();
    assert_eq!(course.total_duration(), 4);

    let lesson = course.lesson(&lesson_id).unwrap();
    assert_eq!(lesson.title, "Separation Boards");
    assert_eq!(lesson.duration_hours, 3);
    assert_eq!(lesson.tlo.as_ref().unwrap().action, "Evaluate a separation packet");
    assert_eq!(lesson.activity_minutes(), 90);
    let slides = lesson.slides.as_ref().unwrap();
    assert_eq!(slides[0].id, "1");
    assert_eq!(slides[1].id, "s2");
    let mock = &lesson.elos[0].learning_step_activities[1];
    assert_eq!(mock.method, InstructionalMethod::PracticalExercise);
    assert_eq!(
        mock.practical_exercise.as_ref().unwrap().exercise_type,
        ExerciseType::RolePlay
    );

    let tests = &course.course_tests;
    assert_eq!(tests.diagnostic.purpose, "Assess entry-level knowledge");
    assert_eq!(tests.formative.purpose, "Mid-course check");
    let essay = &tests.summative.items[0];
    assert_eq!(essay.item_type, TestItemType::ShortAnswerEssay);
    assert!(essay.options.is_none());
    assert!(essay.id.is_some());

    let tsp = render_tsp(course);
    assert_eq!(
        tsp.scripts[0].segments.defined().unwrap()[1],
        ScriptSegment::SlideCue(1)
    );
    assert!(tsp.scripts[1].segments.defined().is_none());
    assert_eq!(tsp.exercises.len(), 1);
    assert_eq!(tsp.tests[0].items[0].options[1].label, "B");

    let plan = render_lesson_plan(course, &lesson_id).unwrap();
    assert_eq!(plan.resources.ratio, "1:16");
    assert_eq!(plan.resources.media, NOT_YET_DEFINED);
    let md = plan.to_markdown().unwrap();
    assert!(md.contains("AR 635-200"));

    let deck = render_slides(course, &lesson_id).unwrap();
    let slides = deck.slides.defined().unwrap();
    assert_eq!(slides[1].number, 2);
    assert_eq!(slides[1].instructor_notes, NOT_YET_DEFINED);
    assert!(deck.to_markdown().unwrap().contains("Slide 1: Separation Boards"));

    let summative = &tsp.tests[2].items[0];
    assert_eq!(
        summative.rubric.as_ref().and_then(|r| r.defined()).map(String::as_str),
        Some("Mentions majority vote")
    );

    assert_eq!(store.load().unwrap().len(), 1);
}

#[test]
fn undeveloped_course_renders_with_placeholders() {
    let mut wizard = Wizard::default();
    wizard.next().unwrap();
    wizard.add_manual_lesson(LessonDraft::default()).unwrap();
    let course = wizard.finalize().unwrap();

    let md = render_tsp(&course).to_markdown().unwrap();
    assert!(md.contains(NOT_YET_DEFINED));
    assert!(md.contains("## References"));
}

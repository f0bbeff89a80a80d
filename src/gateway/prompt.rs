use std::fmt::Write;

use super::{CourseStructureRequest, CourseTestsRequest, LessonDetailRequest};
use crate::model::Lesson;

fn push_reference(prompt: &mut String, reference: Option<&str>) {
    if let Some(text) = reference.filter(|t| !t.trim().is_empty()) {
        prompt.push_str("\n\nREFERENCE SOURCE:\n");
        prompt.push_str(text.trim());
    }
}

pub fn course_structure(request: &CourseStructureRequest) -> String {
    let mut prompt = format!(
        "Generate a Program of Instruction (POI) structure for a military training course.\n\
         Topic: \"{}\". MOS: {}. Target duration: {} hours.\n\
         Break the course into sequenced lessons whose durations add up to the target.\n\
         Give every lesson a Terminal Learning Objective (action, condition, standard) and \
         a list of Enabling Learning Objectives (id and title only).\n\
         Action verbs for TLOs MUST be Bloom's Taxonomy Level 5 or 6.",
        request.topic, request.mos, request.duration_hours
    );
    if let Some(tasks) = request.key_tasks.as_deref().filter(|t| !t.trim().is_empty()) {
        prompt.push_str("\n\nKEY TASKS ALREADY IDENTIFIED:\n");
        prompt.push_str(tasks.trim());
    }
    push_reference(&mut prompt, request.reference_material.as_deref());
    prompt
}

fn describe_lesson(prompt: &mut String, lesson: &Lesson) {
    let _ = writeln!(prompt, "Lesson: \"{}\" ({} hours)", lesson.title, lesson.duration_hours);
    if let Some(tlo) = &lesson.tlo {
        let _ = writeln!(
            prompt,
            "TLO: Action: {} Condition: {} Standard: {}",
            tlo.action, tlo.condition, tlo.standard
        );
    }
    for elo in &lesson.elos {
        let _ = writeln!(prompt, "- ELO {}: {}", elo.id, elo.title);
    }
}

pub fn lesson_detail(request: &LessonDetailRequest) -> String {
    let mut prompt = format!(
        "Develop a Lesson Plan for the course \"{}\".\n",
        request.course_title
    );
    describe_lesson(&mut prompt, &request.lesson);
    prompt.push_str(
        "\nREQUIRED:\n\
         1. Experiential Learning Model (ELM) flow for every Learning Step Activity.\n\
         2. Word-for-word instructor script with [SHOW SLIDE X] markers.\n\
         3. Step-by-step guidance for every activity.\n\
         4. Scope, Prerequisites, and Special Instructor Qualifications.\n\
         Keep the ELO ids given above.",
    );
    push_reference(&mut prompt, request.reference_material.as_deref());
    prompt
}

pub fn course_tests(request: &CourseTestsRequest) -> String {
    let course = &request.course;
    let mut prompt = format!(
        "Generate three versions of a test (Diagnostic, Formative, Summative) for the entire \
         course \"{}\" (MOS {}, audience: {}).\n\
         Tag every item with a Bloom's level K1-K4. Choice items need options; \
         Short Answer Essay items need a grading rubric.\n\nCOURSE OUTLINE:\n",
        course.title, course.mos, course.audience
    );
    for lesson in course.lessons() {
        describe_lesson(&mut prompt, lesson);
    }
    push_reference(&mut prompt, course.reference_material.as_deref());
    prompt
}

use super::draft::fresh_id;
use crate::{
    error::{CourseError, ValidationError},
    model::{Course, TestItem, VersionType},
};

/// Checks a test item and strips what its type does not use.
///
/// Question and answer must be non-blank. Choice items keep only non-blank
/// options, and lose the list entirely when nothing is left. Other item types
/// never carry options, and only essay items keep a rubric.
pub fn normalize_test_item(item: TestItem) -> Result<TestItem, ValidationError> {
    if item.question.trim().is_empty() {
        return Err(ValidationError::EmptyQuestion);
    }
    if item.answer.trim().is_empty() {
        return Err(ValidationError::EmptyAnswer);
    }

    let options = if item.item_type.is_choice() {
        item.options
            .map(|options| {
                options
                    .into_iter()
                    .filter(|opt| !opt.trim().is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|options| !options.is_empty())
    } else {
        None
    };

    let rubric = if item.item_type.takes_rubric() {
        item.rubric.filter(|r| !r.trim().is_empty())
    } else {
        None
    };

    Ok(TestItem {
        id: item.id.or_else(|| Some(fresh_id())),
        options,
        rubric,
        ..item
    })
}

/// Appends one item to a course-level test, or to a lesson-level test when
/// `lesson_id` is given.
pub fn append_test_item(
    course: &Course,
    lesson_id: Option<&str>,
    version: VersionType,
    item: TestItem,
) -> Result<Course, CourseError> {
    let item = normalize_test_item(item)?;
    let mut next = course.clone();
    match lesson_id {
        None => next.course_tests.get_mut(version).items.push(item),
        Some(id) => next.update_lesson(id, |lesson| lesson.tests.get_mut(version).items.push(item))?,
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assembly::{merge_generated_skeleton, CourseForm, CourseSkeleton, LessonSkeleton},
        model::{BloomLevel, TestItemType},
    };
    use rstest::rstest;

    fn item(item_type: TestItemType, options: Option<Vec<&str>>) -> TestItem {
        TestItem {
            id: None,
            item_type,
            question: "Which azimuth is back?".into(),
            options: options.map(|o| o.into_iter().map(String::from).collect()),
            answer: "A".into(),
            rubric: Some("Full credit for correct math".into()),
            bloom_level: BloomLevel::K2,
        }
    }

    fn course() -> Course {
        merge_generated_skeleton(
            &CourseForm::default(),
            CourseSkeleton::from_lessons(vec![LessonSkeleton {
                id: Some("L1".into()),
                title: "Azimuths".into(),
                duration_hours: 2,
                tlo: None,
                elos: vec![],
            }]),
        )
        .unwrap()
    }

    #[rstest]
    #[case(Some(vec!["A", "", "  ", "D"]), Some(vec!["A", "D"]))]
    #[case(Some(vec!["", " "]), None)]
    #[case(None, None)]
    fn filters_blank_choice_options(
        #[case] options: Option<Vec<&str>>,
        #[case] expected: Option<Vec<&str>>,
    ) {
        let normalized = normalize_test_item(item(TestItemType::MultipleChoice, options)).unwrap();
        let expected = expected.map(|o| o.into_iter().map(String::from).collect::<Vec<_>>());
        assert_eq!(normalized.options, expected);
        assert!(normalized.rubric.is_none());
        assert!(normalized.id.is_some());
    }

    #[test]
    fn non_choice_items_drop_options() {
        let normalized =
            normalize_test_item(item(TestItemType::ShortAnswerEssay, Some(vec!["A", "B"]))).unwrap();
        assert!(normalized.options.is_none());
        assert_eq!(
            normalized.rubric.as_deref(),
            Some("Full credit for correct math")
        );
    }

    #[rstest]
    #[case("", "A", ValidationError::EmptyQuestion)]
    #[case("Q?", "", ValidationError::EmptyAnswer)]
    #[case("Q?", "   ", ValidationError::EmptyAnswer)]
    fn rejects_blank_question_or_answer(
        #[case] question: &str,
        #[case] answer: &str,
        #[case] expected: ValidationError,
    ) {
        let mut it = item(TestItemType::ShortAnswerEssay, None);
        it.question = question.into();
        it.answer = answer.into();
        assert_eq!(normalize_test_item(it).unwrap_err(), expected);
    }

    #[test]
    fn appends_to_course_and_lesson_tests() {
        let c = course();
        let c = append_test_item(
            &c,
            None,
            VersionType::Diagnostic,
            item(TestItemType::MultipleChoice, Some(vec!["A", "B"])),
        )
        .unwrap();
        assert_eq!(c.course_tests.diagnostic.items.len(), 1);

        let c = append_test_item(
            &c,
            Some("L1"),
            VersionType::Summative,
            item(TestItemType::TrueFalse, Some(vec!["True", "False"])),
        )
        .unwrap();
        assert_eq!(c.lesson("L1").unwrap().tests.summative.items.len(), 1);
        assert_eq!(c.course_tests.summative.items.len(), 0);
    }

    #[test]
    fn rejected_item_leaves_course_unchanged() {
        let c = course();
        let mut bad = item(TestItemType::ShortAnswerEssay, None);
        bad.answer.clear();
        let err = append_test_item(&c, None, VersionType::Formative, bad).unwrap_err();
        assert_eq!(err, CourseError::Validation(ValidationError::EmptyAnswer));
        assert!(c.course_tests.formative.items.is_empty());

        let err = append_test_item(
            &c,
            Some("nope"),
            VersionType::Formative,
            item(TestItemType::FillInTheBlank, None),
        )
        .unwrap_err();
        assert!(matches!(err, CourseError::LessonNotFound { .. }));
    }
}

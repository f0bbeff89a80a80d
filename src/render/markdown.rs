//! Markdown serialization of rendered documents: a YAML frontmatter block
//! followed by a body whose headings carry stable anchors.

use std::collections::BTreeMap;

use github_slugger::Slugger;
use serde::Serialize;

use super::{
    ActivityBlock, LessonPlan, ObjectiveBlock, PoiOutline, ScriptSegment, SlideBlock, SlideDeck,
    Slot, TloBlock, TrainingSupportPackage, NOT_YET_DEFINED,
};
use crate::model::CourseStatus;

pub trait ToMarkdown {
    fn to_markdown(&self) -> Result<String, serde_yaml_ng::Error>;
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum Frontmatter<'a> {
    Text(&'a str),
    Number(u64),
    Status(CourseStatus),
    Headings(Vec<Heading>),
}

#[derive(Serialize, Debug)]
struct Heading {
    level: usize,
    slug: String,
    title: String,
}

#[derive(Default)]
struct Document {
    body: String,
    slugger: Slugger,
    headings: Vec<Heading>,
}

impl Document {
    fn heading(&mut self, level: usize, title: &str) {
        let slug = self.slugger.slug(title);
        self.body.push_str(&format!(
            "{} {} {{#{}}}\n\n",
            "#".repeat(level),
            title,
            slug
        ));
        self.headings.push(Heading {
            level,
            slug,
            title: title.to_string(),
        });
    }

    fn field(&mut self, label: &str, value: impl std::fmt::Display) {
        self.body.push_str(&format!("**{label}:** {value}\n\n"));
    }

    fn para(&mut self, text: &str) {
        self.body.push_str(text.trim());
        self.body.push_str("\n\n");
    }

    fn list(&mut self, items: &[String]) {
        if items.is_empty() {
            return self.para(NOT_YET_DEFINED);
        }
        for item in items {
            self.body.push_str(&format!("- {item}\n"));
        }
        self.body.push('\n');
    }

    fn finish(self, mut fm: BTreeMap<&str, Frontmatter>) -> Result<String, serde_yaml_ng::Error> {
        fm.insert("headings", Frontmatter::Headings(self.headings));
        Ok(format!(
            r#"---
{}---

{}"#,
            serde_yaml_ng::to_string(&fm)?,
            self.body
        ))
    }
}

fn write_tlo(doc: &mut Document, level: usize, tlo: &TloBlock) {
    doc.heading(level, "Terminal Learning Objective");
    doc.field("Action", &tlo.action);
    doc.field("Condition", &tlo.condition);
    doc.field("Standard", &tlo.standard);
}

fn write_activity(doc: &mut Document, level: usize, lsa: &ActivityBlock) {
    doc.heading(level, &lsa.title);
    doc.field("Method", &lsa.method);
    doc.field("Time", format!("{} min", lsa.time_minutes));
    doc.para(&lsa.description);
    doc.field("Guidance", &lsa.guidance);
    match &lsa.practical_exercise {
        Slot::Defined(pe) => {
            doc.field("Practical Exercise", format!("{} ({})", pe.title, pe.exercise_type));
            doc.para(&pe.description);
            doc.list(&pe.steps);
        }
        Slot::Undefined(placeholder) => doc.field("Practical Exercise", placeholder),
    }
    match &lsa.check_on_learning {
        Slot::Defined(check) => {
            doc.field("Check on Learning", &check.question);
            doc.field("Answer", &check.answer);
            doc.field("Remediation", &check.remediation);
        }
        Slot::Undefined(placeholder) => doc.field("Check on Learning", placeholder),
    }
}

fn write_objectives(doc: &mut Document, level: usize, objectives: &[ObjectiveBlock]) {
    if objectives.is_empty() {
        return doc.para(NOT_YET_DEFINED);
    }
    for elo in objectives {
        doc.heading(level, &format!("ELO {}: {}", elo.id, elo.title));
        for lsa in &elo.activities {
            write_activity(doc, level + 1, lsa);
        }
    }
}

fn write_slides(doc: &mut Document, level: usize, slides: &Slot<Vec<SlideBlock>>) {
    let slides = match slides {
        Slot::Defined(slides) => slides,
        Slot::Undefined(placeholder) => return doc.para(placeholder),
    };
    for slide in slides {
        doc.heading(level, &format!("Slide {}: {}", slide.number, slide.title));
        doc.list(&slide.bullet_points);
        doc.field("Instructor Notes", &slide.instructor_notes);
    }
}

fn write_poi_body(doc: &mut Document, level: usize, poi: &PoiOutline) {
    for lesson in &poi.lessons {
        doc.heading(
            level,
            &format!("Lesson {}: {}", lesson.number, lesson.title),
        );
        doc.field("Duration", format!("{} hours", lesson.duration_hours));
        write_tlo(doc, level + 1, &lesson.tlo);
        write_objectives(doc, level + 1, &lesson.objectives);
    }
}

impl ToMarkdown for PoiOutline {
    fn to_markdown(&self) -> Result<String, serde_yaml_ng::Error> {
        let mut doc = Document::default();
        doc.heading(1, &format!("Program of Instruction: {}", self.title));
        write_poi_body(&mut doc, 2, self);

        let mut fm = BTreeMap::new();
        fm.insert("title", Frontmatter::Text(&self.title));
        fm.insert("course_id", Frontmatter::Text(&self.course_id));
        fm.insert("mos", Frontmatter::Text(&self.mos));
        fm.insert("status", Frontmatter::Status(self.status));
        fm.insert("total_hours", Frontmatter::Number(self.total_hours.into()));
        doc.finish(fm)
    }
}

impl ToMarkdown for LessonPlan {
    fn to_markdown(&self) -> Result<String, serde_yaml_ng::Error> {
        let header = &self.header;
        let mut doc = Document::default();
        doc.heading(1, &format!("Lesson Plan: {}", header.lesson_title));
        doc.field("Course Title", &header.course_title);
        doc.field("Course Number", &header.course_number);
        doc.field("School/Proponent", &header.school_name);
        doc.field("Course Length", format!("{} hours", header.duration_hours));

        doc.heading(2, "Introduction");
        doc.field("Scope", &self.introduction.scope);
        doc.field("Target Audience", &self.introduction.target_audience);
        doc.field("Prerequisites", &self.introduction.prerequisites);
        doc.field("Safety", &self.introduction.safety_considerations);
        doc.field("Summary", &self.introduction.summary);

        write_tlo(&mut doc, 2, &self.tlo);

        doc.heading(2, "Enabling Learning Objectives & Activities");
        write_objectives(&mut doc, 3, &self.objectives);

        doc.heading(2, "Resources");
        doc.field("Media", &self.resources.media);
        doc.field("Ratio", &self.resources.ratio);
        doc.field("Special Instructor Qualifications", &self.resources.instructor_qualifications);
        doc.list(&self.resources.regulations);

        doc.heading(2, "Slide Deck");
        write_slides(&mut doc, 3, &self.slides);

        let mut fm = BTreeMap::new();
        fm.insert("title", Frontmatter::Text(&header.lesson_title));
        fm.insert("lesson_id", Frontmatter::Text(&header.lesson_id));
        fm.insert("course", Frontmatter::Text(&header.course_title));
        fm.insert("lesson_number", Frontmatter::Number(header.lesson_number as u64));
        fm.insert("duration_hours", Frontmatter::Number(header.duration_hours.into()));
        doc.finish(fm)
    }
}

impl ToMarkdown for TrainingSupportPackage {
    fn to_markdown(&self) -> Result<String, serde_yaml_ng::Error> {
        let cover = &self.cover;
        let mut doc = Document::default();
        doc.heading(1, &format!("Training Support Package: {}", cover.title));
        doc.field("Course Number", &cover.course_number);
        doc.field("School/Proponent", &cover.school_name);
        doc.field("MOS", &cover.mos);
        doc.field("Target Audience", &cover.audience);
        doc.field("Prepared", &cover.prepared);
        doc.para(&cover.description);

        doc.heading(2, "References");
        doc.list(&self.references);

        doc.heading(2, "Program of Instruction");
        write_poi_body(&mut doc, 3, &self.poi);

        doc.heading(2, "Instructor Scripts");
        for script in &self.scripts {
            doc.heading(
                3,
                &format!("Script, Lesson {}: {}", script.lesson_number, script.lesson_title),
            );
            match &script.segments {
                Slot::Defined(segments) => {
                    for segment in segments {
                        match segment {
                            ScriptSegment::Text(text) => doc.para(text),
                            ScriptSegment::SlideCue(n) => doc.para(&format!("> **[SHOW SLIDE {n}]**")),
                        }
                    }
                }
                Slot::Undefined(placeholder) => doc.para(placeholder),
            }
        }

        doc.heading(2, "Practical Exercises");
        if self.exercises.is_empty() {
            doc.para(NOT_YET_DEFINED);
        }
        for entry in &self.exercises {
            doc.heading(
                3,
                &format!("Lesson {}: {}", entry.lesson_number, entry.exercise.title),
            );
            doc.field("Activity", &entry.activity_title);
            doc.field("Type", &entry.exercise.exercise_type);
            doc.para(&entry.exercise.description);
            doc.list(&entry.exercise.steps);
            doc.field("Scoring", entry.exercise.scoring_criteria.join("; "));
        }

        doc.heading(2, "Tests");
        for test in &self.tests {
            doc.heading(3, &format!("{} Test", test.version_type));
            doc.field("Purpose", &test.purpose);
            if test.items.is_empty() {
                doc.para(NOT_YET_DEFINED);
            }
            for item in &test.items {
                doc.para(&format!(
                    "{}. ({}, {}) {}",
                    item.number, item.item_type, item.bloom_level, item.question
                ));
                for option in &item.options {
                    doc.body.push_str(&format!("   {}. {}\n", option.label, option.text));
                }
                if !item.options.is_empty() {
                    doc.body.push('\n');
                }
                doc.field("Answer", &item.answer);
                match &item.rubric {
                    Some(Slot::Defined(rubric)) => doc.field("Rubric", rubric),
                    Some(Slot::Undefined(placeholder)) => doc.field("Rubric", placeholder),
                    None => {}
                }
            }
        }

        let mut fm = BTreeMap::new();
        fm.insert("title", Frontmatter::Text(&cover.title));
        fm.insert("mos", Frontmatter::Text(&cover.mos));
        fm.insert("prepared", Frontmatter::Text(&cover.prepared));
        fm.insert("status", Frontmatter::Status(cover.status));
        fm.insert("total_hours", Frontmatter::Number(cover.total_hours.into()));
        fm.insert("lessons", Frontmatter::Number(cover.lesson_count as u64));
        doc.finish(fm)
    }
}

impl ToMarkdown for SlideDeck {
    fn to_markdown(&self) -> Result<String, serde_yaml_ng::Error> {
        let mut doc = Document::default();
        doc.heading(
            1,
            &format!("Slides, Lesson {}: {}", self.lesson_number, self.lesson_title),
        );
        write_slides(&mut doc, 2, &self.slides);

        let count = self.slides.defined().map_or(0, Vec::len);
        let mut fm = BTreeMap::new();
        fm.insert("title", Frontmatter::Text(&self.lesson_title));
        fm.insert("lesson_id", Frontmatter::Text(&self.lesson_id));
        fm.insert("slides", Frontmatter::Number(count as u64));
        doc.finish(fm)
    }
}

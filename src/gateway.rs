//! Boundary to the external content-generation service.
//!
//! A [`Gateway`] shapes each of the three requests (instruction text plus an
//! output-shape descriptor), hands it to a [`Transport`] as one blocking
//! request/response, and decodes the returned text into course types.

mod http;
mod prompt;
mod schema;
mod wire;

use std::fmt;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    assembly::{CourseForm, CourseSkeleton, LessonContent},
    model::{Course, Lesson, TestSet},
};

pub use http::HttpTransport;
pub use wire::{
    decode_course_structure, decode_course_tests, decode_lesson_detail, strip_code_fence,
    MAX_UNIT_DURATION,
};

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Failed to read response body: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generation service returned an error: {status}")]
    Server { status: u16 },

    #[error("generation service returned no content")]
    EmptyResponse,

    #[error("generated content is not valid JSON: {0}")]
    Malformed(serde_json::Error),

    #[error("generated content does not match the expected shape: {0}")]
    Shape(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    CourseStructure,
    LessonDetail,
    CourseTests,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequestKind::CourseStructure => "course_structure",
            RequestKind::LessonDetail => "lesson_detail",
            RequestKind::CourseTests => "course_tests",
        })
    }
}

/// One request as it goes over the wire: an instruction and the JSON shape
/// the answer must take.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub kind: RequestKind,
    pub prompt: String,
    pub schema: Value,
}

/// Carries a [`GenerationRequest`] to the service and returns the raw text
/// of its answer.
pub trait Transport {
    fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        (**self).complete(request)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        (**self).complete(request)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseStructureRequest {
    pub mos: String,
    pub topic: String,
    pub duration_hours: u32,
    pub reference_material: Option<String>,
    pub key_tasks: Option<String>,
}

impl From<&CourseForm> for CourseStructureRequest {
    fn from(form: &CourseForm) -> Self {
        Self {
            mos: form.mos.clone(),
            topic: form.topic.clone(),
            duration_hours: form.duration_hours,
            reference_material: form.reference_material.clone(),
            key_tasks: form.key_tasks.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LessonDetailRequest {
    pub course_title: String,
    pub lesson: Lesson,
    pub reference_material: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseTestsRequest {
    pub course: Course,
}

pub struct Gateway<T: Transport> {
    transport: T,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    fn dispatch(&self, kind: RequestKind, prompt: String, schema: Value) -> Result<String, GenerationError> {
        info!(%kind, prompt_len = prompt.len(), "generation request");
        let request = GenerationRequest {
            kind,
            prompt,
            schema,
        };
        let raw = self.transport.complete(&request)?;
        debug!(%kind, response_len = raw.len(), "generation response");
        Ok(raw)
    }

    pub fn course_structure(
        &self,
        request: &CourseStructureRequest,
    ) -> Result<CourseSkeleton, GenerationError> {
        let raw = self.dispatch(
            RequestKind::CourseStructure,
            prompt::course_structure(request),
            schema::course_structure(),
        )?;
        decode_course_structure(&raw)
    }

    pub fn lesson_detail(&self, request: &LessonDetailRequest) -> Result<LessonContent, GenerationError> {
        let raw = self.dispatch(
            RequestKind::LessonDetail,
            prompt::lesson_detail(request),
            schema::lesson_detail(),
        )?;
        decode_lesson_detail(&raw)
    }

    pub fn course_tests(&self, request: &CourseTestsRequest) -> Result<TestSet, GenerationError> {
        let raw = self.dispatch(
            RequestKind::CourseTests,
            prompt::course_tests(request),
            schema::course_tests(),
        )?;
        decode_course_tests(&raw)
    }
}

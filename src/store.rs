//! Persistence of the course collection as one JSON document under a fixed key.

use std::{
    cell::RefCell,
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use crate::model::Course;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access course store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("course store holds invalid data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads and saves the whole collection at once.
pub trait CourseStore {
    fn load(&self) -> Result<Vec<Course>, StoreError>;
    fn save(&self, courses: &[Course]) -> Result<(), StoreError>;
}

impl<S: CourseStore + ?Sized> CourseStore for &S {
    fn load(&self) -> Result<Vec<Course>, StoreError> {
        (**self).load()
    }

    fn save(&self, courses: &[Course]) -> Result<(), StoreError> {
        (**self).save(courses)
    }
}

/// Keeps the collection in `{dir}/{key}.json`. A missing file is an empty collection.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CourseStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Course>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        let courses: Vec<Course> = serde_json::from_str(&raw)?;
        debug!(path = %self.path.display(), courses = courses.len(), "loaded course store");
        Ok(courses)
    }

    fn save(&self, courses: &[Course]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        let content = serde_json::to_string_pretty(courses)?;
        fs::write(&self.path, content).map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), courses = courses.len(), "saved course store");
        Ok(())
    }
}

/// In-process store, mostly for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    courses: RefCell<Vec<Course>>,
    saves: RefCell<usize>,
}

impl MemoryStore {
    pub fn with_courses(courses: Vec<Course>) -> Self {
        Self {
            courses: RefCell::new(courses),
            saves: RefCell::new(0),
        }
    }

    /// Number of times [`CourseStore::save`] has been called.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl CourseStore for MemoryStore {
    fn load(&self) -> Result<Vec<Course>, StoreError> {
        Ok(self.courses.borrow().clone())
    }

    fn save(&self, courses: &[Course]) -> Result<(), StoreError> {
        *self.courses.borrow_mut() = courses.to_vec();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::{
        create_draft_lesson, merge_generated_skeleton, CourseForm, CourseSkeleton, LessonDraft,
        LessonSkeleton,
    };

    fn course(hours: &[u32]) -> Course {
        let lessons: Vec<LessonSkeleton> = hours
            .iter()
            .map(|h| {
                create_draft_lesson(LessonDraft {
                    duration_hours: Some(*h),
                    ..Default::default()
                })
                .into()
            })
            .collect();
        merge_generated_skeleton(&CourseForm::default(), CourseSkeleton::from_lessons(lessons)).unwrap()
    }

    #[test]
    fn missing_file_is_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path(), "army_courses");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn saved_collection_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested"), "army_courses");
        let courses = vec![course(&[2, 3]), course(&[8])];
        store.save(&courses).unwrap();
        assert!(store.path().ends_with("nested/army_courses.json"));
        assert_eq!(store.load().unwrap(), courses);
    }

    #[test]
    fn stored_total_is_recomputed_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path(), "army_courses");
        store.save(&[course(&[2, 3])]).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let tampered = raw.replace("\"totalDuration\": 5", "\"totalDuration\": 99");
        assert_ne!(raw, tampered);
        fs::write(store.path(), tampered).unwrap();

        assert_eq!(store.load().unwrap()[0].total_duration(), 5);
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path(), "army_courses");
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load().unwrap_err(), StoreError::Json(_)));
    }

    #[test]
    fn memory_store_counts_saves() {
        let store = MemoryStore::default();
        store.save(&[course(&[1])]).unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap().len(), 1);
    }
}

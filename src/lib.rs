//! Course authoring along the ADDIE model: analysis inputs become a Program of
//! Instruction, lessons are developed with generated content, and finished
//! courses render into lesson plans and training support packages.

pub mod assembly;
pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod reference;
pub mod render;
pub mod session;
pub mod store;
pub mod wizard;

pub use config::Config;
pub use error::{CourseError, ValidationError};
pub use gateway::{Gateway, GenerationError, HttpTransport, Transport};
pub use model::{Course, CourseStatus, Lesson};
pub use session::{Session, SessionError};
pub use store::{CourseStore, JsonFileStore, MemoryStore};
pub use wizard::{Wizard, WizardError, WizardPhase};

//! Core library surface for the Student Records Manager TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as the integration tests can reuse the same pieces.
pub mod catalog;
pub mod directory;
pub mod models;
pub mod ui;

/// The directory service owning the roster and edit selection, plus its
/// error type.
pub use directory::{DirectoryError, StudentDirectory};

/// The two domain types that other layers manipulate.
pub use models::{StudentDraft, StudentRecord};

/// The interactive application entry point and state container.
pub use ui::{run_app, App, StudentField, StudentForm};

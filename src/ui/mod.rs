//! Terminal user interface split across logical submodules.

mod app;
mod form;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use form::{StudentField, StudentForm};
pub use terminal::run_app;

//! Binary entry point that glues the in-memory directory to the TUI: we
//! construct the directory service, hydrate the initial app state, and drive
//! the Ratatui event loop until the user exits.
use student_records_manager::{run_app, App, StudentDirectory};

/// Construct the session's directory and launch the Ratatui event loop.
///
/// Returning a `Result` bubbles up fatal terminal-bootstrap problems to the
/// shell instead of crashing silently. The roster lives and dies with this
/// process; nothing is persisted.
fn main() -> anyhow::Result<()> {
    let directory = StudentDirectory::new();
    let mut app = App::new(directory);
    run_app(&mut app)
}

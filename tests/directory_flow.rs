//! End-to-end flow through the public surface: keystrokes into the App,
//! records out of the directory. No terminal is involved; the App's key
//! handler and the directory's streams carry the whole scenario.

use crossterm::event::KeyCode;
use student_records_manager::{catalog, App, StudentDirectory};

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.handle_key(KeyCode::Char(ch)).unwrap();
    }
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(code).unwrap();
}

#[test]
fn submit_edit_and_delete_round_trip() {
    let mut app = App::new(StudentDirectory::new());

    // Fill the form: the App starts focused on the full-name field.
    type_text(&mut app, "Asha");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "a@x.com");

    // Gender cycles Male -> Female; class year cycles 1st -> 2nd.
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);

    // Toggle the first catalog elective, then enter a free-text branch.
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "CSE");

    press(&mut app, KeyCode::Enter);

    let students = app.directory().students().to_vec();
    assert_eq!(students.len(), 1);
    let record = &students[0];
    assert_eq!(record.full_name, "Asha");
    assert_eq!(record.email, "a@x.com");
    assert_eq!(record.gender, "Female");
    assert_eq!(record.year, "2nd year");
    assert_eq!(record.electives, vec![catalog::ELECTIVES[0].to_string()]);
    assert_eq!(record.branch, "CSE");

    // A successful submit resets the form and ends any edit session.
    assert!(app.form().full_name().is_empty());
    assert!(app.form().selected_electives().is_empty());
    assert!(!app.form().is_editing());
    assert!(app.form().error().is_none());
    assert!(app.directory().student_to_edit().is_none());

    // Edit the record from the table: load, append to the name, resubmit.
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('e'));
    assert!(app.form().is_editing());
    assert_eq!(app.form().full_name(), "Asha");

    type_text(&mut app, " Rao");
    press(&mut app, KeyCode::Enter);

    let students = app.directory().students().to_vec();
    assert_eq!(students.len(), 1, "update replaces instead of appending");
    assert_eq!(students[0].id, record.id, "the id survives the update");
    assert_eq!(students[0].full_name, "Asha Rao");
    assert_eq!(students[0].electives, record.electives);
    assert!(!app.form().is_editing());

    // Delete through the confirmation dialog.
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('-'));
    press(&mut app, KeyCode::Char('y'));
    assert!(app.directory().students().is_empty());
}

#[test]
fn rejected_submit_leaves_the_directory_untouched() {
    let mut app = App::new(StudentDirectory::new());

    type_text(&mut app, "Ravi");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "not-an-email");
    press(&mut app, KeyCode::Enter);

    assert!(app.directory().students().is_empty());
    assert_eq!(app.form().error(), Some("Email address is not valid."));
    // The form keeps what was typed so the user can fix it.
    assert_eq!(app.form().full_name(), "Ravi");
    assert_eq!(app.form().email(), "not-an-email");
}

#[test]
fn branch_autocomplete_fills_from_the_catalog() {
    let mut app = App::new(StudentDirectory::new());

    type_text(&mut app, "Mina");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "mina@example.com");
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Down);

    // Jump to the branch field and accept the only "mech" suggestion.
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "mech");
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Tab);

    assert_eq!(app.form().branch(), "Mechanical Engineering (ME)");

    press(&mut app, KeyCode::Enter);
    let students = app.directory().students().to_vec();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].branch, "Mechanical Engineering (ME)");
    assert!(students[0].electives.is_empty());
}

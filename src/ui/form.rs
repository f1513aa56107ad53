//! Entry-form state: field focus, text editing, catalog-backed choices,
//! elective toggles, branch autocomplete, and the validation gate that turns
//! form contents into a [`StudentDraft`].

use std::collections::HashSet;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use email_address::EmailAddress;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use uuid::Uuid;

use crate::catalog;
use crate::models::{StudentDraft, StudentRecord};

/// Fields within the entry form, in focus-cycle order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StudentField {
    FullName,
    Email,
    Gender,
    Year,
    Electives,
    Branch,
}

impl Default for StudentField {
    fn default() -> Self {
        StudentField::FullName
    }
}

impl StudentField {
    fn next(self) -> Self {
        match self {
            StudentField::FullName => StudentField::Email,
            StudentField::Email => StudentField::Gender,
            StudentField::Gender => StudentField::Year,
            StudentField::Year => StudentField::Electives,
            StudentField::Electives => StudentField::Branch,
            StudentField::Branch => StudentField::FullName,
        }
    }

    fn previous(self) -> Self {
        match self {
            StudentField::FullName => StudentField::Branch,
            StudentField::Email => StudentField::FullName,
            StudentField::Gender => StudentField::Email,
            StudentField::Year => StudentField::Gender,
            StudentField::Electives => StudentField::Year,
            StudentField::Branch => StudentField::Electives,
        }
    }
}

/// Form state for creating or editing a student record.
///
/// Elective toggles are keyed by catalog name rather than by position, so the
/// toggle set can never fall out of alignment with the catalog. The branch
/// suggestions are recomputed on every edit of the branch text.
#[derive(Default)]
pub struct StudentForm {
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) gender: String,
    pub(crate) year: String,
    pub(crate) elective_selection: HashSet<&'static str>,
    pub(crate) branch: String,
    pub(crate) active: StudentField,
    pub(crate) elective_cursor: usize,
    pub(crate) suggestions: Vec<&'static str>,
    pub(crate) highlighted: Option<usize>,
    pub(crate) editing_id: Option<Uuid>,
    pub(crate) error: Option<String>,
}

impl StudentForm {
    /// Populate every field from an existing record and start an edit
    /// session under that record's id. Toggles are set exactly for the
    /// elective names present on the record.
    pub fn load_record(&mut self, record: &StudentRecord) {
        self.full_name = record.full_name.clone();
        self.email = record.email.clone();
        self.gender = record.gender.clone();
        self.year = record.year.clone();
        self.elective_selection = catalog::ELECTIVES
            .iter()
            .copied()
            .filter(|name| record.electives.iter().any(|chosen| chosen == name))
            .collect();
        self.branch = record.branch.clone();
        self.active = StudentField::FullName;
        self.elective_cursor = 0;
        self.refresh_suggestions();
        self.highlighted = None;
        self.editing_id = Some(record.id);
        self.error = None;
    }

    /// Reset the whole form to its pristine empty state, ending any edit
    /// session.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Id of the record being edited, if an edit session is active.
    pub fn editing_id(&self) -> Option<Uuid> {
        self.editing_id
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Currently focused field.
    pub fn active_field(&self) -> StudentField {
        self.active
    }

    /// Switch focus to a particular field.
    pub fn focus(&mut self, field: StudentField) {
        self.active = field;
        if field == StudentField::Branch {
            self.refresh_suggestions();
        }
    }

    /// Move focus to the next field in cycle order.
    pub fn next_field(&mut self) {
        self.focus(self.active.next());
    }

    /// Move focus to the previous field in cycle order.
    pub fn previous_field(&mut self) {
        self.focus(self.active.previous());
    }

    /// Append a character to the focused text field. Choice fields and the
    /// elective toggles ignore character input.
    pub fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            StudentField::FullName => self.full_name.push(ch),
            StudentField::Email => self.email.push(ch),
            StudentField::Branch => {
                self.branch.push(ch);
                self.refresh_suggestions();
                self.highlighted = None;
            }
            StudentField::Gender | StudentField::Year | StudentField::Electives => return false,
        }
        true
    }

    /// Remove the last character from the focused text field.
    pub fn backspace(&mut self) {
        match self.active {
            StudentField::FullName => {
                self.full_name.pop();
            }
            StudentField::Email => {
                self.email.pop();
            }
            StudentField::Branch => {
                self.branch.pop();
                self.refresh_suggestions();
                self.highlighted = None;
            }
            StudentField::Gender | StudentField::Year | StudentField::Electives => {}
        }
    }

    /// Up/Down behaviour for the focused field: cycle a choice, move the
    /// elective cursor, or move the suggestion highlight.
    pub fn select_next(&mut self) {
        self.step_selection(1);
    }

    pub fn select_previous(&mut self) {
        self.step_selection(-1);
    }

    fn step_selection(&mut self, step: isize) {
        match self.active {
            StudentField::Gender => {
                self.gender = cycle_catalog(&self.gender, catalog::GENDERS, step);
            }
            StudentField::Year => {
                self.year = cycle_catalog(&self.year, catalog::CLASS_YEARS, step);
            }
            StudentField::Electives => {
                let last = catalog::ELECTIVES.len() - 1;
                let cursor = self.elective_cursor as isize + step;
                self.elective_cursor = cursor.clamp(0, last as isize) as usize;
            }
            StudentField::Branch => {
                if self.suggestions.is_empty() {
                    self.highlighted = None;
                    return;
                }
                let len = self.suggestions.len() as isize;
                self.highlighted = Some(match self.highlighted {
                    None => {
                        if step >= 0 {
                            0
                        } else {
                            (len - 1) as usize
                        }
                    }
                    Some(current) => (current as isize + step).rem_euclid(len) as usize,
                });
            }
            StudentField::FullName | StudentField::Email => {}
        }
    }

    /// Toggle an elective by catalog name. Names outside the catalog are
    /// rejected, which keeps the selection a subset of the catalog. Returns
    /// whether the elective is selected afterwards.
    pub fn toggle_elective(&mut self, name: &str) -> bool {
        let Some(entry) = catalog::ELECTIVES.iter().copied().find(|entry| *entry == name)
        else {
            return false;
        };
        if self.elective_selection.remove(entry) {
            false
        } else {
            self.elective_selection.insert(entry);
            true
        }
    }

    /// Toggle the elective under the cursor.
    pub fn toggle_elective_at_cursor(&mut self) -> bool {
        self.toggle_elective(catalog::ELECTIVES[self.elective_cursor])
    }

    pub fn is_elective_selected(&self, name: &str) -> bool {
        self.elective_selection.contains(name)
    }

    /// Selected electives in catalog order, regardless of toggle order.
    pub fn selected_electives(&self) -> Vec<String> {
        catalog::ELECTIVES
            .iter()
            .filter(|name| self.elective_selection.contains(*name))
            .map(|name| name.to_string())
            .collect()
    }

    /// Current branch suggestions, already filtered against the catalog.
    pub fn suggestions(&self) -> &[&'static str] {
        &self.suggestions
    }

    /// Copy the highlighted suggestion into the branch field.
    pub fn accept_suggestion(&mut self) -> bool {
        if self.active != StudentField::Branch {
            return false;
        }
        let Some(candidate) = self
            .highlighted
            .and_then(|index| self.suggestions.get(index).copied())
        else {
            return false;
        };
        self.branch = candidate.to_string();
        self.refresh_suggestions();
        self.highlighted = None;
        true
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = catalog::filter_branches(&self.branch);
        if let Some(index) = self.highlighted {
            if index >= self.suggestions.len() {
                self.highlighted = None;
            }
        }
    }

    /// First validation failure in field order, if any.
    fn first_violation(&self) -> Option<(StudentField, &'static str)> {
        if self.full_name.trim().is_empty() {
            return Some((StudentField::FullName, "Full name is required."));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Some((StudentField::Email, "Email is required."));
        }
        if EmailAddress::from_str(email).is_err() {
            return Some((StudentField::Email, "Email address is not valid."));
        }
        if self.gender.is_empty() {
            return Some((StudentField::Gender, "Gender is required."));
        }
        if self.year.is_empty() {
            return Some((StudentField::Year, "Class year is required."));
        }
        None
    }

    /// Move focus onto the field that is blocking submission, if any.
    pub fn focus_first_invalid(&mut self) {
        if let Some((field, _)) = self.first_violation() {
            self.active = field;
        }
    }

    /// Whether a field should render as invalid. Only meaningful once a
    /// rejected submit stored an error.
    pub(crate) fn is_invalid(&self, field: StudentField) -> bool {
        self.error.is_some()
            && self
                .first_violation()
                .map(|(invalid, _)| invalid == field)
                .unwrap_or(false)
    }

    /// Validate the inputs and return a draft ready for the directory.
    /// Nothing is mutated on failure; the caller decides whether to store
    /// the error for display.
    pub fn parse_inputs(&self) -> Result<StudentDraft> {
        if let Some((_, message)) = self.first_violation() {
            return Err(anyhow!(message));
        }
        Ok(StudentDraft {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            gender: self.gender.clone(),
            year: self.year.clone(),
            electives: self.selected_electives(),
            branch: self.branch.trim().to_string(),
        })
    }

    /// Render a styled line for a scalar field.
    pub(crate) fn build_line(&self, field_name: &str, field: StudentField) -> Line<'static> {
        let (value, placeholder) = match field {
            StudentField::FullName => (self.full_name.clone(), "<required>"),
            StudentField::Email => (self.email.clone(), "<required>"),
            StudentField::Gender => (self.gender.clone(), "<press Space to choose>"),
            StudentField::Year => (self.year.clone(), "<press Space to choose>"),
            StudentField::Branch => (self.branch.clone(), "<optional>"),
            StudentField::Electives => (String::new(), ""),
        };
        let is_active = self.active == field;

        let display = if value.is_empty() {
            placeholder.to_string()
        } else {
            value
        };

        let style = if self.is_invalid(field) {
            Style::default().fg(Color::Red)
        } else if is_active {
            Style::default().fg(Color::Yellow)
        } else if display.starts_with('<') {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Render one checkbox line per catalog elective.
    pub(crate) fn build_elective_lines(&self) -> Vec<Line<'static>> {
        let focused = self.active == StudentField::Electives;
        catalog::ELECTIVES
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let marker = if self.elective_selection.contains(name) {
                    "[x]"
                } else {
                    "[ ]"
                };
                let style = if focused && index == self.elective_cursor {
                    Style::default().fg(Color::Yellow)
                } else if self.elective_selection.contains(name) {
                    Style::default()
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Line::from(Span::styled(format!("  {marker} {name}"), style))
            })
            .collect()
    }

    /// Render the suggestion dropdown shown under the branch field.
    pub(crate) fn build_suggestion_lines(&self) -> Vec<Line<'static>> {
        if self.active != StudentField::Branch {
            return Vec::new();
        }
        self.suggestions
            .iter()
            .enumerate()
            .map(|(index, suggestion)| {
                let style = if self.highlighted == Some(index) {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Line::from(Span::styled(format!("    > {suggestion}"), style))
            })
            .collect()
    }

    /// Character count of a text field, for cursor placement.
    pub(crate) fn value_len(&self, field: StudentField) -> usize {
        match field {
            StudentField::FullName => self.full_name.chars().count(),
            StudentField::Email => self.email.chars().count(),
            StudentField::Branch => self.branch.chars().count(),
            StudentField::Gender | StudentField::Year | StudentField::Electives => 0,
        }
    }
}

/// State for confirming a student's removal from the directory.
#[derive(Clone)]
pub(crate) struct ConfirmStudentDelete {
    pub(crate) id: Uuid,
    pub(crate) full_name: String,
}

impl ConfirmStudentDelete {
    /// Build the confirmation state from the record being considered.
    pub(crate) fn from(record: StudentRecord) -> Self {
        Self {
            id: record.id,
            full_name: record.full_name,
        }
    }
}

/// Step through a catalog of choices, treating the empty string as "unset".
/// Stepping forward from unset lands on the first entry, stepping backward on
/// the last; otherwise the selection wraps around.
fn cycle_catalog(current: &str, choices: &[&str], step: isize) -> String {
    let len = choices.len() as isize;
    let next = match choices.iter().position(|choice| *choice == current) {
        None => {
            if step >= 0 {
                0
            } else {
                (len - 1) as usize
            }
        }
        Some(index) => (index as isize + step).rem_euclid(len) as usize,
    };
    choices[next].to_string()
}

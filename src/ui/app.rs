//! Central application state shared across the TUI: which pane has focus,
//! which modal is open, how keys are dispatched, and how both panes and the
//! footer are rendered. The App owns the directory and both panes; the panes
//! converge on the directory's state by draining their subscription channels
//! after every key that may have touched it.

use std::mem;
use std::sync::mpsc::Receiver;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::directory::StudentDirectory;
use crate::models::StudentRecord;

use super::form::{ConfirmStudentDelete, StudentField, StudentForm};
use super::helpers::{centered_rect, surface_error};
use super::screens::DirectoryScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// Which pane currently receives plain key presses.
enum Focus {
    Form,
    Directory,
}

/// Fine-grained modes layered on top of the pane focus.
enum Mode {
    Normal,
    ConfirmDelete(ConfirmStudentDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    directory: StudentDirectory,
    form: StudentForm,
    screen: DirectoryScreen,
    roster_rx: Receiver<Vec<StudentRecord>>,
    edit_rx: Receiver<Option<StudentRecord>>,
    focus: Focus,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Wire both panes up to the directory's streams and deliver the initial
    /// snapshots so the first draw already reflects the directory.
    pub fn new(mut directory: StudentDirectory) -> Self {
        let roster_rx = directory.subscribe_students();
        let edit_rx = directory.subscribe_edit_selection();
        let mut app = Self {
            directory,
            form: StudentForm::default(),
            screen: DirectoryScreen::new(),
            roster_rx,
            edit_rx,
            focus: Focus::Form,
            mode: Mode::Normal,
            status: None,
        };
        app.pump_subscriptions();
        app
    }

    /// Read-only access to the directory, mainly for assertions and tooling.
    pub fn directory(&self) -> &StudentDirectory {
        &self.directory
    }

    /// Read-only access to the entry form.
    pub fn form(&self) -> &StudentForm {
        &self.form
    }

    /// Drain both subscription channels. The roster pane replaces its rows
    /// wholesale per emission; the form loads or clears per edit selection.
    fn pump_subscriptions(&mut self) {
        while let Ok(snapshot) = self.roster_rx.try_recv() {
            self.screen.set_rows(snapshot);
        }
        while let Ok(selection) = self.edit_rx.try_recv() {
            match selection {
                Some(record) => {
                    self.form.load_record(&record);
                    self.focus = Focus::Form;
                }
                None => self.form.clear(),
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        self.pump_subscriptions();
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.focus {
            Focus::Form => self.handle_form_key(code),
            Focus::Directory => self.handle_directory_key(code, exit),
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                if self.form.is_editing() {
                    self.directory.clear_student_to_edit();
                    self.set_status("Edit cancelled.", StatusKind::Info);
                } else {
                    self.form.clear();
                    self.focus = Focus::Directory;
                }
            }
            KeyCode::Tab => {
                if !self.form.accept_suggestion() {
                    self.form.next_field();
                }
            }
            KeyCode::BackTab => self.form.previous_field(),
            KeyCode::Up => self.form.select_previous(),
            KeyCode::Down => self.form.select_next(),
            KeyCode::Left => {
                if matches!(
                    self.form.active_field(),
                    StudentField::Gender | StudentField::Year
                ) {
                    self.form.select_previous();
                }
            }
            KeyCode::Right => {
                if matches!(
                    self.form.active_field(),
                    StudentField::Gender | StudentField::Year
                ) {
                    self.form.select_next();
                }
            }
            KeyCode::Enter => {
                if let Err(err) = self.submit_form() {
                    let message = surface_error(&err);
                    self.form.error = Some(message.clone());
                    self.form.focus_first_invalid();
                    self.set_status(message, StatusKind::Error);
                }
            }
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(' ') => match self.form.active_field() {
                StudentField::Electives => {
                    self.form.toggle_elective_at_cursor();
                }
                StudentField::Gender | StudentField::Year => self.form.select_next(),
                _ => {
                    if self.form.push_char(' ') {
                        self.form.error = None;
                    }
                }
            },
            KeyCode::Char(ch) => {
                if self.form.push_char(ch) {
                    self.form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_directory_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.screen.move_selection(-1),
            KeyCode::Down => self.screen.move_selection(1),
            KeyCode::PageUp => self.screen.page_up(),
            KeyCode::PageDown => self.screen.page_down(),
            KeyCode::Home => self.screen.select_first(),
            KeyCode::End => self.screen.select_last(),
            KeyCode::Tab => {
                self.focus = Focus::Form;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                let message = match self.screen.cycle_sort_column() {
                    Some(column) => format!("Sorting by {}.", column.label()),
                    None => "Showing insertion order.".to_string(),
                };
                self.set_status(message, StatusKind::Info);
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                if self.screen.toggle_sort_direction() {
                    let direction = if self.screen.descending {
                        "descending"
                    } else {
                        "ascending"
                    };
                    self.set_status(format!("Sort direction {direction}."), StatusKind::Info);
                } else {
                    self.set_status("Pick a sort column first.", StatusKind::Error);
                }
            }
            KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(record) = self.screen.current_student().cloned() {
                    self.clear_status();
                    self.directory.set_student_to_edit(record);
                } else {
                    self.set_status("No student selected to edit.", StatusKind::Error);
                }
            }
            KeyCode::Char('-') | KeyCode::Delete => {
                if let Some(record) = self.screen.current_student().cloned() {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(ConfirmStudentDelete::from(record)));
                } else {
                    self.set_status("No student selected to remove.", StatusKind::Error);
                }
            }
            KeyCode::Char('+') | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.clear_status();
                if self.form.is_editing() {
                    self.directory.clear_student_to_edit();
                }
                self.focus = Focus::Form;
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_confirm_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmStudentDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(_) => Ok(Mode::Normal),
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::Normal)
                    }
                }
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    /// Jump focus to the entry form from anywhere outside a modal.
    pub(crate) fn handle_ctrl_e(&mut self) -> Result<()> {
        if matches!(self.mode, Mode::Normal) {
            self.focus = Focus::Form;
        }
        Ok(())
    }

    /// Jump focus to the directory table from anywhere outside a modal.
    pub(crate) fn handle_ctrl_l(&mut self) -> Result<()> {
        if matches!(self.mode, Mode::Normal) {
            self.focus = Focus::Directory;
        }
        Ok(())
    }

    /// Validate the form and route the draft to the directory: update when an
    /// edit session is active, add otherwise. A successful write always ends
    /// the edit session, which in turn resets the form through its stream.
    fn submit_form(&mut self) -> Result<()> {
        let draft = self.form.parse_inputs()?;
        let record = match self.form.editing_id() {
            Some(id) => self.directory.update_student(id, draft)?,
            None => self.directory.add_student(draft),
        };
        self.directory.clear_student_to_edit();
        self.set_status(
            format!("Saved record for {}.", record.full_name),
            StatusKind::Info,
        );
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmStudentDelete) -> Result<()> {
        let record = self.directory.delete_student(confirm.id)?;
        // Deleting the record that is loaded in the form ends that edit
        // session instead of leaving a doomed update behind.
        if self.form.editing_id() == Some(confirm.id) {
            self.directory.clear_student_to_edit();
        }
        self.set_status(
            format!("Deleted record for {}.", record.full_name),
            StatusKind::Info,
        );
        Ok(())
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
            .split(content_area);
        self.draw_form_pane(frame, panes[0]);
        self.draw_directory_pane(frame, panes[1]);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if let Mode::ConfirmDelete(confirm) = &self.mode {
            self.draw_confirm_delete(frame, area, confirm);
        }
    }

    fn draw_form_pane(&self, frame: &mut Frame, area: Rect) {
        let title = if self.form.is_editing() {
            "Edit Student"
        } else {
            "New Student"
        };
        let mut block = Block::default().borders(Borders::ALL).title(title);
        if matches!(self.focus, Focus::Form) {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let electives_style = if self.form.active_field() == StudentField::Electives {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        let mut lines = vec![
            self.form.build_line("Full name", StudentField::FullName),
            self.form.build_line("Email", StudentField::Email),
            self.form.build_line("Gender", StudentField::Gender),
            self.form.build_line("Class year", StudentField::Year),
            Line::from(""),
            Line::from(Span::styled("Electives:", electives_style)),
        ];
        lines.extend(self.form.build_elective_lines());
        lines.push(Line::from(""));
        lines.push(self.form.build_line("Branch", StudentField::Branch));
        lines.extend(self.form.build_suggestion_lines());
        lines.push(Line::from(""));
        if let Some(error) = self.form.error() {
            lines.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to accept/switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        // No wrapping: the cursor math below assumes one row per line.
        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        if matches!(self.focus, Focus::Form) {
            let cursor = match self.form.active_field() {
                StudentField::FullName => Some(("Full name: ", 0u16)),
                StudentField::Email => Some(("Email: ", 1)),
                StudentField::Branch => Some(("Branch: ", 12)),
                _ => None,
            };
            if let Some((prefix, row)) = cursor {
                let x = inner.x
                    + prefix.len() as u16
                    + self.form.value_len(self.form.active_field()) as u16;
                let y = inner.y + row;
                if y < inner.y + inner.height {
                    frame.set_cursor_position((x, y));
                }
            }
        }
    }

    fn draw_directory_pane(&self, frame: &mut Frame, area: Rect) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Students ({})", self.screen.rows.len()));
        if matches!(self.focus, Focus::Directory) {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);
        if inner.height < 2 {
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        if self.screen.rows.is_empty() {
            let message = Paragraph::new("No students yet. Fill the form and press Enter.")
                .alignment(Alignment::Center);
            frame.render_widget(message, chunks[0]);
        } else {
            let view = self.screen.view();
            let (start, end) = self.screen.visible_range();
            let header = Row::new(vec![
                "Full name",
                "Email",
                "Gender",
                "Year",
                "Electives",
                "Branch",
            ])
            .style(Style::default().add_modifier(Modifier::BOLD));

            let rows: Vec<Row> = view[start..end]
                .iter()
                .enumerate()
                .map(|(offset, record)| {
                    let mut row = Row::new(vec![
                        record.full_name.clone(),
                        record.email.clone(),
                        record.gender.clone(),
                        record.year.clone(),
                        record.electives_summary(),
                        record.branch.clone(),
                    ]);
                    if start + offset == self.screen.selected {
                        row = row.style(Style::default().add_modifier(Modifier::REVERSED));
                    }
                    row
                })
                .collect();

            let widths = [
                Constraint::Percentage(18),
                Constraint::Percentage(22),
                Constraint::Percentage(10),
                Constraint::Percentage(12),
                Constraint::Percentage(24),
                Constraint::Percentage(14),
            ];
            let table = Table::new(rows, widths).header(header).column_spacing(1);
            frame.render_widget(table, chunks[0]);
        }

        let sort_label = match self.screen.sort {
            Some(column) => format!(
                "sort: {} {}",
                column.label(),
                if self.screen.descending { "desc" } else { "asc" }
            ),
            None => "sort: insertion order".to_string(),
        };
        let info = Line::from(Span::styled(
            format!(
                "Page {}/{}  {}",
                self.screen.page() + 1,
                self.screen.page_count(),
                sort_label
            ),
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(info), chunks[1]);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.mode, &self.focus) {
            (Mode::ConfirmDelete(_), _) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[N/Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Focus::Form) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next field   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Choose   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Toggle   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel   "),
                Span::styled("[Ctrl+L]", key_style),
                Span::raw(" Table"),
            ]),
            (_, Focus::Directory) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[PgUp/PgDn]", key_style),
                Span::raw(" Page   "),
                Span::styled("[s]", key_style),
                Span::raw(" Sort   "),
                Span::styled("[o]", key_style),
                Span::raw(" Order   "),
                Span::styled("[e]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[-]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[Ctrl+E]", key_style),
                Span::raw(" Form   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmStudentDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete the record for {}?", confirm.full_name)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

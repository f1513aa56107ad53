//! The student directory: single source of truth for the roster and for the
//! record currently loaded into the entry form. Every function in this module
//! encapsulates one mutation or subscription so the rest of the codebase can
//! stay focused on UI state management.
//!
//! Interested parties subscribe to plain `mpsc` channels and poll them from
//! the event loop. Each mutation pushes a fresh snapshot, in operation order,
//! so subscribers never observe a half-applied change and never need access
//! to the directory itself.

use std::sync::mpsc::{channel, Receiver, Sender};

use thiserror::Error;
use uuid::Uuid;

use crate::models::{StudentDraft, StudentRecord};

/// Failures reported by roster mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// An update or delete referenced an id that is not in the roster. This
    /// is reported instead of silently ignored so stale UI state surfaces as
    /// a visible error.
    #[error("no student record with id {id}")]
    NotFound { id: Uuid },
}

/// Owner of the authoritative in-memory student collection plus the "which
/// record is being edited" selection. Constructed once per session and passed
/// by reference; the form and table panes never hold their own copies beyond
/// the snapshots they receive.
#[derive(Default)]
pub struct StudentDirectory {
    students: Vec<StudentRecord>,
    editing: Option<StudentRecord>,
    roster_subscribers: Vec<Sender<Vec<StudentRecord>>>,
    edit_subscribers: Vec<Sender<Option<StudentRecord>>>,
}

impl StudentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to roster snapshots. The current roster is delivered
    /// immediately, then once after every add/update/delete.
    pub fn subscribe_students(&mut self) -> Receiver<Vec<StudentRecord>> {
        let (tx, rx) = channel();
        // The receiver is held by the caller, so this send cannot fail yet.
        let _ = tx.send(self.students.clone());
        self.roster_subscribers.push(tx);
        rx
    }

    /// Subscribe to the edit selection. `None` is the idle state; the current
    /// value is delivered immediately, then once per select/clear.
    pub fn subscribe_edit_selection(&mut self) -> Receiver<Option<StudentRecord>> {
        let (tx, rx) = channel();
        let _ = tx.send(self.editing.clone());
        self.edit_subscribers.push(tx);
        rx
    }

    /// Synchronous view of the roster for callers that do not need a stream.
    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    /// The record currently loaded for editing, if any.
    pub fn student_to_edit(&self) -> Option<&StudentRecord> {
        self.editing.as_ref()
    }

    /// Stamp a fresh id onto the draft, append the record, and notify roster
    /// subscribers. We echo the hydrated record so callers can report on it
    /// without re-querying the roster.
    pub fn add_student(&mut self, draft: StudentDraft) -> StudentRecord {
        let record = draft.into_record(Uuid::new_v4());
        self.students.push(record.clone());
        self.publish_roster();
        record
    }

    /// Replace the record with the matching id wholesale, keeping the id and
    /// the roster position. Surfaces an explicit error when zero records are
    /// touched.
    pub fn update_student(
        &mut self,
        id: Uuid,
        draft: StudentDraft,
    ) -> Result<StudentRecord, DirectoryError> {
        let slot = self
            .students
            .iter_mut()
            .find(|student| student.id == id)
            .ok_or(DirectoryError::NotFound { id })?;
        *slot = draft.into_record(id);
        let record = slot.clone();
        self.publish_roster();
        Ok(record)
    }

    /// Remove the record with the matching id and hand it back for status
    /// reporting. Surfaces an explicit error when the id is unknown; the
    /// roster is left untouched in that case.
    pub fn delete_student(&mut self, id: Uuid) -> Result<StudentRecord, DirectoryError> {
        let index = self
            .students
            .iter()
            .position(|student| student.id == id)
            .ok_or(DirectoryError::NotFound { id })?;
        let record = self.students.remove(index);
        self.publish_roster();
        Ok(record)
    }

    /// Publish a record as the current edit target.
    pub fn set_student_to_edit(&mut self, record: StudentRecord) {
        self.editing = Some(record);
        self.publish_edit_selection();
    }

    /// Return the edit selection to idle. Emits unconditionally so
    /// subscribers can treat every emission as the latest truth.
    pub fn clear_student_to_edit(&mut self) {
        self.editing = None;
        self.publish_edit_selection();
    }

    fn publish_roster(&mut self) {
        let snapshot = self.students.clone();
        self.roster_subscribers
            .retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
    }

    fn publish_edit_selection(&mut self) {
        let snapshot = self.editing.clone();
        self.edit_subscribers
            .retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> StudentDraft {
        StudentDraft {
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            gender: "Other".to_string(),
            year: "1st year".to_string(),
            electives: Vec::new(),
            branch: String::new(),
        }
    }

    #[test]
    fn subscribe_delivers_initial_snapshots() {
        let mut directory = StudentDirectory::new();
        let roster = directory.subscribe_students();
        let editing = directory.subscribe_edit_selection();

        assert_eq!(roster.recv().unwrap(), Vec::new());
        assert_eq!(editing.recv().unwrap(), None);
    }

    #[test]
    fn add_appends_and_notifies_with_unique_ids() {
        let mut directory = StudentDirectory::new();
        let roster = directory.subscribe_students();
        roster.recv().unwrap();

        let asha = directory.add_student(draft("Asha"));
        let ravi = directory.add_student(draft("Ravi"));
        assert_ne!(asha.id, ravi.id);

        let after_first = roster.recv().unwrap();
        assert_eq!(after_first, vec![asha.clone()]);
        assert_eq!(
            after_first.iter().filter(|s| s.id == asha.id).count(),
            1,
            "record appears exactly once"
        );

        let after_second = roster.recv().unwrap();
        assert_eq!(after_second, vec![asha, ravi]);
    }

    #[test]
    fn update_replaces_only_the_matching_record() {
        let mut directory = StudentDirectory::new();
        let asha = directory.add_student(draft("Asha"));
        let ravi = directory.add_student(draft("Ravi"));

        let roster = directory.subscribe_students();
        roster.recv().unwrap();

        let mut changed = draft("Asha");
        changed.branch = "Computer Science & Engineering (CSE)".to_string();
        let updated = directory.update_student(asha.id, changed).unwrap();
        assert_eq!(updated.id, asha.id);

        let snapshot = roster.recv().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0], updated);
        assert_eq!(snapshot[1], ravi, "other records are untouched");
    }

    #[test]
    fn update_unknown_id_reports_not_found() {
        let mut directory = StudentDirectory::new();
        directory.add_student(draft("Asha"));

        let missing = Uuid::new_v4();
        let err = directory.update_student(missing, draft("Ghost")).unwrap_err();
        assert_eq!(err, DirectoryError::NotFound { id: missing });
        assert_eq!(directory.students().len(), 1);
    }

    #[test]
    fn delete_removes_exactly_one_record() {
        let mut directory = StudentDirectory::new();
        let asha = directory.add_student(draft("Asha"));
        let ravi = directory.add_student(draft("Ravi"));

        let removed = directory.delete_student(asha.id).unwrap();
        assert_eq!(removed.id, asha.id);
        assert_eq!(directory.students(), &[ravi]);
    }

    #[test]
    fn delete_unknown_id_leaves_roster_unchanged() {
        let mut directory = StudentDirectory::new();
        let asha = directory.add_student(draft("Asha"));

        let missing = Uuid::new_v4();
        let err = directory.delete_student(missing).unwrap_err();
        assert_eq!(err, DirectoryError::NotFound { id: missing });
        assert_eq!(directory.students(), &[asha]);
    }

    #[test]
    fn edit_selection_round_trips_select_and_clear() {
        let mut directory = StudentDirectory::new();
        let asha = directory.add_student(draft("Asha"));

        let editing = directory.subscribe_edit_selection();
        assert_eq!(editing.recv().unwrap(), None);

        directory.set_student_to_edit(asha.clone());
        assert_eq!(editing.recv().unwrap(), Some(asha.clone()));
        assert_eq!(directory.student_to_edit(), Some(&asha));

        directory.clear_student_to_edit();
        assert_eq!(editing.recv().unwrap(), None);
        assert_eq!(directory.student_to_edit(), None);
    }

    #[test]
    fn snapshots_arrive_in_operation_order() {
        let mut directory = StudentDirectory::new();
        let roster = directory.subscribe_students();
        roster.recv().unwrap();

        let asha = directory.add_student(draft("Asha"));
        directory.add_student(draft("Ravi"));
        directory.delete_student(asha.id).unwrap();

        let lengths: Vec<usize> = [
            roster.recv().unwrap(),
            roster.recv().unwrap(),
            roster.recv().unwrap(),
        ]
        .iter()
        .map(Vec::len)
        .collect();
        assert_eq!(lengths, vec![1, 2, 1]);
    }
}

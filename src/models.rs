//! Domain models passed throughout the TUI. The intent is that these types
//! stay light-weight data holders so other layers can focus on presentation
//! and directory state management. Keeping the commentary here means later
//! refactors can reconstruct the assumptions even if other context is lost.

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One student's stored data. A record is immutable once constructed; edits
/// replace the whole record under the same id.
pub struct StudentRecord {
    /// Assigned by the directory when the record is created and never
    /// reassigned afterwards. Edit and delete flows bubble this id back to
    /// the directory.
    pub id: Uuid,
    /// Full name shown in the table and used as the default sort key.
    pub full_name: String,
    /// Contact email. Syntactically checked by the entry form before the
    /// record is accepted.
    pub email: String,
    /// One of the gender choices from the catalog.
    pub gender: String,
    /// One of the class-year choices from the catalog.
    pub year: String,
    /// Elective names, always a subset of the elective catalog and kept in
    /// catalog order.
    pub electives: Vec<String>,
    /// Engineering branch. Free text assisted by autocomplete; may be empty.
    pub branch: String,
}

impl StudentRecord {
    /// Compose a comma-separated elective summary that gracefully falls back
    /// to a dash when nothing was selected. Table cells rely on this
    /// ready-to-use formatting.
    pub fn electives_summary(&self) -> String {
        if self.electives.is_empty() {
            "-".to_string()
        } else {
            self.electives.join(", ")
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Validated output of the entry form: a record minus its id. Drafts carry no
/// id at all, so a caller can never smuggle a placeholder id past the
/// directory; the directory stamps one at creation time.
pub struct StudentDraft {
    pub full_name: String,
    pub email: String,
    pub gender: String,
    pub year: String,
    pub electives: Vec<String>,
    pub branch: String,
}

impl StudentDraft {
    /// Hydrate a full record from this draft under the given id.
    pub fn into_record(self, id: Uuid) -> StudentRecord {
        StudentRecord {
            id,
            full_name: self.full_name,
            email: self.email,
            gender: self.gender,
            year: self.year,
            electives: self.electives,
            branch: self.branch,
        }
    }
}

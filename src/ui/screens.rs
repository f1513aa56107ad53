//! Directory table state. The table never owns the truth: every roster
//! snapshot from the directory wholesale-replaces its rows, and sorting and
//! pagination are applied to a derived view so the authoritative order stays
//! untouched.

use crate::models::StudentRecord;

/// Rows shown per table page.
pub(crate) const PAGE_SIZE: usize = 8;

/// Columns the table can sort by.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum SortColumn {
    FullName,
    Email,
    Gender,
    Year,
    Branch,
}

impl SortColumn {
    pub(crate) fn label(self) -> &'static str {
        match self {
            SortColumn::FullName => "full name",
            SortColumn::Email => "email",
            SortColumn::Gender => "gender",
            SortColumn::Year => "year",
            SortColumn::Branch => "branch",
        }
    }

    fn key(self, record: &StudentRecord) -> &str {
        match self {
            SortColumn::FullName => &record.full_name,
            SortColumn::Email => &record.email,
            SortColumn::Gender => &record.gender,
            SortColumn::Year => &record.year,
            SortColumn::Branch => &record.branch,
        }
    }
}

/// Backing state for the student table pane.
pub(crate) struct DirectoryScreen {
    pub(crate) rows: Vec<StudentRecord>,
    pub(crate) sort: Option<SortColumn>,
    pub(crate) descending: bool,
    pub(crate) selected: usize,
}

impl DirectoryScreen {
    pub(crate) fn new() -> Self {
        Self {
            rows: Vec::new(),
            sort: None,
            descending: false,
            selected: 0,
        }
    }

    /// Replace the backing rows with a fresh roster snapshot. No diffing; the
    /// directory's emission is the whole truth.
    pub(crate) fn set_rows(&mut self, rows: Vec<StudentRecord>) {
        self.rows = rows;
        self.ensure_in_bounds();
    }

    /// The rows in display order: insertion order until a sort column is
    /// chosen, then a stable case-insensitive sort on that column.
    pub(crate) fn view(&self) -> Vec<&StudentRecord> {
        let mut view: Vec<&StudentRecord> = self.rows.iter().collect();
        if let Some(column) = self.sort {
            view.sort_by(|a, b| {
                let ordering = column
                    .key(a)
                    .to_lowercase()
                    .cmp(&column.key(b).to_lowercase());
                if self.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        view
    }

    /// Advance to the next sort column: insertion order, then each column in
    /// turn. Direction resets to ascending on every change.
    pub(crate) fn cycle_sort_column(&mut self) -> Option<SortColumn> {
        self.sort = match self.sort {
            None => Some(SortColumn::FullName),
            Some(SortColumn::FullName) => Some(SortColumn::Email),
            Some(SortColumn::Email) => Some(SortColumn::Gender),
            Some(SortColumn::Gender) => Some(SortColumn::Year),
            Some(SortColumn::Year) => Some(SortColumn::Branch),
            Some(SortColumn::Branch) => None,
        };
        self.descending = false;
        self.sort
    }

    /// Flip the sort direction. Meaningless without a sort column, so it
    /// reports whether anything changed.
    pub(crate) fn toggle_sort_direction(&mut self) -> bool {
        if self.sort.is_none() {
            return false;
        }
        self.descending = !self.descending;
        true
    }

    /// The record under the selection, in display order.
    pub(crate) fn current_student(&self) -> Option<&StudentRecord> {
        self.view().get(self.selected).copied()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() as isize - 1;
        let new = (self.selected as isize + offset).clamp(0, last);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        if !self.rows.is_empty() {
            self.selected = self.rows.len() - 1;
        }
    }

    pub(crate) fn page_up(&mut self) {
        self.move_selection(-(PAGE_SIZE as isize));
    }

    pub(crate) fn page_down(&mut self) {
        self.move_selection(PAGE_SIZE as isize);
    }

    /// Page containing the selection, zero-based.
    pub(crate) fn page(&self) -> usize {
        self.selected / PAGE_SIZE
    }

    pub(crate) fn page_count(&self) -> usize {
        self.rows.len().div_ceil(PAGE_SIZE).max(1)
    }

    /// Bounds of the visible slice of the display-order view.
    pub(crate) fn visible_range(&self) -> (usize, usize) {
        let start = self.page() * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(self.rows.len());
        (start, end)
    }

    fn ensure_in_bounds(&mut self) {
        if self.rows.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.rows.len() {
            self.selected = self.rows.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn record(name: &str, email: &str) -> StudentRecord {
        StudentRecord {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            email: email.to_string(),
            gender: "Other".to_string(),
            year: "1st year".to_string(),
            electives: Vec::new(),
            branch: String::new(),
        }
    }

    #[test]
    fn set_rows_replaces_wholesale_and_clamps_selection() {
        let mut screen = DirectoryScreen::new();
        screen.set_rows(vec![
            record("Asha", "asha@example.com"),
            record("Ravi", "ravi@example.com"),
            record("Mina", "mina@example.com"),
        ]);
        screen.select_last();
        assert_eq!(screen.selected, 2);

        screen.set_rows(vec![record("Asha", "asha@example.com")]);
        assert_eq!(screen.selected, 0);
        assert_eq!(screen.rows.len(), 1);
    }

    #[test]
    fn sorting_is_a_derived_view_only() {
        let mut screen = DirectoryScreen::new();
        screen.set_rows(vec![
            record("ravi", "ravi@example.com"),
            record("Asha", "asha@example.com"),
        ]);

        assert_eq!(screen.cycle_sort_column(), Some(SortColumn::FullName));
        let names: Vec<&str> = screen.view().iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["Asha", "ravi"], "case-insensitive ascending");

        assert!(screen.toggle_sort_direction());
        let names: Vec<&str> = screen.view().iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["ravi", "Asha"]);

        // The backing rows keep the authoritative insertion order.
        assert_eq!(screen.rows[0].full_name, "ravi");
    }

    #[test]
    fn sort_cycle_returns_to_insertion_order() {
        let mut screen = DirectoryScreen::new();
        for _ in 0..6 {
            screen.cycle_sort_column();
        }
        assert!(screen.sort.is_none());
        assert!(!screen.toggle_sort_direction());
    }

    #[test]
    fn paging_follows_the_selection() {
        let mut screen = DirectoryScreen::new();
        let rows: Vec<StudentRecord> = (0..20)
            .map(|i| record(&format!("Student {i:02}"), "s@example.com"))
            .collect();
        screen.set_rows(rows);

        assert_eq!(screen.page_count(), 3);
        assert_eq!(screen.page(), 0);

        screen.page_down();
        assert_eq!(screen.selected, PAGE_SIZE);
        assert_eq!(screen.page(), 1);
        assert_eq!(screen.visible_range(), (PAGE_SIZE, 2 * PAGE_SIZE));

        screen.select_last();
        screen.page_down();
        assert_eq!(screen.selected, 19, "selection clamps at the end");

        screen.page_up();
        screen.page_up();
        screen.page_up();
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn empty_table_has_one_empty_page() {
        let screen = DirectoryScreen::new();
        assert_eq!(screen.page_count(), 1);
        assert_eq!(screen.visible_range(), (0, 0));
        assert!(screen.current_student().is_none());
    }
}

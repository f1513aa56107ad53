//! Fixed selection catalogs offered by the entry form. These are hard-coded
//! on purpose: the form, the validation rules, and the autocomplete all treat
//! the catalogs as the single source of valid choices.

/// Elective subjects offered to every student. The order here is the order
/// toggles are rendered in and the order selections are stored in.
pub const ELECTIVES: &[&str] = &[
    "Artificial Intelligence & Machine Learning",
    "Robotics & Automation",
    "Electric Vehicle Technology",
    "Business Analytics",
    "Supply Chain Management",
];

/// Engineering branches suggested by the branch autocomplete.
pub const BRANCHES: &[&str] = &[
    "Computer Science & Engineering (CSE)",
    "Electronics & Communication Engineering (ECE)",
    "Mechanical Engineering (ME)",
    "Chemical Engineering (ChE)",
    "Information Technology (IT)",
];

/// Gender choices presented as a cycling selection.
pub const GENDERS: &[&str] = &["Male", "Female", "Other"];

/// Class-year choices presented as a cycling selection.
pub const CLASS_YEARS: &[&str] = &["1st year", "2nd year", "3rd year", "4th year"];

/// Filter the branch catalog with a case-insensitive substring match,
/// preserving catalog order. An empty query matches every branch so the
/// autocomplete can open with the full list.
pub fn filter_branches(query: &str) -> Vec<&'static str> {
    let needle = query.trim().to_lowercase();
    BRANCHES
        .iter()
        .copied()
        .filter(|branch| branch.to_lowercase().contains(&needle))
        .collect()
}

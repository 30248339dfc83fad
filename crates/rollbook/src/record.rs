//! Core record types for rollbook.
//!
//! This module defines the student record, its bounded text fields, and the
//! derived percentage/grade computation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum number of characters kept for a student name.
///
/// Longer input is silently truncated. The on-disk buffer is one byte larger
/// to leave room for NUL padding.
pub const NAME_MAX: usize = 49;

/// Maximum number of characters kept for a department name.
pub const DEPARTMENT_MAX: usize = 29;

/// Number of subjects every student is marked in.
pub const SUBJECT_COUNT: usize = 5;

/// Marks for all subjects, each in `[0.0, 100.0]`.
pub type Marks = [f32; SUBJECT_COUNT];

/// Compute the letter grade for a percentage.
///
/// Thresholds are evaluated high to low, first match wins:
/// `>= 90 → 'A'`, `>= 80 → 'B'`, `>= 70 → 'C'`, `>= 60 → 'D'`,
/// `>= 50 → 'E'`, anything lower → `'F'`.
#[must_use]
pub fn grade_for(percentage: f32) -> char {
    if percentage >= 90.0 {
        'A'
    } else if percentage >= 80.0 {
        'B'
    } else if percentage >= 70.0 {
        'C'
    } else if percentage >= 60.0 {
        'D'
    } else if percentage >= 50.0 {
        'E'
    } else {
        'F'
    }
}

/// Compute the overall percentage for a set of marks.
///
/// Marks are out of 100 per subject, so this is the average of the five
/// scores, kept in `f32` to match the persisted representation.
#[must_use]
pub fn percentage_for(marks: &Marks) -> f32 {
    (marks.iter().sum::<f32>() / 500.0) * 100.0
}

/// Validate that every mark is within `[0.0, 100.0]`.
///
/// # Errors
///
/// Returns [`Error::MarksOutOfRange`] naming the first offending subject
/// (1-based) and its value.
pub fn validate_marks(marks: &Marks) -> Result<()> {
    for (i, &mark) in marks.iter().enumerate() {
        if !(0.0..=100.0).contains(&mark) {
            return Err(Error::MarksOutOfRange {
                subject: i + 1,
                value: mark,
            });
        }
    }
    Ok(())
}

/// Truncate text to at most `max` bytes on a character boundary.
fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

/// A single student's academic record.
///
/// The roll number is the unique key and is immutable after creation. The
/// percentage and grade are derived from the marks and are recomputed on
/// every mutation; they can never be set directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Unique roll number, immutable after creation.
    pub roll: u32,
    /// Student name, truncated to [`NAME_MAX`] characters.
    name: String,
    /// Student age. Unconstrained.
    pub age: u32,
    /// Department name, truncated to [`DEPARTMENT_MAX`] characters.
    department: String,
    /// Marks for all subjects.
    marks: Marks,
    /// Derived overall percentage.
    percentage: f32,
    /// Derived letter grade.
    grade: char,
}

/// The mutable fields of a record, as supplied to an update.
///
/// Everything except the roll number: that is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordUpdate {
    /// New student name.
    pub name: String,
    /// New age.
    pub age: u32,
    /// New department name.
    pub department: String,
    /// New marks for all subjects.
    pub marks: Marks,
}

impl StudentRecord {
    /// Create a new record, computing the derived percentage and grade.
    ///
    /// Name and department are truncated to their limits; marks are
    /// validated against `[0.0, 100.0]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MarksOutOfRange`] if any mark is outside the range.
    pub fn new(
        roll: u32,
        name: impl Into<String>,
        age: u32,
        department: impl Into<String>,
        marks: Marks,
    ) -> Result<Self> {
        validate_marks(&marks)?;
        let percentage = percentage_for(&marks);
        Ok(Self {
            roll,
            name: truncate(&name.into(), NAME_MAX),
            age,
            department: truncate(&department.into(), DEPARTMENT_MAX),
            marks,
            percentage,
            grade: grade_for(percentage),
        })
    }

    /// Reconstruct a record from persisted parts without recomputing the
    /// derived fields. The codec stores percentage and grade verbatim.
    pub(crate) fn from_parts(
        roll: u32,
        name: String,
        age: u32,
        department: String,
        marks: Marks,
        percentage: f32,
        grade: char,
    ) -> Self {
        Self {
            roll,
            name: truncate(&name, NAME_MAX),
            age,
            department: truncate(&department, DEPARTMENT_MAX),
            marks,
            percentage,
            grade,
        }
    }

    /// Apply an update in place, recomputing percentage and grade.
    ///
    /// The roll number is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MarksOutOfRange`] if any new mark is outside the
    /// range; the record is unchanged in that case.
    pub fn apply(&mut self, update: RecordUpdate) -> Result<()> {
        validate_marks(&update.marks)?;
        self.name = truncate(&update.name, NAME_MAX);
        self.age = update.age;
        self.department = truncate(&update.department, DEPARTMENT_MAX);
        self.marks = update.marks;
        self.percentage = percentage_for(&self.marks);
        self.grade = grade_for(self.percentage);
        Ok(())
    }

    /// The student name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The department name.
    #[must_use]
    pub fn department(&self) -> &str {
        &self.department
    }

    /// The marks for all subjects.
    #[must_use]
    pub fn marks(&self) -> &Marks {
        &self.marks
    }

    /// The derived overall percentage.
    #[must_use]
    pub fn percentage(&self) -> f32 {
        self.percentage
    }

    /// The derived letter grade.
    #[must_use]
    pub fn grade(&self) -> char {
        self.grade
    }
}

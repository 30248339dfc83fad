//! In-memory record store for rollbook.
//!
//! This module provides the bounded, insertion-ordered collection of student
//! records. All lookups are linear scans keyed on the roll number; with the
//! fixed capacity this is the whole indexing story.

use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{RecordUpdate, StudentRecord};

/// Default maximum number of records a store will hold.
pub const DEFAULT_CAPACITY: usize = 100;

/// Bounded, insertion-ordered collection of student records.
///
/// Records are keyed by roll number, which is unique across all live
/// records. Append order is creation order and survives deletes: removing a
/// record shifts everything after it one position earlier.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStore {
    /// Live records in insertion order.
    records: Vec<StudentRecord>,
    /// Fixed upper bound on the number of live records.
    capacity: usize,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RecordStore {
    /// Create an empty store with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity,
        }
    }

    /// The fixed capacity of this store.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All live records in store order.
    #[must_use]
    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    /// Add a record at the end of the store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreFull`] if the store is at capacity, or
    /// [`Error::DuplicateRoll`] if a record with the same roll number
    /// already exists. The store is unchanged in either case.
    pub fn add(&mut self, record: StudentRecord) -> Result<()> {
        if self.records.len() >= self.capacity {
            return Err(Error::StoreFull {
                capacity: self.capacity,
            });
        }
        if self.contains_roll(record.roll) {
            return Err(Error::DuplicateRoll { roll: record.roll });
        }
        debug!("adding record with roll {}", record.roll);
        self.records.push(record);
        Ok(())
    }

    /// Check whether a record with this roll number exists.
    #[must_use]
    pub fn contains_roll(&self, roll: u32) -> bool {
        self.records.iter().any(|r| r.roll == roll)
    }

    /// Find the record with this roll number, if any.
    #[must_use]
    pub fn find_by_roll(&self, roll: u32) -> Option<&StudentRecord> {
        self.records.iter().find(|r| r.roll == roll)
    }

    /// Replace the mutable fields of the record with this roll number.
    ///
    /// The roll number and the record's position in the store are unchanged;
    /// percentage and grade are recomputed from the new marks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RollNotFound`] if no record has this roll number, or
    /// [`Error::MarksOutOfRange`] if the new marks are invalid. The store is
    /// unchanged in either case.
    pub fn update_by_roll(&mut self, roll: u32, update: RecordUpdate) -> Result<()> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.roll == roll)
            .ok_or(Error::RollNotFound { roll })?;
        record.apply(update)?;
        debug!("updated record with roll {roll}");
        Ok(())
    }

    /// Remove the record with this roll number, preserving the relative
    /// order of all remaining records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RollNotFound`] if no record has this roll number.
    pub fn delete_by_roll(&mut self, roll: u32) -> Result<()> {
        let index = self
            .records
            .iter()
            .position(|r| r.roll == roll)
            .ok_or(Error::RollNotFound { roll })?;
        self.records.remove(index);
        debug!("deleted record with roll {roll}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(roll: u32) -> StudentRecord {
        StudentRecord::new(roll, format!("Student {roll}"), 20, "CS", [50.0; 5])
            .expect("valid test record")
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = RecordStore::new(10);
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.capacity(), 10);
    }

    #[test]
    fn test_default_capacity() {
        let store = RecordStore::default();
        assert_eq!(store.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_add_and_find() {
        let mut store = RecordStore::new(10);
        store.add(record(101)).unwrap();

        assert_eq!(store.len(), 1);
        let found = store.find_by_roll(101).unwrap();
        assert_eq!(found.roll, 101);
        assert_eq!(found.name(), "Student 101");
    }

    #[test]
    fn test_find_missing_roll() {
        let store = RecordStore::new(10);
        assert!(store.find_by_roll(404).is_none());
    }

    #[test]
    fn test_add_duplicate_roll_leaves_store_unchanged() {
        let mut store = RecordStore::new(10);
        store.add(record(101)).unwrap();
        let before = store.clone();

        let err = store.add(record(101)).unwrap_err();
        assert!(matches!(err, Error::DuplicateRoll { roll: 101 }));
        assert_eq!(store, before);
    }

    #[test]
    fn test_add_at_capacity_leaves_store_unchanged() {
        let mut store = RecordStore::new(2);
        store.add(record(1)).unwrap();
        store.add(record(2)).unwrap();
        let before = store.clone();

        let err = store.add(record(3)).unwrap_err();
        assert!(matches!(err, Error::StoreFull { capacity: 2 }));
        assert_eq!(store, before);
    }

    #[test]
    fn test_records_preserve_insertion_order() {
        let mut store = RecordStore::new(10);
        for roll in [5, 3, 9, 1] {
            store.add(record(roll)).unwrap();
        }
        let rolls: Vec<u32> = store.records().iter().map(|r| r.roll).collect();
        assert_eq!(rolls, vec![5, 3, 9, 1]);
    }

    #[test]
    fn test_delete_preserves_order_of_survivors() {
        let mut store = RecordStore::new(10);
        for roll in [1, 2, 3, 4, 5] {
            store.add(record(roll)).unwrap();
        }

        store.delete_by_roll(3).unwrap();

        let rolls: Vec<u32> = store.records().iter().map(|r| r.roll).collect();
        assert_eq!(rolls, vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_delete_missing_roll_leaves_store_unchanged() {
        let mut store = RecordStore::new(10);
        store.add(record(1)).unwrap();
        let before = store.clone();

        let err = store.delete_by_roll(404).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store, before);
    }

    #[test]
    fn test_update_changes_only_mutable_fields() {
        let mut store = RecordStore::new(10);
        for roll in [1, 2, 3] {
            store.add(record(roll)).unwrap();
        }

        store
            .update_by_roll(
                2,
                RecordUpdate {
                    name: "Renamed".to_string(),
                    age: 25,
                    department: "Physics".to_string(),
                    marks: [95.0; 5],
                },
            )
            .unwrap();

        // Roll and position are untouched.
        let rolls: Vec<u32> = store.records().iter().map(|r| r.roll).collect();
        assert_eq!(rolls, vec![1, 2, 3]);

        let updated = store.find_by_roll(2).unwrap();
        assert_eq!(updated.name(), "Renamed");
        assert_eq!(updated.age, 25);
        assert_eq!(updated.department(), "Physics");
        assert_eq!(updated.grade(), 'A');

        // Neighbors are untouched.
        assert_eq!(store.find_by_roll(1).unwrap().name(), "Student 1");
        assert_eq!(store.find_by_roll(3).unwrap().name(), "Student 3");
    }

    #[test]
    fn test_update_missing_roll() {
        let mut store = RecordStore::new(10);
        let err = store
            .update_by_roll(
                404,
                RecordUpdate {
                    name: "X".to_string(),
                    age: 1,
                    department: "Y".to_string(),
                    marks: [0.0; 5],
                },
            )
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_update_with_bad_marks_leaves_record_unchanged() {
        let mut store = RecordStore::new(10);
        store.add(record(1)).unwrap();
        let before = store.clone();

        let err = store
            .update_by_roll(
                1,
                RecordUpdate {
                    name: "Changed".to_string(),
                    age: 99,
                    department: "Changed".to_string(),
                    marks: [150.0; 5],
                },
            )
            .unwrap_err();

        assert!(matches!(err, Error::MarksOutOfRange { .. }));
        assert_eq!(store, before);
    }

    #[test]
    fn test_contains_roll() {
        let mut store = RecordStore::new(10);
        store.add(record(7)).unwrap();
        assert!(store.contains_roll(7));
        assert!(!store.contains_roll(8));
    }

    #[test]
    fn test_scenario_add_duplicate_delete() {
        let mut store = RecordStore::new(100);

        let asha =
            StudentRecord::new(101, "Asha", 20, "CS", [90.0, 85.0, 92.0, 78.0, 88.0]).unwrap();
        assert!((asha.percentage() - 86.6).abs() < 1e-4);
        assert_eq!(asha.grade(), 'B');
        store.add(asha.clone()).unwrap();

        let err = store.add(asha).unwrap_err();
        assert!(matches!(err, Error::DuplicateRoll { roll: 101 }));
        assert_eq!(store.len(), 1);

        store.delete_by_roll(101).unwrap();
        assert_eq!(store.len(), 0);

        let err = store.delete_by_roll(101).unwrap_err();
        assert!(err.is_not_found());
    }
}

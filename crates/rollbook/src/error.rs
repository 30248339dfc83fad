//! Error types for rollbook.
//!
//! This module defines all error types used throughout the rollbook crate.
//! Every error is recovered at the point of occurrence: store errors are
//! reported to the user and leave the store unchanged, and a failed save is
//! surfaced without taking the process down.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rollbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Store Errors ===
    /// A record with this roll number already exists.
    #[error("roll number {roll} already exists")]
    DuplicateRoll {
        /// The conflicting roll number.
        roll: u32,
    },

    /// The store is at capacity and cannot accept another record.
    #[error("store is full ({capacity} records)")]
    StoreFull {
        /// The fixed capacity that was hit.
        capacity: usize,
    },

    /// No record with this roll number exists.
    #[error("no record with roll number {roll}")]
    RollNotFound {
        /// The roll number that was looked up.
        roll: u32,
    },

    /// A mark was outside the accepted `[0, 100]` range.
    #[error("mark for subject {subject} is out of range: {value} (expected 0-100)")]
    MarksOutOfRange {
        /// The 1-based subject index.
        subject: usize,
        /// The offending value.
        value: f32,
    },

    // === Persistence Errors ===
    /// The data file exists but cannot be decoded.
    #[error("data file {path} is corrupt: {reason}")]
    CorruptData {
        /// Path to the data file.
        path: PathBuf,
        /// What made the file undecodable.
        reason: String,
    },

    /// Failed to open the data file for writing.
    #[error("failed to open data file {path}: {source}")]
    DataFileOpen {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for rollbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a corrupt-data error for the given path.
    #[must_use]
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptData {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error means a roll number lookup missed.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RollNotFound { .. })
    }

    /// Check if this error means the data file is corrupt.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::CorruptData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DuplicateRoll { roll: 101 };
        assert_eq!(err.to_string(), "roll number 101 already exists");

        let err = Error::StoreFull { capacity: 100 };
        assert_eq!(err.to_string(), "store is full (100 records)");

        let err = Error::RollNotFound { roll: 7 };
        assert_eq!(err.to_string(), "no record with roll number 7");
    }

    #[test]
    fn test_marks_out_of_range_display() {
        let err = Error::MarksOutOfRange {
            subject: 3,
            value: 120.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("subject 3"));
        assert!(msg.contains("120.5"));
    }

    #[test]
    fn test_corrupt_error() {
        let err = Error::corrupt("/tmp/students.dat", "count exceeds capacity");
        assert!(err.is_corrupt());
        let msg = err.to_string();
        assert!(msg.contains("/tmp/students.dat"));
        assert!(msg.contains("count exceeds capacity"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::RollNotFound { roll: 1 }.is_not_found());
        assert!(!Error::DuplicateRoll { roll: 1 }.is_not_found());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_data_file_open_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DataFileOpen {
            path: PathBuf::from("/root/forbidden/students.dat"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/root/forbidden/students.dat"));
    }

    #[test]
    fn test_config_validation_display() {
        let err = Error::ConfigValidation {
            message: "capacity must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }
}

//! Error types for runlog.
//!
//! This module defines all error types used throughout the runlog crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for runlog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Run Log Errors ===
    /// A position does not refer to a run in the log.
    #[error("run id {id} is invalid")]
    InvalidId {
        /// The offending position.
        id: i64,
    },

    /// A row control identifier could not be decoded into an action.
    #[error("button name is incorrect: '{control}'")]
    MalformedControl {
        /// The identifier as received.
        control: String,
    },

    /// A form field holds a value its control cannot represent.
    #[error("field '{field}' cannot hold '{value}'")]
    InvalidField {
        /// Label of the field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

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

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for runlog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid id error.
    #[must_use]
    pub fn invalid_id(id: impl TryInto<i64>) -> Self {
        Self::InvalidId {
            id: id.try_into().unwrap_or(i64::MAX),
        }
    }

    /// Create a malformed control error.
    #[must_use]
    pub fn malformed_control(control: impl Into<String>) -> Self {
        Self::MalformedControl {
            control: control.into(),
        }
    }

    /// Create an invalid field error.
    #[must_use]
    pub fn invalid_field(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            value: value.into(),
        }
    }

    /// Check if this error is an invalid run id.
    #[must_use]
    pub fn is_invalid_id(&self) -> bool {
        matches!(self, Self::InvalidId { .. })
    }

    /// Check if this error is a malformed row control.
    #[must_use]
    pub fn is_malformed_control(&self) -> bool {
        matches!(self, Self::MalformedControl { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_id_display() {
        let err = Error::invalid_id(7_usize);
        assert_eq!(err.to_string(), "run id 7 is invalid");

        let err = Error::invalid_id(-3_i64);
        assert_eq!(err.to_string(), "run id -3 is invalid");
    }

    #[test]
    fn test_malformed_control_display() {
        let err = Error::malformed_control("xx_edit_1");
        assert!(err.to_string().contains("button name is incorrect"));
        assert!(err.to_string().contains("xx_edit_1"));
    }

    #[test]
    fn test_invalid_field_display() {
        let err = Error::invalid_field("distance", "far");
        let msg = err.to_string();
        assert!(msg.contains("distance"));
        assert!(msg.contains("far"));
    }

    #[test]
    fn test_predicates() {
        assert!(Error::invalid_id(1_usize).is_invalid_id());
        assert!(!Error::invalid_id(1_usize).is_malformed_control());
        assert!(Error::malformed_control("x").is_malformed_control());
        assert!(!Error::malformed_control("x").is_invalid_id());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
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

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "empty slot key".to_string(),
        };
        assert!(err.to_string().contains("empty slot key"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}

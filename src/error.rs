//! Error Types
//!
//! Configuration problems are reported separately from per-line filter
//! failures; a bad calibration document never stops the line stream.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a single calibration entry was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryError {
    #[error("{field} vector size expected:3 actual:{actual}")]
    WrongLength { field: String, actual: usize },

    #[error("{field} vector element {index} is not a number")]
    NotANumber { field: String, index: usize },

    #[error("entry is not an object")]
    NotAnObject,
}

/// A rejected entry together with its position in the mapping array
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedEntry {
    pub index: usize,
    pub error: EntryError,
}

impl fmt::Display for RejectedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry {}: {}", self.index, self.error)
    }
}

/// Errors raised while loading or applying a calibration document
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read calibration file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON calibration document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML calibration document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported calibration file extension: {path:?} (expected .json or .toml)")]
    UnsupportedFormat { path: PathBuf },

    #[error("expected array for \"{key}\"")]
    NotAnArray { key: String },

    #[error("{} calibration entries rejected ({accepted} accepted): {}", rejected.len(), join(rejected))]
    InvalidEntries {
        rejected: Vec<RejectedEntry>,
        accepted: usize,
    },
}

fn join(rejected: &[RejectedEntry]) -> String {
    rejected
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while a filter handles a line
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("{points}-point mapping is undefined; use 1 point or at least 4")]
    UnsupportedMapping { points: usize },

    #[error("failed to write line: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_entries_message() {
        let err = ConfigError::InvalidEntries {
            rejected: vec![
                RejectedEntry {
                    index: 1,
                    error: EntryError::WrongLength {
                        field: "domain".to_string(),
                        actual: 2,
                    },
                },
                RejectedEntry {
                    index: 3,
                    error: EntryError::NotAnObject,
                },
            ],
            accepted: 2,
        };

        let message = err.to_string();
        assert!(message.starts_with("2 calibration entries rejected (2 accepted)"));
        assert!(message.contains("entry 1: domain vector size expected:3 actual:2"));
        assert!(message.contains("entry 3: entry is not an object"));
    }

    #[test]
    fn test_unsupported_mapping_message() {
        let err = FilterError::UnsupportedMapping { points: 3 };
        assert_eq!(
            err.to_string(),
            "3-point mapping is undefined; use 1 point or at least 4"
        );
    }
}

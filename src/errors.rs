//! Typed error hierarchy for todo-sync.
//!
//! A single enum, `SyncError`, covers every way a reconciliation run can stop:
//! - `Configuration` / `InvalidConfig` — settings missing or malformed
//! - `Repository` — the repository root could not be resolved
//! - `Filesystem` — a matched source file could not be read
//! - `Tracker` / `Transport` — the issue tracker rejected a call or was unreachable
//!
//! None of these are retried. Every variant surfaces to the process boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from a scan or reconciliation run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Missing required configuration: {} must be set", .missing.join(", "))]
    Configuration { missing: Vec<&'static str> },

    #[error("Invalid configuration file {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("Failed to resolve repository root: {0}")]
    Repository(String),

    #[error("Failed to read {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not {operation}: tracker responded {status}: {body}")]
    Tracker {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Could not {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl SyncError {
    /// Raw response payload for tracker rejections, if this is one.
    pub fn tracker_body(&self) -> Option<&str> {
        match self {
            SyncError::Tracker { body, .. } => Some(body),
            _ => None,
        }
    }
}

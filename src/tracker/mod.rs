//! Issue tracker capability.
//!
//! The reconciler only needs two operations from a tracker: list the open
//! items carrying a label, and create a new one. [`IssueTracker`] is that seam.
//! Real implementation: [`github::GitHubTracker`]. Tests use in-memory doubles.

pub mod github;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::SyncError;
use crate::scanner::TodoRecord;

pub use github::GitHubTracker;

/// The part of an open tracked item that matters for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackedItem {
    pub title: String,
}

/// Payload for a new tracked item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
}

impl NewIssue {
    pub fn new(title: &str, body: &str, label: &str, assignee: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            labels: vec![label.to_string()],
            assignees: vec![assignee.to_string()],
        }
    }

    /// Issue for a scanned marker; the body points back at `path:line`.
    pub fn from_record(record: &TodoRecord, label: &str, assignee: &str) -> Self {
        Self::new(
            &record.title,
            &format!("{}\n", record.location()),
            label,
            assignee,
        )
    }
}

#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Open items carrying `label`.
    async fn list_open(&self, label: &str) -> Result<Vec<TrackedItem>, SyncError>;

    /// Create exactly one item. Never retried.
    async fn create(&self, issue: &NewIssue) -> Result<(), SyncError>;
}

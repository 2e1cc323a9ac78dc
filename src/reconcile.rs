//! Scan-and-reconcile pass.
//!
//! One run validates credentials, scans the tree, fetches the open tracked
//! titles once, and creates an issue for every record whose title is not among
//! them. The pass is linear with no checkpoint: a failure partway through
//! leaves already-created issues in place.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::SyncSettings;
use crate::errors::SyncError;
use crate::scanner::{Scanner, TodoRecord};
use crate::tracker::{IssueTracker, NewIssue};

/// Outcome of a run, for display only.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub scanned: usize,
    /// Records an issue was created for (or would be, in dry-run mode).
    pub created: Vec<TodoRecord>,
    /// Records whose title was already open on the tracker.
    pub skipped: Vec<TodoRecord>,
}

pub struct Reconciler<'a, T: IssueTracker + ?Sized> {
    settings: &'a SyncSettings,
    root: PathBuf,
    tracker: &'a T,
    dry_run: bool,
}

impl<'a, T: IssueTracker + ?Sized> Reconciler<'a, T> {
    pub fn new(settings: &'a SyncSettings, root: &Path, tracker: &'a T) -> Self {
        Self {
            settings,
            root: root.to_path_buf(),
            tracker,
            dry_run: false,
        }
    }

    /// Skip `create` calls and only report what would be created.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self) -> Result<ReconcileReport, SyncError> {
        let credentials = self.settings.credentials()?;
        let label = self.settings.tracker.label.as_str();

        let records = Scanner::new(&self.root, &self.settings.scan).scan()?;
        tracing::debug!(count = records.len(), "scanned source tree");

        let existing: HashMap<String, bool> = self
            .tracker
            .list_open(label)
            .await?
            .into_iter()
            .map(|item| (item.title, true))
            .collect();
        tracing::debug!(count = existing.len(), "fetched open issues");

        let mut report = ReconcileReport {
            scanned: records.len(),
            ..ReconcileReport::default()
        };

        // Titles are not added to `existing` as issues are created, so a title
        // repeated within one scan produces one issue per occurrence.
        for record in records {
            if existing.get(&record.title).copied().unwrap_or(false) {
                tracing::info!(title = %record.title, "Skipping issue, already exists");
                report.skipped.push(record);
                continue;
            }

            if self.dry_run {
                tracing::info!(
                    title = %record.title,
                    location = %record.location(),
                    "Would create issue"
                );
            } else {
                let issue = NewIssue::from_record(&record, label, &credentials.owner);
                self.tracker.create(&issue).await?;
                tracing::info!(title = %record.title, "Successfully created issue");
            }
            report.created.push(record);
        }

        Ok(report)
    }
}

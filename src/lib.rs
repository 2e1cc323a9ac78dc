pub mod config;
pub mod errors;
pub mod readme_check;
pub mod reconcile;
pub mod repo;
pub mod scanner;
pub mod tracker;

pub use errors::SyncError;
pub use reconcile::{ReconcileReport, Reconciler};
pub use scanner::{Scanner, TodoRecord};
pub use tracker::{IssueTracker, NewIssue, TrackedItem};

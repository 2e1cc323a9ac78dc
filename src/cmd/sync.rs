//! Full reconciliation run — `todo-sync sync`.

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use todo_sync::config::{self, SyncSettings};
use todo_sync::reconcile::Reconciler;
use todo_sync::repo::find_repo_root;
use todo_sync::tracker::GitHubTracker;

pub async fn cmd_sync(project_dir: &Path, dry_run: bool) -> Result<()> {
    config::load_dotenv(project_dir);
    SyncSettings::from_env().credentials()?;

    let root = find_repo_root(project_dir)?;
    let settings = SyncSettings::load(&root)?;
    let credentials = settings.credentials()?;
    let tracker = GitHubTracker::new(&settings.tracker.api_base, &credentials)?;

    let report = Reconciler::new(&settings, &root, &tracker)
        .dry_run(dry_run)
        .run()
        .await
        .with_context(|| {
            format!(
                "Reconciliation against {}/{} failed",
                credentials.owner, credentials.repository
            )
        })?;

    println!();
    if dry_run {
        for record in &report.created {
            println!(
                "  {} {}  {}",
                style("+").green(),
                style(record.location()).dim(),
                record.title
            );
        }
        println!();
    }
    let verb = if dry_run { "would be created" } else { "created" };
    println!(
        "{} markers scanned: {} {}, {} already tracked",
        report.scanned,
        style(report.created.len()).green(),
        verb,
        style(report.skipped.len()).dim()
    );
    Ok(())
}

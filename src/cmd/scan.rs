//! Marker listing without the tracker — `todo-sync scan`.

use anyhow::Result;
use console::style;
use std::path::Path;

use todo_sync::config::SyncSettings;
use todo_sync::repo::find_repo_root;
use todo_sync::scanner::Scanner;

pub fn cmd_scan(project_dir: &Path) -> Result<()> {
    let root = find_repo_root(project_dir)?;
    let settings = SyncSettings::load(&root)?;
    let records = Scanner::new(&root, &settings.scan).scan()?;

    if records.is_empty() {
        println!(
            "No '{}' markers found under {}",
            settings.scan.marker,
            root.display()
        );
        return Ok(());
    }

    for record in &records {
        println!("{}  {}", style(record.location()).dim(), record.title);
    }
    println!();
    println!("{} markers found", records.len());
    Ok(())
}

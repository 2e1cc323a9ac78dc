//! README/example consistency check — `todo-sync check-readme`.

use anyhow::Result;
use std::path::Path;

use todo_sync::readme_check::example_in_readme;
use todo_sync::repo::find_repo_root;

/// Returns `false` when the example text is not found in the README.
pub fn cmd_check_readme(project_dir: &Path, example: &Path, readme: &Path) -> Result<bool> {
    let root = find_repo_root(project_dir)?;
    let example_path = root.join(example);
    let readme_path = root.join(readme);

    if example_in_readme(&example_path, &readme_path)? {
        Ok(true)
    } else {
        println!(
            "Text in README does not match '{}'.",
            example_path.display()
        );
        Ok(false)
    }
}

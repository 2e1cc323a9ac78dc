//! Integration tests for todo-sync
//!
//! These drive the binary end to end against temporary git repositories and,
//! for `sync`, a local stand-in for the GitHub issues API.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a todo-sync Command with no GitHub settings inherited
fn todo_sync() -> Command {
    let mut cmd = cargo_bin_cmd!("todo-sync");
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_OWNER")
        .env_remove("GITHUB_REPOSITORY")
        .env_remove("TODO_SYNC_API_BASE")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create a temporary git repository
fn create_temp_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    git2::Repository::init(dir.path()).unwrap();
    dir
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Repository with one marker in `src/` and one in `tests/`.
fn repo_with_markers() -> TempDir {
    let dir = create_temp_repo();
    write(dir.path(), "src/Basis.cpp", "int a;\n\n// TODO: fix X\n");
    write(
        dir.path(),
        "tests/Basis-test.h",
        "#pragma once\n\n\n\n\n\nvoid y(); // TODO: add Y\n",
    );
    write(dir.path(), "src/notes.md", "TODO: not source\n");
    dir
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_help() {
        todo_sync()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("sync"))
            .stdout(predicate::str::contains("check-readme"));
    }

    #[test]
    fn test_version() {
        todo_sync().arg("--version").assert().success();
    }

    #[test]
    fn test_unknown_command_fails() {
        todo_sync().arg("frobnicate").assert().failure();
    }
}

// =============================================================================
// Scan Tests
// =============================================================================

mod scan {
    use super::*;

    #[test]
    fn test_scan_lists_markers_with_locations() {
        let dir = repo_with_markers();

        todo_sync()
            .current_dir(dir.path())
            .arg("scan")
            .assert()
            .success()
            .stdout(predicate::str::contains("TODO: fix X"))
            .stdout(predicate::str::contains("Basis.cpp:3"))
            .stdout(predicate::str::contains("TODO: add Y"))
            .stdout(predicate::str::contains("Basis-test.h:7"))
            .stdout(predicate::str::contains("not source").not())
            .stdout(predicate::str::contains("2 markers found"));
    }

    #[test]
    fn test_scan_from_subdirectory_uses_repo_root() {
        let dir = repo_with_markers();

        todo_sync()
            .arg("--project-dir")
            .arg(dir.path().join("src"))
            .arg("scan")
            .assert()
            .success()
            .stdout(predicate::str::contains("TODO: add Y"));
    }

    #[test]
    fn test_scan_respects_config_file() {
        let dir = repo_with_markers();
        write(
            dir.path(),
            "todo-sync.toml",
            "[scan]\ndirectories = [\"lib\"]\nextensions = [\".rs\"]\n",
        );
        write(dir.path(), "lib/mod.rs", "// TODO: rust marker\n");

        todo_sync()
            .current_dir(dir.path())
            .arg("scan")
            .assert()
            .success()
            .stdout(predicate::str::contains("TODO: rust marker"))
            .stdout(predicate::str::contains("TODO: fix X").not());
    }

    #[test]
    fn test_scan_empty_tree() {
        let dir = create_temp_repo();

        todo_sync()
            .current_dir(dir.path())
            .arg("scan")
            .assert()
            .success()
            .stdout(predicate::str::contains("No 'TODO' markers found"));
    }

    #[test]
    fn test_scan_bad_config_fails() {
        let dir = repo_with_markers();
        write(dir.path(), "todo-sync.toml", "[scan]\nfolders = []\n");

        todo_sync()
            .current_dir(dir.path())
            .arg("scan")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration file"));
    }
}

// =============================================================================
// Sync Tests
// =============================================================================

mod sync {
    use super::*;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeGitHub {
        open: Vec<String>,
        created: Vec<serde_json::Value>,
    }

    type Shared = Arc<Mutex<FakeGitHub>>;

    async fn list_issues(State(state): State<Shared>) -> Json<serde_json::Value> {
        let fake = state.lock().unwrap();
        let issues: Vec<_> = fake
            .open
            .iter()
            .map(|title| serde_json::json!({ "title": title }))
            .collect();
        Json(serde_json::Value::Array(issues))
    }

    async fn create_issue(
        State(state): State<Shared>,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        let mut fake = state.lock().unwrap();
        if let Some(title) = body["title"].as_str() {
            fake.open.push(title.to_string());
        }
        fake.created.push(body.clone());
        (StatusCode::CREATED, Json(body))
    }

    async fn serve(state: Shared) -> String {
        let app = Router::new()
            .route(
                "/repos/octo/widgets/issues",
                get(list_issues).post(create_issue),
            )
            .with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn authorized(base: &str) -> Command {
        let mut cmd = todo_sync();
        cmd.env("GITHUB_TOKEN", "ghp_test")
            .env("GITHUB_OWNER", "octo")
            .env("GITHUB_REPOSITORY", "octo/widgets")
            .env("TODO_SYNC_API_BASE", base);
        cmd
    }

    #[test]
    fn test_sync_without_credentials_fails() {
        let dir = repo_with_markers();

        todo_sync()
            .current_dir(dir.path())
            .arg("sync")
            .assert()
            .failure()
            .stderr(predicate::str::contains("GITHUB_TOKEN"))
            .stderr(predicate::str::contains("GITHUB_OWNER"))
            .stderr(predicate::str::contains("GITHUB_REPOSITORY"));
    }

    #[test]
    fn test_sync_missing_credentials_reported_before_repository_lookup() {
        // Plain directory, not a git work-tree.
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/a.cpp", "// TODO never scanned\n");

        todo_sync()
            .current_dir(dir.path())
            .arg("sync")
            .assert()
            .failure()
            .stderr(predicate::str::contains("GITHUB_TOKEN"))
            .stderr(predicate::str::contains("repository root").not());
    }

    #[test]
    fn test_sync_missing_credentials_reported_before_config_file() {
        let dir = repo_with_markers();
        write(dir.path(), "todo-sync.toml", "[scan\nbroken");

        todo_sync()
            .current_dir(dir.path())
            .arg("sync")
            .assert()
            .failure()
            .stderr(predicate::str::contains("GITHUB_TOKEN"))
            .stderr(predicate::str::contains("Invalid configuration file").not());
    }

    #[test]
    fn test_sync_reads_credentials_from_dotenv() {
        let dir = repo_with_markers();
        // Owner and repository present, token missing: still a config failure,
        // but only the token is reported.
        write(
            dir.path(),
            ".env",
            "GITHUB_OWNER=octo\nGITHUB_REPOSITORY=widgets\n",
        );

        todo_sync()
            .current_dir(dir.path())
            .arg("sync")
            .assert()
            .failure()
            .stderr(predicate::str::contains("GITHUB_TOKEN"))
            .stderr(predicate::str::contains("GITHUB_OWNER").not());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_sync_creates_only_untracked_markers_and_is_idempotent() {
        let dir = repo_with_markers();
        let state = Shared::default();
        state.lock().unwrap().open.push("TODO: fix X".to_string());
        let base = serve(state.clone()).await;

        let root = dir.path().to_path_buf();
        let first_base = base.clone();
        tokio::task::spawn_blocking(move || {
            authorized(&first_base)
                .current_dir(&root)
                .arg("sync")
                .assert()
                .success()
                .stdout(predicate::str::contains("2 markers scanned"))
                .stderr(predicate::str::contains("Skipping issue, already exists"))
                .stderr(predicate::str::contains("Successfully created issue"));
        })
        .await
        .unwrap();

        {
            let fake = state.lock().unwrap();
            assert_eq!(fake.created.len(), 1);
            assert_eq!(fake.created[0]["title"], "TODO: add Y");
            assert_eq!(
                fake.created[0]["body"],
                format!("{0}tests{0}Basis-test.h:7\n", std::path::MAIN_SEPARATOR)
            );
            assert_eq!(fake.created[0]["labels"], serde_json::json!(["TODO"]));
            assert_eq!(fake.created[0]["assignees"], serde_json::json!(["octo"]));
        }

        let root = dir.path().to_path_buf();
        tokio::task::spawn_blocking(move || {
            authorized(&base)
                .current_dir(&root)
                .arg("sync")
                .assert()
                .success();
        })
        .await
        .unwrap();

        assert_eq!(state.lock().unwrap().created.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_sync_dry_run_creates_nothing() {
        let dir = repo_with_markers();
        let state = Shared::default();
        let base = serve(state.clone()).await;

        let root = dir.path().to_path_buf();
        tokio::task::spawn_blocking(move || {
            authorized(&base)
                .current_dir(&root)
                .args(["sync", "--dry-run"])
                .assert()
                .success()
                .stdout(predicate::str::contains("TODO: fix X"))
                .stdout(predicate::str::contains("would be created"));
        })
        .await
        .unwrap();

        assert!(state.lock().unwrap().created.is_empty());
    }
}

// =============================================================================
// README Check Tests
// =============================================================================

mod check_readme {
    use super::*;

    const EXAMPLE: &str = "int main() {\n  return 0;\n}\n";

    #[test]
    fn test_matching_readme_exits_zero() {
        let dir = create_temp_repo();
        write(dir.path(), "examples/main.cpp", EXAMPLE);
        write(
            dir.path(),
            "README.md",
            &format!("# Example\n\n```cpp\n{}```\n", EXAMPLE),
        );

        todo_sync()
            .current_dir(dir.path())
            .arg("check-readme")
            .assert()
            .success();
    }

    #[test]
    fn test_drifted_readme_exits_one() {
        let dir = create_temp_repo();
        write(dir.path(), "examples/main.cpp", EXAMPLE);
        write(dir.path(), "README.md", "# Example\n\nSee examples/.\n");

        todo_sync()
            .current_dir(dir.path())
            .arg("check-readme")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Text in README does not match"));
    }

    #[test]
    fn test_custom_paths() {
        let dir = create_temp_repo();
        write(dir.path(), "docs/snippet.rs", "fn main() {}\n");
        write(dir.path(), "docs/guide.md", "```rust\nfn main() {}\n```\n");

        todo_sync()
            .current_dir(dir.path())
            .args([
                "check-readme",
                "--example",
                "docs/snippet.rs",
                "--readme",
                "docs/guide.md",
            ])
            .assert()
            .success();
    }
}

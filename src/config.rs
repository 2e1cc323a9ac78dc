//! Layered configuration for todo-sync.
//!
//! Settings are resolved in this order, later layers winning:
//! 1. Built-in defaults
//! 2. `todo-sync.toml` in the repository root (optional)
//! 3. the nearest `.env` (loaded into the process environment)
//! 4. Process environment
//! 5. CLI flags (applied by the command layer)
//!
//! # Configuration File Format
//!
//! ```toml
//! [scan]
//! directories = ["src", "tests", "examples"]
//! extensions = [".cpp", ".h"]
//! marker = "TODO"
//!
//! [tracker]
//! api_base = "https://api.github.com"
//! label = "TODO"
//! ```
//!
//! Credentials never live in the file. They come from `GITHUB_TOKEN`,
//! `GITHUB_OWNER` and `GITHUB_REPOSITORY`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::SyncError;

pub const CONFIG_FILE_NAME: &str = "todo-sync.toml";

pub const TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const OWNER_VAR: &str = "GITHUB_OWNER";
pub const REPOSITORY_VAR: &str = "GITHUB_REPOSITORY";
pub const API_BASE_VAR: &str = "TODO_SYNC_API_BASE";

/// Where to look for markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanSection {
    /// Directory names under the repository root; missing ones are skipped.
    pub directories: Vec<String>,
    /// File-name suffixes to inspect, e.g. `.cpp`.
    pub extensions: Vec<String>,
    /// Literal, case-sensitive substring that flags a line.
    pub marker: String,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            directories: vec!["src".into(), "tests".into(), "examples".into()],
            extensions: vec![".cpp".into(), ".h".into()],
            marker: "TODO".into(),
        }
    }
}

/// Issue tracker endpoint and labelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerSection {
    pub api_base: String,
    pub label: String,
}

impl Default for TrackerSection {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".into(),
            label: "TODO".into(),
        }
    }
}

/// The on-disk `todo-sync.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncToml {
    pub scan: ScanSection,
    pub tracker: TrackerSection,
}

impl SyncToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let content = std::fs::read_to_string(path).map_err(|source| SyncError::Filesystem {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|message| SyncError::InvalidConfig {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse and validate configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, String> {
        let parsed: Self = toml::from_str(content).map_err(|e| e.to_string())?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Load `todo-sync.toml` from the repository root, or defaults if absent.
    pub fn load_or_default(root: &Path) -> Result<Self, SyncError> {
        let config_path = root.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.scan.marker.is_empty() {
            return Err("scan.marker must not be empty".into());
        }
        if self.scan.extensions.iter().any(|e| e.is_empty()) {
            return Err("scan.extensions must not contain empty suffixes".into());
        }
        if self.tracker.label.is_empty() {
            return Err("tracker.label must not be empty".into());
        }
        Ok(())
    }
}

/// Validated tracker identity. Only obtainable through [`SyncSettings::credentials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub owner: String,
    pub repository: String,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, Default)]
pub struct SyncSettings {
    pub scan: ScanSection,
    pub tracker: TrackerSection,
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repository: Option<String>,
}

impl SyncSettings {
    /// Load the file layer from `root` and then apply the process environment.
    pub fn load(root: &Path) -> Result<Self, SyncError> {
        let file = SyncToml::load_or_default(root)?;
        Ok(Self::from_toml(file).with_env(|name| std::env::var(name).ok()))
    }

    /// Environment layer only. Enough to validate credentials, which never
    /// come from the file.
    pub fn from_env() -> Self {
        Self::default().with_env(|name| std::env::var(name).ok())
    }

    pub fn from_toml(toml: SyncToml) -> Self {
        Self {
            scan: toml.scan,
            tracker: toml.tracker,
            ..Self::default()
        }
    }

    /// Overlay values from an environment lookup. Blank values count as unset.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(token) = get(TOKEN_VAR) {
            self.token = Some(token);
        }
        if let Some(owner) = get(OWNER_VAR) {
            self.owner = Some(owner);
        }
        if let Some(repository) = get(REPOSITORY_VAR)
            .map(|value| repository_name(&value).trim().to_string())
            .filter(|name| !name.is_empty())
        {
            self.repository = Some(repository);
        }
        if let Some(api_base) = get(API_BASE_VAR) {
            self.tracker.api_base = api_base;
        }
        self
    }

    /// Check that every required identity value is present.
    ///
    /// Reports all missing names at once.
    pub fn credentials(&self) -> Result<Credentials, SyncError> {
        let mut missing = Vec::new();
        if self.token.is_none() {
            missing.push(TOKEN_VAR);
        }
        if self.owner.is_none() {
            missing.push(OWNER_VAR);
        }
        if self.repository.is_none() {
            missing.push(REPOSITORY_VAR);
        }

        match (&self.token, &self.owner, &self.repository) {
            (Some(token), Some(owner), Some(repository)) => Ok(Credentials {
                token: token.clone(),
                owner: owner.clone(),
                repository: repository.clone(),
            }),
            _ => Err(SyncError::Configuration { missing }),
        }
    }
}

/// Nearest `.env` in `start` or one of its parents.
pub fn find_dotenv(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(".env"))
        .find(|path| path.is_file())
}

/// Load the nearest `.env` above `start` into the process environment.
///
/// Variables already set in the environment are left alone.
pub fn load_dotenv(start: &Path) {
    if let Some(path) = find_dotenv(start)
        && let Err(e) = dotenvy::from_path(&path)
    {
        tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable .env file");
    }
}

/// CI runners set `GITHUB_REPOSITORY` to `owner/name`; keep only the name.
fn repository_name(value: &str) -> &str {
    value.rsplit('/').next().unwrap_or(value)
}

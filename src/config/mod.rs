//! Configuration management for markguard
//!
//! Configuration is layered with figment, lowest precedence first:
//!
//! 1. built-in defaults (`default-config.yaml`, embedded at compile time)
//! 2. user config in `~/.config/markguard/config.{toml,json,yaml,yml}`
//! 3. repository config `markguard.{toml,json,yaml,yml}` in the working directory
//! 4. an explicit `--config <FILE>`
//! 5. `MARKGUARD_` environment variables, nested keys separated by `__`
//!    (`MARKGUARD_GUARD__MARKER=FIXME`)

use crate::error::{GuardError, Result};
use crate::guard::{Marker, ScanMode};
use crate::hooks::{Builtin, FileFilter};
use figment::Figment;
use figment::providers::{Env, Format, Json, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.yaml");

/// Starter file written by `markguard config init`
pub const CONFIG_TEMPLATE: &str = include_str!("../../templates/markguard.yaml");

/// File name used for repository configuration
pub const REPO_CONFIG_FILE: &str = "markguard.yaml";

/// Repository value marking hooks defined in this repository
pub const LOCAL_REPO: &str = "local";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MarkguardConfig {
    /// Forbidden marker check
    pub guard: GuardConfig,

    /// Hook pipeline
    pub hooks: HooksConfig,
}

/// Marker guard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Token that blocks a commit when found in an added line
    pub marker: String,

    /// Report every offending line instead of stopping at the first
    pub report_all: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            marker: crate::guard::DEFAULT_MARKER.to_string(),
            report_all: true,
        }
    }
}

/// Ordered hook configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Stop at the first failing hook
    pub fail_fast: bool,

    /// Hook sources in execution order
    pub repos: Vec<RepoConfig>,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            repos: vec![RepoConfig {
                repo: LOCAL_REPO.to_string(),
                rev: None,
                hooks: vec![HookEntry {
                    id: "no-commit".to_string(),
                    name: Some("Forbidden marker check".to_string()),
                    builtin: Some(Builtin::MarkerGuard.name().to_string()),
                    pass_filenames: false,
                    ..HookEntry::default()
                }],
            }],
        }
    }
}

/// One hook source: a pinned remote repository or `local`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Source location, or `local`
    pub repo: String,

    /// Pinned revision; required for anything but `local`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,

    #[serde(default)]
    pub hooks: Vec<HookEntry>,
}

impl RepoConfig {
    pub fn is_local(&self) -> bool {
        self.repo == LOCAL_REPO
    }
}

/// A single hook declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookEntry {
    /// Hook identifier
    pub id: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Command line for local hooks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,

    /// Extra arguments appended after `entry`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Run an in-process check instead of a command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builtin: Option<String>,

    /// Only pass files whose relative path matches this regex
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<String>,

    /// Never pass files whose relative path matches this regex
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,

    /// Append the staged file list to the command line
    #[serde(default = "default_pass_filenames")]
    pub pass_filenames: bool,
}

fn default_pass_filenames() -> bool {
    true
}

impl Default for HookEntry {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: None,
            entry: None,
            args: Vec::new(),
            builtin: None,
            files: None,
            exclude: None,
            pass_filenames: default_pass_filenames(),
        }
    }
}

impl HookEntry {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

impl MarkguardConfig {
    /// Load, merge and validate configuration
    pub fn load(custom_config: Option<&Path>) -> Result<Self> {
        let config: MarkguardConfig = Self::figment(custom_config)?.extract()?;
        config.validate()?;
        debug!(
            marker = %config.guard.marker,
            repos = config.hooks.repos.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Build the layered provider stack without extracting it
    pub fn figment(custom_config: Option<&Path>) -> Result<Figment> {
        let user_config = Self::user_config_dir();
        let mut figment = Figment::new()
            .merge(Yaml::string(DEFAULT_CONFIG))
            .merge(Toml::file(user_config.join("config.toml")))
            .merge(Json::file(user_config.join("config.json")))
            .merge(Yaml::file(user_config.join("config.yaml")))
            .merge(Yaml::file(user_config.join("config.yml")))
            .merge(Toml::file("markguard.toml"))
            .merge(Json::file("markguard.json"))
            .merge(Yaml::file("markguard.yaml"))
            .merge(Yaml::file("markguard.yml"));

        if let Some(path) = custom_config {
            if !path.exists() {
                return Err(GuardError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = merge_by_extension(figment, path);
        }

        // Environment variables always have highest priority
        Ok(figment.merge(Env::prefixed("MARKGUARD_").split("__")))
    }

    /// Check everything that serde alone cannot
    pub fn validate(&self) -> Result<()> {
        self.marker()?;

        for repo in &self.hooks.repos {
            if repo.repo.trim().is_empty() {
                return Err(GuardError::Config(
                    "hook repository entry has an empty `repo`".to_string(),
                ));
            }
            let pinned = repo.rev.as_deref().is_some_and(|rev| !rev.trim().is_empty());
            if !repo.is_local() && !pinned {
                return Err(GuardError::Config(format!(
                    "repository '{}' must pin a `rev`",
                    repo.repo
                )));
            }

            for hook in &repo.hooks {
                if hook.id.trim().is_empty() {
                    return Err(GuardError::Config(format!(
                        "hook in repository '{}' has an empty `id`",
                        repo.repo
                    )));
                }
                if let Some(builtin) = &hook.builtin {
                    builtin.parse::<Builtin>()?;
                } else if repo.is_local() && hook.entry.is_none() {
                    return Err(GuardError::Config(format!(
                        "local hook '{}' needs an `entry` or a `builtin`",
                        hook.id
                    )));
                }
                FileFilter::from_entry(hook)?;
            }
        }

        Ok(())
    }

    pub fn marker(&self) -> Result<Marker> {
        Marker::new(self.guard.marker.clone())
    }

    pub fn scan_mode(&self) -> ScanMode {
        if self.guard.report_all {
            ScanMode::Exhaustive
        } else {
            ScanMode::FirstMatch
        }
    }

    /// Number of hooks across all repositories
    pub fn hook_count(&self) -> usize {
        self.hooks.repos.iter().map(|r| r.hooks.len()).sum()
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yml::to_string(self)?)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn user_config_dir() -> PathBuf {
        match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home).join(".config").join("markguard"),
            Err(_) => PathBuf::from("~/.config/markguard"),
        }
    }
}

fn merge_by_extension(figment: Figment, path: &Path) -> Figment {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => figment.merge(Json::file(path)),
        "toml" => figment.merge(Toml::file(path)),
        _ => figment.merge(Yaml::file(path)),
    }
}

#[cfg(test)]
mod tests;

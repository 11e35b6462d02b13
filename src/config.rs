//! TOML configuration.
//!
//! All paths and capture timings live here and are passed explicitly into
//! the core functions, keeping them free of process-global state. A missing
//! config file is not an error: the defaults match the layout the snapshot
//! workflow expects (`archive/` and `docs/` under the working directory).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub docs: DocsConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

impl Config {
    /// Config rooted somewhere other than the working directory (tests, or
    /// embedding the crate as a library).
    pub fn with_roots(archive_root: impl Into<PathBuf>, docs_root: impl Into<PathBuf>) -> Self {
        Self {
            archive: ArchiveConfig {
                root: archive_root.into(),
            },
            docs: DocsConfig {
                root: docs_root.into(),
            },
            capture: CaptureConfig::default(),
        }
    }
}

/// Where capture appends snapshot directories.
#[derive(Debug, Deserialize, Clone)]
pub struct ArchiveConfig {
    #[serde(default = "default_archive_root")]
    pub root: PathBuf,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            root: default_archive_root(),
        }
    }
}

fn default_archive_root() -> PathBuf {
    PathBuf::from("archive")
}

/// Where the index builder writes the derived view and listing page.
#[derive(Debug, Deserialize, Clone)]
pub struct DocsConfig {
    #[serde(default = "default_docs_root")]
    pub root: PathBuf,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            root: default_docs_root(),
        }
    }
}

fn default_docs_root() -> PathBuf {
    PathBuf::from("docs")
}

/// Capture-readiness policy: how long to wait at each step.
#[derive(Debug, Deserialize, Clone)]
pub struct CaptureConfig {
    /// Bound on the navigation itself; exceeding it fails the capture.
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,
    /// Bound on the network-idle wait; exceeding it is a warning, not an
    /// error. Zero disables the wait.
    #[serde(default = "default_network_idle_timeout_ms")]
    pub network_idle_timeout_ms: u64,
    /// Fixed trailing delay letting late-rendering content settle. Zero
    /// disables it.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: default_navigation_timeout_ms(),
            network_idle_timeout_ms: default_network_idle_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

fn default_navigation_timeout_ms() -> u64 {
    60_000
}
fn default_network_idle_timeout_ms() -> u64 {
    10_000
}
fn default_settle_delay_ms() -> u64 {
    1_500
}

/// Load the config file, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.capture.navigation_timeout_ms == 0 {
        anyhow::bail!("capture.navigation_timeout_ms must be > 0");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load_config(Path::new("/nonexistent/siteshot.toml")).unwrap();
        assert_eq!(cfg.archive.root, PathBuf::from("archive"));
        assert_eq!(cfg.docs.root, PathBuf::from("docs"));
        assert_eq!(cfg.capture.navigation_timeout_ms, 60_000);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("siteshot.toml");
        std::fs::write(&path, "[archive]\nroot = \"/data/archive\"\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.archive.root, PathBuf::from("/data/archive"));
        assert_eq!(cfg.docs.root, PathBuf::from("docs"));
        assert_eq!(cfg.capture.settle_delay_ms, 1_500);
    }

    #[test]
    fn zero_navigation_timeout_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("siteshot.toml");
        std::fs::write(&path, "[capture]\nnavigation_timeout_ms = 0\n").unwrap();

        assert!(load_config(&path).is_err());
    }
}

//! Data types shared by the capture and index components.
//!
//! These mirror the on-disk archive format: each snapshot directory holds
//! `page.html`, `page.txt`, and `meta.json`; the derived latest view is an
//! ordered list of [`IndexEntry`] rows serialized to `index.json`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata persisted next to each snapshot (`meta.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub url: String,
    /// Equals the snapshot's directory name (the identifier).
    pub timestamp: String,
    /// HTTP status of the main document response.
    pub status: u16,
    pub user_agent: String,
    /// CI run identifier when captured from a workflow, else null.
    pub github_run_id: Option<String>,
}

/// Paths written by one successful capture.
#[derive(Debug, Clone)]
pub struct SnapshotRecord {
    pub snapshot_dir: PathBuf,
    /// The resolved identifier, duplicate suffix included.
    pub timestamp: String,
    pub url: String,
    pub html_path: PathBuf,
    pub text_path: PathBuf,
    pub meta_path: PathBuf,
}

/// One row of the derived latest view.
///
/// The four artifact fields are paths relative to the docs root, so the
/// listing page and `index.json` can link to them directly.
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub url: String,
    pub slug: String,
    pub timestamp: String,
    pub html: String,
    pub text: String,
    pub meta: String,
    pub meta_txt: String,
}

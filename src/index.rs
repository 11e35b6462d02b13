//! Latest-view index builder.
//!
//! Scans every snapshot directory in the archive, picks the most recent
//! record per URL, and rebuilds the derived `latest/` view from scratch.
//! The output directory is wiped first, so the view always reflects exactly
//! the current archive contents and never accumulates stale entries.
//!
//! Per-record problems (missing or unparseable metadata, partial writes
//! from a crashed capture) are silently skipped; only catastrophic I/O
//! failures abort the build.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::models::IndexEntry;
use crate::site;
use crate::slug;
use crate::timestamp::SnapshotId;

/// One valid archive record: parsed metadata plus its directory.
#[derive(Debug, Clone)]
pub struct ArchivedSnapshot {
    pub url: String,
    pub timestamp: String,
    pub dir_name: String,
    pub dir_path: PathBuf,
}

/// Totals reported after a build.
#[derive(Debug)]
pub struct IndexSummary {
    /// Valid snapshot records found in the archive.
    pub scanned: usize,
    /// Entries written to the latest view.
    pub entries: usize,
}

/// Enumerate the archive and parse each snapshot's metadata.
///
/// Directories with a missing or unparseable `meta.json`, or whose metadata
/// lacks a string `url` or `timestamp`, are skipped without failing the
/// scan. A missing archive root yields an empty set.
pub fn load_snapshots(archive_root: &Path) -> Vec<ArchivedSnapshot> {
    let mut snapshots = Vec::new();
    let entries = match fs::read_dir(archive_root) {
        Ok(entries) => entries,
        Err(_) => return snapshots,
    };

    for entry in entries.flatten() {
        let dir_path = entry.path();
        if !dir_path.is_dir() {
            continue;
        }
        let Some(dir_name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let Ok(raw) = fs::read_to_string(dir_path.join("meta.json")) else {
            continue;
        };
        let Ok(meta) = serde_json::from_str::<Value>(&raw) else {
            continue;
        };
        let (Some(url), Some(timestamp)) = (
            meta.get("url").and_then(Value::as_str),
            meta.get("timestamp").and_then(Value::as_str),
        ) else {
            continue;
        };

        snapshots.push(ArchivedSnapshot {
            url: url.to_string(),
            timestamp: timestamp.to_string(),
            dir_name,
            dir_path,
        });
    }

    snapshots
}

/// Select the most recent record per URL.
///
/// Order: identifier base first (lexicographic, safe because bases are
/// zero-padded ISO-8601 strings), then duplicate counter, then directory
/// name. The directory name makes the tie-break of last resort explicit
/// instead of leaning on readdir order; it can only decide between
/// hand-made records, since capture never reuses an identifier.
pub fn pick_latest(snapshots: Vec<ArchivedSnapshot>) -> HashMap<String, ArchivedSnapshot> {
    let mut latest: HashMap<String, ArchivedSnapshot> = HashMap::new();

    for snapshot in snapshots {
        match latest.entry(snapshot.url.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(snapshot);
            }
            Entry::Occupied(mut slot) => {
                if is_more_recent(&snapshot, slot.get()) {
                    slot.insert(snapshot);
                }
            }
        }
    }

    latest
}

fn is_more_recent(candidate: &ArchivedSnapshot, existing: &ArchivedSnapshot) -> bool {
    let c = (
        SnapshotId::parse(&candidate.timestamp),
        candidate.dir_name.as_str(),
    );
    let e = (
        SnapshotId::parse(&existing.timestamp),
        existing.dir_name.as_str(),
    );
    c > e
}

/// Rebuild the derived view under `<docs root>/latest` plus the listing
/// page at `<docs root>/index.html`.
pub fn build_index(config: &Config) -> Result<IndexSummary> {
    let snapshots = load_snapshots(&config.archive.root);
    let scanned = snapshots.len();
    let latest = pick_latest(snapshots);

    let docs_root = &config.docs.root;
    let latest_root = docs_root.join("latest");
    reset_latest_dir(docs_root, &latest_root)?;

    // Sorted by URL for deterministic, stable output ordering.
    let mut urls: Vec<&String> = latest.keys().collect();
    urls.sort();

    let mut used_slugs = HashSet::new();
    let mut index_entries = Vec::new();

    for url in urls {
        let snapshot = &latest[url];
        let slug = slug::ensure_unique_slug(&slug::slugify_url(url), &mut used_slugs);

        let html_source = snapshot.dir_path.join("page.html");
        let text_source = snapshot.dir_path.join("page.txt");
        let meta_source = snapshot.dir_path.join("meta.json");

        // A metadata-only stub is not a valid latest snapshot.
        if !html_source.exists() || !text_source.exists() || !meta_source.exists() {
            continue;
        }

        copy_artifact(&html_source, &latest_root.join(format!("{slug}.html")))?;
        copy_artifact(&text_source, &latest_root.join(format!("{slug}.txt")))?;
        copy_artifact(&meta_source, &latest_root.join(format!("{slug}.meta.json")))?;
        write_meta_txt(&meta_source, &latest_root.join(format!("{slug}.meta.txt")))?;

        index_entries.push(IndexEntry {
            url: url.clone(),
            slug: slug.clone(),
            timestamp: snapshot.timestamp.clone(),
            html: format!("latest/{slug}.html"),
            text: format!("latest/{slug}.txt"),
            meta: format!("latest/{slug}.meta.json"),
            meta_txt: format!("latest/{slug}.meta.txt"),
        });
    }

    let json = serde_json::to_string_pretty(&index_entries)
        .context("failed to encode index.json")?;
    fs::write(latest_root.join("index.json"), format!("{json}\n"))
        .context("failed to write index.json")?;

    site::write_listing(docs_root, &index_entries)?;

    Ok(IndexSummary {
        scanned,
        entries: index_entries.len(),
    })
}

/// Wipe and recreate the derived output directory. Destructive and
/// idempotent.
fn reset_latest_dir(docs_root: &Path, latest_root: &Path) -> Result<()> {
    fs::create_dir_all(docs_root)
        .with_context(|| format!("failed to create {}", docs_root.display()))?;
    if latest_root.exists() {
        fs::remove_dir_all(latest_root)
            .with_context(|| format!("failed to clear {}", latest_root.display()))?;
    }
    fs::create_dir_all(latest_root)
        .with_context(|| format!("failed to create {}", latest_root.display()))?;
    Ok(())
}

fn copy_artifact(source: &Path, target: &Path) -> Result<()> {
    fs::copy(source, target).with_context(|| {
        format!(
            "failed to copy {} to {}",
            source.display(),
            target.display()
        )
    })?;
    Ok(())
}

/// Render the snapshot metadata as YAML next to the JSON copy, with a
/// guaranteed trailing newline.
fn write_meta_txt(meta_source: &Path, target: &Path) -> Result<()> {
    let raw = fs::read_to_string(meta_source)
        .with_context(|| format!("failed to read {}", meta_source.display()))?;
    let meta: Value = serde_json::from_str(&raw)
        .with_context(|| format!("invalid JSON in {}", meta_source.display()))?;

    let mut yaml =
        serde_yaml::to_string(&meta).context("failed to render metadata as YAML")?;
    if !yaml.ends_with('\n') {
        yaml.push('\n');
    }

    fs::write(target, yaml).with_context(|| format!("failed to write {}", target.display()))?;
    Ok(())
}

//! Snapshot identifiers.
//!
//! An identifier names one snapshot directory and sorts by capture time.
//! The base is an ISO-8601 UTC instant with `:` and `.` replaced by `-`,
//! which keeps it filesystem-safe and lexicographically ordered; an
//! optional `-dupN` suffix disambiguates captures that collide on the same
//! base (same second, or an explicit override during reruns).

use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};

/// A snapshot identifier split into its sortable parts.
///
/// The derived ordering is the latest-selection order: base first, then
/// duplicate counter. A strictly greater base always wins regardless of the
/// counter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SnapshotId {
    pub base: String,
    pub dup: u32,
}

impl SnapshotId {
    /// Split an identifier into `(base, dup)`.
    ///
    /// A missing `-dupN` suffix yields `dup = 0`. A malformed suffix
    /// (non-numeric digits, or a counter too large for `u32`) is treated as
    /// part of the base, since the capture side never produces one.
    pub fn parse(identifier: &str) -> Self {
        if let Some(pos) = identifier.rfind("-dup") {
            let digits = &identifier[pos + 4..];
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(dup) = digits.parse::<u32>() {
                    return Self {
                        base: identifier[..pos].to_string(),
                        dup,
                    };
                }
            }
        }
        Self {
            base: identifier.to_string(),
            dup: 0,
        }
    }
}

/// The current instant formatted as an identifier base,
/// e.g. `2024-01-02T12-00-00-000Z`.
pub fn timestamp_base() -> String {
    Utc::now()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// Resolve a collision-free snapshot directory name under `archive_root`.
///
/// Probes `<base>`, `<base>-dup1`, `<base>-dup2`, ... until a name with no
/// existing directory is found, so two captures never silently overwrite
/// each other. Safe only for serialized capture runs; concurrent writers
/// racing on one base need external mutual exclusion.
pub fn unique_snapshot_dir(archive_root: &Path, base: &str) -> (String, PathBuf) {
    let mut name = base.to_string();
    let mut path = archive_root.join(&name);
    let mut counter = 0u32;
    while path.exists() {
        counter += 1;
        name = format!("{base}-dup{counter}");
        path = archive_root.join(&name);
    }
    (name, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_without_suffix() {
        let id = SnapshotId::parse("2024-01-02T12-00-00Z");
        assert_eq!(id.base, "2024-01-02T12-00-00Z");
        assert_eq!(id.dup, 0);
    }

    #[test]
    fn parse_with_suffix() {
        let id = SnapshotId::parse("2024-01-02T12-00-00Z-dup3");
        assert_eq!(id.base, "2024-01-02T12-00-00Z");
        assert_eq!(id.dup, 3);
    }

    #[test]
    fn parse_malformed_suffix_stays_in_base() {
        let id = SnapshotId::parse("2024-01-02T12-00-00Z-dupX");
        assert_eq!(id.base, "2024-01-02T12-00-00Z-dupX");
        assert_eq!(id.dup, 0);
    }

    #[test]
    fn greater_base_beats_any_duplicate_count() {
        let older = SnapshotId::parse("2024-01-01T00-00-00Z-dup9");
        let newer = SnapshotId::parse("2024-01-02T00-00-00Z");
        assert!(newer > older);
    }

    #[test]
    fn duplicate_count_breaks_ties_on_equal_base() {
        let plain = SnapshotId::parse("2024-01-02T12-00-00Z");
        let dup = SnapshotId::parse("2024-01-02T12-00-00Z-dup1");
        assert!(dup > plain);
    }

    #[test]
    fn base_is_filesystem_safe() {
        let base = timestamp_base();
        assert!(!base.contains(':'));
        assert!(!base.contains('.'));
        assert!(base.ends_with('Z'));
    }

    #[test]
    fn unique_dir_appends_dup_suffixes() {
        let tmp = TempDir::new().unwrap();
        let base = "2024-01-02T12-00-00Z";

        let (first, first_path) = unique_snapshot_dir(tmp.path(), base);
        assert_eq!(first, base);
        std::fs::create_dir_all(&first_path).unwrap();

        let (second, second_path) = unique_snapshot_dir(tmp.path(), base);
        assert_eq!(second, format!("{base}-dup1"));
        std::fs::create_dir_all(&second_path).unwrap();

        let (third, _) = unique_snapshot_dir(tmp.path(), base);
        assert_eq!(third, format!("{base}-dup2"));
    }
}

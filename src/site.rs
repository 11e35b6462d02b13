//! Static listing page for the derived view.
//!
//! Emits `index.html` at the docs root: one table row per latest-view
//! entry, linking the source URL and all four artifact variants, or a
//! placeholder row when the archive is empty.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::models::IndexEntry;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <title>Snapshot index</title>
    <style>
      body { font-family: system-ui, -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; font-size: 14px; line-height: 1.5; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
      h1 { font-size: 20px; }
      table { border-collapse: collapse; width: 100%; margin-top: 1rem; }
      th, td { border: 1px solid #ccc; padding: 6px 8px; text-align: left; font-size: 13px; }
      th { background-color: #f5f5f5; }
      code { font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, monospace; }
      p { margin: 0.5rem 0 1rem; }
    </style>
  </head>
  <body>
    <h1>Latest URL snapshots</h1>
    <p>This list is auto-generated from archived snapshots. Each "Snapshot HTML" and "Snapshot text" link points to the most recent capture we have for that URL. Older versions remain available under <code>archive/</code> in git history.</p>
    <table>
      <thead>
        <tr>
          <th>Source URL</th>
          <th>Latest timestamp</th>
          <th>Snapshot HTML</th>
          <th>Snapshot text</th>
          <th>Snapshot meta</th>
          <th>Snapshot meta (YAML)</th>
        </tr>
      </thead>
      <tbody>
"#;

const PAGE_FOOT: &str = r#"      </tbody>
    </table>
  </body>
</html>
"#;

/// Write the listing page at `<docs root>/index.html`.
pub fn write_listing(docs_root: &Path, entries: &[IndexEntry]) -> Result<()> {
    fs::create_dir_all(docs_root)
        .with_context(|| format!("failed to create {}", docs_root.display()))?;

    let rows = if entries.is_empty() {
        "        <tr><td colspan=\"6\">No snapshots yet.</td></tr>".to_string()
    } else {
        entries
            .iter()
            .map(render_row)
            .collect::<Vec<_>>()
            .join("\n")
    };

    let html = format!("{PAGE_HEAD}{rows}\n{PAGE_FOOT}");
    let target = docs_root.join("index.html");
    fs::write(&target, html).with_context(|| format!("failed to write {}", target.display()))?;
    Ok(())
}

fn render_row(entry: &IndexEntry) -> String {
    let url = escape_html(&entry.url);
    format!(
        "        <tr>\n          <td><a href=\"{url}\">{url}</a></td>\n          \
         <td><code>{timestamp}</code></td>\n          \
         <td><a href=\"{html}\">Snapshot HTML</a></td>\n          \
         <td><a href=\"{text}\">Snapshot text</a></td>\n          \
         <td><a href=\"{meta}\">Snapshot meta</a></td>\n          \
         <td><a href=\"{meta_txt}\">Snapshot meta (YAML)</a></td>\n        </tr>",
        timestamp = escape_html(&entry.timestamp),
        html = entry.html,
        text = entry.text,
        meta = entry.meta,
        meta_txt = entry.meta_txt,
    )
}

/// Minimal escaping for text and attribute positions. Artifact paths are
/// slug-derived and need none.
fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

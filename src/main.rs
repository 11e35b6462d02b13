//! # siteshot CLI
//!
//! Two commands sharing one archive:
//!
//! | Command | Description |
//! |---------|-------------|
//! | `siteshot capture <url>` | Capture one snapshot of a URL into the archive |
//! | `siteshot index` | Rebuild the latest-view index under the docs root |
//!
//! ```bash
//! siteshot capture "https://example.com/"
//! siteshot index
//! ```
//!
//! Both commands accept a global `--config` flag pointing to a TOML file;
//! built-in defaults (`archive/` and `docs/` under the working directory)
//! apply when the file does not exist.
//!
//! When run under a GitHub workflow, `capture` records the `GITHUB_RUN_ID`
//! in the snapshot metadata and appends `snapshot_timestamp` and
//! `snapshot_url` step outputs to the file named by `GITHUB_OUTPUT`. Both
//! variables are read here and passed down explicitly, so the library core
//! stays free of process-global state.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use siteshot::capture::{self, CaptureOptions};
use siteshot::config;
use siteshot::index;
use siteshot::models::SnapshotRecord;

/// siteshot — capture web page snapshots into a timestamped archive and
/// rebuild a static latest-view index.
#[derive(Parser)]
#[command(
    name = "siteshot",
    about = "Web page snapshot archiver with a static latest-view index",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Built-in defaults apply when the
    /// file does not exist.
    #[arg(long, global = true, default_value = "./config/siteshot.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture one snapshot of a URL into the archive.
    ///
    /// Exits non-zero on an invalid URL or any navigation failure; a failed
    /// capture never leaves a partial snapshot directory behind.
    Capture {
        /// Absolute http(s) URL to capture.
        url: String,

        /// Identifier base override for deterministic reruns; defaults to
        /// the current UTC instant.
        #[arg(long)]
        timestamp: Option<String>,
    },

    /// Rebuild the latest-view index from the archive.
    ///
    /// Wipes and regenerates the `latest/` directory and the listing page.
    /// Unreadable or partial snapshots are skipped; only unrecoverable I/O
    /// failures exit non-zero.
    Index,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Capture { url, timestamp } => {
            let options = CaptureOptions {
                timestamp,
                github_run_id: std::env::var("GITHUB_RUN_ID").ok(),
                ..Default::default()
            };

            let record = capture::capture(&cfg, &url, options)
                .await
                .map_err(anyhow::Error::new)
                .context("Snapshot error")?;

            println!(
                "Snapshot saved to:\n- {}\n- {}",
                display_relative(&record.html_path),
                display_relative(&record.text_path)
            );

            if let Ok(output_path) = std::env::var("GITHUB_OUTPUT") {
                append_github_output(Path::new(&output_path), &record)
                    .context("failed to append step outputs")?;
            }
        }
        Commands::Index => {
            let summary = index::build_index(&cfg).context("Failed to build docs index")?;
            println!(
                "Index built: {} entries from {} snapshots.",
                summary.entries, summary.scanned
            );
        }
    }

    Ok(())
}

/// Report paths relative to the working directory when possible, the way CI
/// logs read best.
fn display_relative(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(&cwd).ok().map(Path::to_path_buf));
    match relative {
        Some(rel) => rel.display().to_string(),
        None => path.display().to_string(),
    }
}

/// Append the step outputs the snapshot workflow consumes.
fn append_github_output(path: &Path, record: &SnapshotRecord) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    writeln!(file, "snapshot_timestamp={}", record.timestamp)?;
    writeln!(file, "snapshot_url={}", record.url)?;
    Ok(())
}

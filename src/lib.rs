//! # siteshot
//!
//! A web page snapshot archiver with a static latest-view index.
//!
//! siteshot captures a rendered snapshot of a page (markup, extracted
//! readable text, and metadata) into a timestamped, append-only archive,
//! then rebuilds a static "latest" view mapping each tracked URL to its
//! most recent snapshot.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   append    ┌─────────────────────┐
//! │ capture  │────────────▶│ archive/<identifier>/ │
//! └──────────┘             │  page.html            │
//!                          │  page.txt             │
//!                          │  meta.json            │
//!                          └──────────┬──────────┘
//!                                     │ full scan
//!                                     ▼
//!                          ┌─────────────────────┐
//!                          │ index (rebuilt from  │
//!                          │ scratch every run)   │
//!                          │  docs/latest/<slug>.*│
//!                          │  docs/index.html     │
//!                          └─────────────────────┘
//! ```
//!
//! The two components are independent at runtime and share only the
//! on-disk archive format. Capture appends; the index builder re-derives
//! the whole view from the archive each run, so it never carries state
//! between runs.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration (paths, capture timings) |
//! | [`models`] | Archive and latest-view data types |
//! | [`timestamp`] | Snapshot identifiers and collision resolution |
//! | [`browser`] | Browser capability traits + the HTTP fetch driver |
//! | [`capture`] | Snapshot capture pipeline |
//! | [`text`] | Readable-text projection of captured HTML |
//! | [`index`] | Latest-view index builder |
//! | [`slug`] | URL-derived artifact names |
//! | [`site`] | Static listing page |
//! | [`warn`] | Non-fatal warning sink |

pub mod browser;
pub mod capture;
pub mod config;
pub mod index;
pub mod models;
pub mod site;
pub mod slug;
pub mod text;
pub mod timestamp;
pub mod warn;

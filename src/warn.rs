//! Non-fatal warning sink for the capture pipeline.
//!
//! Warnings are emitted on **stderr** so stdout stays parseable for
//! scripts. Tests plug in a collecting sink instead.

/// Receives non-fatal capture warnings (e.g. the network-idle wait timing
/// out). Implementations must not fail.
pub trait WarnSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Default sink: one line per warning on stderr.
pub struct StderrWarnings;

impl WarnSink for StderrWarnings {
    fn warn(&self, message: &str) {
        eprintln!("{message}");
    }
}

//! Progress reporting for index builds.
//!
//! Use `NoopProgress` for servers and tests, `IndicatifProgress` for the CLI.

use indicatif::{ProgressBar, ProgressStyle};

/// Minimal progress interface used by the embedding pool.
pub trait Progress: Send + Sync {
    /// Set known total steps.
    fn set_total(&self, _n: u64) {}
    /// Advance by `n` steps.
    fn advance(&self, _n: u64) {}
    /// Finish the UI.
    fn finish(&self, _msg: &str) {}
}

/// No-op reporter for servers/headless runs.
#[derive(Default, Clone, Copy)]
pub struct NoopProgress;
impl Progress for NoopProgress {}

/// Indicatif-based bar.
pub struct IndicatifProgress {
    pb: ProgressBar,
}

impl IndicatifProgress {
    /// Bounded bar (known total).
    pub fn bar(len: u64) -> Self {
        let pb = ProgressBar::new(len);
        let style = ProgressStyle::with_template(
            "{elapsed_precise} {bar:40.cyan/blue} {pos:>5}/{len:5} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        Self { pb }
    }
}

impl Progress for IndicatifProgress {
    fn set_total(&self, n: u64) {
        self.pb.set_length(n);
    }
    fn advance(&self, n: u64) {
        self.pb.inc(n);
    }
    fn finish(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }
}

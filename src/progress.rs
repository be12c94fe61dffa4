//! Progress bar for scrape runs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Row progress for one walk. A hidden bar when disabled, so callers never
/// branch on it.
pub(crate) struct WalkProgress {
    bar: ProgressBar,
}

impl WalkProgress {
    pub(crate) fn new(enabled: bool, client_id: &str) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} rows {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_message(format!("client {client_id}"));
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// Records `done` of `total` data rows processed.
    pub(crate) fn update(&self, done: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(done as u64);
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

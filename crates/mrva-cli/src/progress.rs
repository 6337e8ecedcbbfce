//! Terminal feedback for long-running commands.
//!
//! Drawing is decided once by [`ui::prefs`]: an indicatif bar on an
//! interactive terminal, plain `k/N downloaded` lines on stderr otherwise,
//! nothing at all under `--quiet`.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use mrva_engine::{DownloadEvent, TaskOutcome};

use crate::ui;

/// Spinner shown while query packs are built.
pub struct BundleSpinner {
    bar: Option<ProgressBar>,
}

impl BundleSpinner {
    #[must_use]
    pub fn start(count: usize) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_length(count as u64);
        Self { bar: Some(bar) }
    }

    pub fn bundling(&self, query: &std::path::Path) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("bundling {}", query.display()));
        }
    }

    pub fn bundled(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    /// Leave the spinner on screen with the failing query.
    pub fn failed(&self, query: &std::path::Path) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(format!("failed to bundle {}", query.display()));
        }
    }

    pub fn done(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Per-task download feedback fed from the retrieval event stream.
///
/// The bar is created on the first event, so a retrieval with nothing left
/// to download draws nothing.
pub struct DownloadProgress {
    bar: Option<ProgressBar>,
    draw: bool,
    lines: bool,
}

impl DownloadProgress {
    #[must_use]
    pub fn from_prefs() -> Self {
        let prefs = ui::prefs();
        Self {
            bar: None,
            draw: prefs.progress,
            lines: prefs.status_lines,
        }
    }

    pub fn record(&mut self, event: &DownloadEvent<'_>) {
        if self.lines {
            eprintln!("{}/{} downloaded", event.completed, event.total);
        }
        if !self.draw {
            return;
        }

        let bar = self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::new(event.total as u64);
            bar.set_style(
                ProgressStyle::with_template(bar_template(ui::prefs().term_width))
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        });
        bar.set_position(event.completed as u64);
        if let TaskOutcome::Failed { reason } = event.outcome {
            bar.set_message(format!("{} failed: {reason}", event.task.nwo));
        }
    }

    pub fn finish(self, failures: usize) {
        let Some(bar) = self.bar else {
            return;
        };
        if failures == 0 {
            bar.finish_with_message("done");
        } else {
            bar.abandon_with_message(format!("{failures} failed"));
        }
    }
}

fn bar_template(width: Option<usize>) -> &'static str {
    match width {
        Some(cols) if cols >= 110 => "{bar:40.cyan/blue} {pos}/{len} downloaded {msg}",
        Some(cols) if cols >= 80 => "{wide_bar:.cyan/blue} {pos}/{len} {msg}",
        _ => "{wide_bar:.cyan/blue} {pos}/{len}",
    }
}

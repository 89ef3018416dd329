//! Download progress with CI fallback

use super::context::UiContext;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::time::Duration;

/// Byte progress bar for the bundle download.
///
/// Shows an indicatif bar in interactive mode and a single plain line in CI.
pub struct DownloadProgress {
    bar: Option<ProgressBar>,
}

impl DownloadProgress {
    pub fn new(ctx: &UiContext, label: &str) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new(0);
            let bar_style = ProgressStyle::default_bar()
                .template("  {spinner:.cyan} Downloading {prefix}  {bar:20.cyan/dim} {bytes}/{total_bytes} {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                .progress_chars("━╸─");
            bar.set_style(bar_style);
            bar.set_prefix(label.to_string());
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            println!("{} Downloading {}", style("...").dim(), label);
            None
        };
        Self { bar }
    }

    /// Set the expected size once the response headers are known
    pub fn set_length(&self, length: u64) {
        if let Some(ref bar) = self.bar {
            bar.set_length(length);
        }
    }

    /// Wrap a reader so every byte read advances the bar
    pub fn wrap_read<'a, R: Read + 'a>(&self, reader: R) -> Box<dyn Read + 'a> {
        match self.bar {
            Some(ref bar) => Box::new(bar.wrap_read(reader)),
            None => Box::new(reader),
        }
    }

    /// Finish and clear the progress bar
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

//! Progress display for the scan and rank pipeline

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a pipeline stage runs
pub struct StageProgress {
    spinner: ProgressBar,
}

impl StageProgress {
    /// Start a spinner for a named stage
    pub fn start(message: &str) -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));

        Self { spinner }
    }

    /// Update the spinner message
    pub fn update(&self, message: &str) {
        self.spinner.set_message(message.to_string());
    }

    /// Clear the spinner without leaving a line behind
    pub fn clear(&self) {
        self.spinner.finish_and_clear();
    }
}

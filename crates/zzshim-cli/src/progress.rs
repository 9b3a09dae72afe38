//! Spinner shown while the archiver subprocess runs.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::time::Duration;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// CLI spinner wrapper.
///
/// 7-Zip reports no machine-readable progress, so this only shows that the
/// process is alive and how long it has been running. Automatically cleans
/// up on drop.
pub struct CliSpinner {
    bar: ProgressBar,
}

impl CliSpinner {
    /// Creates and starts a spinner with the given message.
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();

        // Template: "⠋ Extracting data.7z (3s)"
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(TICK_INTERVAL);

        Self { bar }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }
}

impl Drop for CliSpinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Runs `f`, showing a spinner when `enabled` and stderr is a terminal.
pub fn with_spinner<T>(enabled: bool, message: &str, f: impl FnOnce() -> T) -> T {
    let _spinner = (enabled && CliSpinner::should_show()).then(|| CliSpinner::new(message));
    f()
}

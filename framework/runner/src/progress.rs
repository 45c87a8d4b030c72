use indicatif::{ProgressBar, ProgressStyle};

/// Displays a progress bar while the scenarios are running to show the user how many are left.
pub struct ScenarioProgress {
    pb: ProgressBar,
}

impl ScenarioProgress {
    /// Start a progress bar for `total` scenarios. A hidden bar is used when `hidden` is set,
    /// which is recommended for CI where nobody is looking at the bar.
    pub fn start(total: usize, hidden: bool) -> Self {
        let pb = if hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total as u64)
        };
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} [{elapsed_precise}] {msg}",
            )
            .expect("Failed to set progress style")
            .progress_chars("#>-"),
        );

        Self { pb }
    }

    /// Show the name of the scenario that is running.
    pub fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    /// Hide the bar while `f` runs so that log lines are not mixed into it.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.pb.suspend(f)
    }

    pub fn inc(&self) {
        self.pb.inc(1);
    }

    pub fn finish(&self) {
        log::trace!("Progress finished");
        self.pb.finish_and_clear();
    }
}

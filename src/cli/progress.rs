use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::utils::fs::display_name;

pub struct FixProgress {
    bar: ProgressBar,
}

impl FixProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { bar }
    }

    pub fn set_discovering(&self, root: &Path) {
        self.bar
            .set_message(format!("Discovering reports in {}", root.display()));
    }

    pub fn set_file(&self, path: &Path) {
        self.bar
            .set_message(format!("Patching... [{}]", display_name(path)));
    }

    /// Hides the spinner while `f` writes to the terminal.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

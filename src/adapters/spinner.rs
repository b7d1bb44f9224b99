use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner drawn on stderr while a slow step runs.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.green} {msg}")
        {
            bar.set_style(spinner_style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    pub fn succeed(self, message: &str) {
        self.bar
            .finish_with_message(format!("{} {}", style("✔").green(), message));
    }

    pub fn fail(self, message: &str) {
        self.bar
            .abandon_with_message(format!("{} {}", style("✖").red(), style(message).red()));
    }
}

//! Step counter for user-facing progress text.

use tracing::info;

/// Monotonic step counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    current: u32,
    total: u32,
    quiet: bool,
}

impl Progress {
    /// Creates a counter for `total` steps.
    #[must_use]
    pub fn new(total: u32) -> Self {
        assert!(total > 0, "Total steps must be positive");
        Self {
            current: 0,
            total,
            quiet: false,
        }
    }

    /// Suppresses stderr output; steps are still logged.
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Returns the number of steps started so far.
    #[must_use]
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Returns percent complete, capped at 100.
    #[must_use]
    pub fn percent(&self) -> u32 {
        (self.current.min(self.total) * 100) / self.total
    }

    /// Advances to the next step and reports it.
    pub fn step(&mut self, label: &str) {
        self.current = self.current.saturating_add(1);
        let line = self.format_line(label);
        info!("{}", line);
        if !self.quiet {
            eprintln!("{}", line);
        }
    }

    fn format_line(&self, label: &str) -> String {
        format!(
            "[{}/{}] {:>3}% {}",
            self.current,
            self.total,
            self.percent(),
            label
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_progression() {
        let mut progress = Progress::new(4).quiet();
        assert_eq!(progress.percent(), 0);
        progress.step("one");
        assert_eq!(progress.percent(), 25);
        progress.step("two");
        progress.step("three");
        progress.step("four");
        assert_eq!(progress.percent(), 100);
        assert_eq!(progress.current(), 4);
    }

    #[test]
    fn test_percent_caps_at_100() {
        let mut progress = Progress::new(1).quiet();
        progress.step("one");
        progress.step("extra");
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn test_format_line() {
        let mut progress = Progress::new(3).quiet();
        progress.step("Installing settings");
        assert_eq!(
            progress.format_line("Installing settings"),
            "[1/3]  33% Installing settings"
        );
    }

    #[test]
    #[should_panic(expected = "Total steps must be positive")]
    fn test_zero_total_panics() {
        let _ = Progress::new(0);
    }
}

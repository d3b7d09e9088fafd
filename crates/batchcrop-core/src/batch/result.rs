//! Per-item outcomes and the aggregate batch result.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// How many failure messages the summary text lists.
pub const SUMMARY_FAILURE_LIMIT: usize = 5;

/// Result of cropping one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Saved { source: PathBuf, output: PathBuf },
    /// `message` is `"<file name>: <reason>"`.
    Failed { source: PathBuf, message: String },
}

/// Progress of a running batch, reported after each collected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

impl BatchProgress {
    /// Completed fraction in `[0, 1]`; an empty batch counts as done.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Aggregate outcome of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub total: usize,
    pub succeeded: usize,
    /// Failure messages in submission order.
    pub failures: Vec<String>,
    /// Written files in submission order.
    pub outputs: Vec<PathBuf>,
}

impl BatchResult {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Saved { output, .. } => {
                self.succeeded += 1;
                self.outputs.push(output);
            }
            ItemOutcome::Failed { message, .. } => self.failures.push(message),
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty() && self.succeeded == self.total
    }

    /// Human-readable report; lists at most the first
    /// [`SUMMARY_FAILURE_LIMIT`] failures.
    pub fn summary(&self, output_dir: &Path) -> String {
        let mut text = format!(
            "Batch crop complete!\nSucceeded: {}\nFailed: {}\nOutput directory: {}",
            self.succeeded,
            self.failed(),
            output_dir.display()
        );

        if !self.failures.is_empty() {
            text.push_str("\n\nFailures:");
            for message in self.failures.iter().take(SUMMARY_FAILURE_LIMIT) {
                let _ = write!(text, "\n{}", message);
            }
            let hidden = self.failures.len().saturating_sub(SUMMARY_FAILURE_LIMIT);
            if hidden > 0 {
                let _ = write!(text, "\n... and {} more", hidden);
            }
        }

        text
    }
}

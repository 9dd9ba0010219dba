//! Shared types used across the scan → transform → aggregate pipeline.
//!
//! A [`WorkItem`] is produced by the scanner, consumed exactly once by a
//! worker, and turned into exactly one [`Outcome`]. The coordinator folds
//! outcomes into a [`RunSummary`].

use std::path::{Path, PathBuf};

/// One input/output path pair to be processed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkItem {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl WorkItem {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Terminal per-item result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Processed,
    /// Human-readable reason, already including the failing step.
    Error(String),
}

/// Aggregate counts for a batch run.
///
/// Only the coordinator's aggregation loop mutates this; workers never see it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub errors: usize,
}

impl RunSummary {
    /// Fold one outcome into the counts.
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Processed => self.processed += 1,
            Outcome::Error(_) => self.errors += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.processed + self.errors
    }
}

/// The two resolved roots a run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl RootPaths {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
        }
    }
}

/// Source of the input and output roots.
///
/// The CLI resolves them from positional arguments; an interactive chooser
/// would be another implementation. `None` means the user supplied nothing
/// and the run must not start.
pub trait PathProvider {
    fn resolve(&self) -> Option<RootPaths>;
}

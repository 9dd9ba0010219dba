//! Batch coordination: scan, fan out to workers, aggregate.
//!
//! ## Flow
//!
//! ```text
//! scan(input, output) ──► Vec<WorkItem>
//!                              │  create output root
//!                              ▼
//!         rayon par_iter ── transform(item) ──► (input, Outcome)
//!                              │  mpsc channel
//!                              ▼
//!                 aggregation loop (owns RunSummary)
//!                              │  optional Sender<ProcessEvent>
//!                              ▼
//!                        CLI printer thread
//! ```
//!
//! Workers never touch the counters. Every outcome travels over one channel
//! to a single aggregation loop, which is the only place [`RunSummary`] is
//! mutated. The final counts are therefore exact regardless of completion
//! order.
//!
//! ## Failure Model
//!
//! Only a scan failure or failing to create the output root aborts the run.
//! Everything that goes wrong with an individual file (corrupt bytes,
//! unwritable output, even a codec panic) is an [`Outcome::Error`] for that
//! item and the batch continues.
//!
//! ## Cancellation
//!
//! There is no cancellation API. Interrupting the process can leave some
//! items unprocessed, but never a truncated output: each file is written to
//! a temp path and renamed into place.

use crate::config::ResizeConfig;
use crate::imaging::{ImageBackend, RustBackend, transform};
use crate::scan::{ScanError, scan};
use crate::types::{Outcome, RootPaths, RunSummary, WorkItem};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Cannot create output root: {0}")]
    Io(#[from] std::io::Error),
}

/// Progress event emitted while a batch runs.
///
/// Sent through an optional channel so the caller can display progress
/// as items complete, in completion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// Scan finished; `total` items are about to be dispatched.
    Started { total: usize },
    /// One item reached its terminal outcome. `processed` and `errors` are
    /// the running totals including this item.
    ItemFinished {
        input: PathBuf,
        outcome: Outcome,
        processed: usize,
        errors: usize,
    },
}

/// Process every image under `roots.input` into `roots.output` using the
/// pure Rust backend.
pub fn process(
    roots: &RootPaths,
    config: &ResizeConfig,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ProcessError> {
    process_with_backend(&RustBackend::new(), roots, config, progress)
}

/// Process images using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    roots: &RootPaths,
    config: &ResizeConfig,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ProcessError> {
    let items = scan(&roots.input, &roots.output)?;
    std::fs::create_dir_all(&roots.output)?;

    log::info!(
        "Processing {} images from {} into {}",
        items.len(),
        roots.input.display(),
        roots.output.display()
    );
    emit(progress.as_ref(), ProcessEvent::Started { total: items.len() });

    let summary = run_batch(backend, items, config, progress.as_ref());

    log::info!(
        "Batch finished: {} items, {} processed, {} errors",
        summary.total(),
        summary.processed,
        summary.errors
    );
    Ok(summary)
}

/// Dispatch `items` to the rayon pool and fold their outcomes.
///
/// Returns once every item has produced an outcome.
fn run_batch(
    backend: &impl ImageBackend,
    items: Vec<WorkItem>,
    config: &ResizeConfig,
    progress: Option<&Sender<ProcessEvent>>,
) -> RunSummary {
    let (tx, rx) = mpsc::channel::<(PathBuf, Outcome)>();

    thread::scope(|s| {
        s.spawn(move || {
            items.par_iter().for_each_with(tx, |tx, item| {
                let outcome = transform(backend, item, config);
                // The receiver lives until every sender is gone.
                let _ = tx.send((item.input.clone(), outcome));
            });
        });
        aggregate(rx, progress)
    })
}

/// Fold outcomes into a summary as they arrive.
fn aggregate(
    rx: Receiver<(PathBuf, Outcome)>,
    progress: Option<&Sender<ProcessEvent>>,
) -> RunSummary {
    let mut summary = RunSummary::default();
    for (input, outcome) in rx {
        summary.record(&outcome);
        emit(
            progress,
            ProcessEvent::ItemFinished {
                input,
                outcome,
                processed: summary.processed,
                errors: summary.errors,
            },
        );
    }
    summary
}

fn emit(progress: Option<&Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = progress {
        // A dropped receiver only means nobody is watching.
        let _ = tx.send(event);
    }
}

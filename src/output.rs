//! CLI output formatting.
//!
//! # Output Format
//!
//! ```text
//! Found 3 images in photos/
//! Processed: 1
//! Processed: 2
//! Complete! Processed: 2, Errors: 1
//! ```
//!
//! One `Processed: <n>` line per successful item, where `n` is the running
//! success count. Failed items produce no stdout line; the worker already
//! logged them at `error` level with the path and reason.
//!
//! # Architecture
//!
//! Each piece has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::process::ProcessEvent;
use crate::types::{Outcome, RunSummary};
use std::path::Path;

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent, input_root: &Path) -> Vec<String> {
    match event {
        ProcessEvent::Started { total } => {
            vec![format!(
                "Found {} {} in {}",
                total,
                if *total == 1 { "image" } else { "images" },
                input_root.display()
            )]
        }
        ProcessEvent::ItemFinished {
            outcome: Outcome::Processed,
            processed,
            ..
        } => vec![format!("Processed: {processed}")],
        ProcessEvent::ItemFinished {
            outcome: Outcome::Error(_),
            ..
        } => Vec::new(),
    }
}

/// Print a progress event to stdout.
pub fn print_process_event(event: &ProcessEvent, input_root: &Path) {
    for line in format_process_event(event, input_root) {
        println!("{}", line);
    }
}

/// The final summary line.
pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "Complete! Processed: {}, Errors: {}",
        summary.processed, summary.errors
    )
}

pub fn print_summary(summary: &RunSummary) {
    println!("{}", format_summary(summary));
}

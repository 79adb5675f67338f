//! Append-only results table.
//!
//! One CSV row per evaluated (language, model) pair. The header is written
//! when the file is created; later batches append below existing rows so a
//! long benchmark can be resumed pair by pair.

use crate::eval::PairOutcome;
use crate::matrix::escape_field;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Results table header.
pub const RESULTS_HEADER: &str = "language,model,wer,cer,sample_count,note";

/// Appends evaluation outcomes to a results CSV.
pub struct ResultsWriter {
    path: PathBuf,
}

impl ResultsWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row per outcome, creating the file (and header) if needed.
    pub fn append(&self, outcomes: &[PairOutcome]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create results directory: {}", parent.display())
            })?;
        }

        let is_new = !self.path.exists();
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open results file: {}", self.path.display()))?;

        if is_new {
            writeln!(file, "{RESULTS_HEADER}").context("Failed to write results header")?;
        }

        for outcome in outcomes {
            writeln!(file, "{}", render_row(outcome)).context("Failed to write results row")?;
        }

        Ok(())
    }
}

fn render_row(outcome: &PairOutcome) -> String {
    match outcome {
        PairOutcome::Scored(result) => format!(
            "{},{},{:.4},{:.4},{},",
            escape_field(&result.language),
            escape_field(&result.model),
            result.wer,
            result.cer,
            result.sample_count
        ),
        PairOutcome::Failed {
            language,
            model,
            note,
        }
        | PairOutcome::Skipped {
            language,
            model,
            note,
        } => format!(
            "{},{},,,0,{}",
            escape_field(language),
            escape_field(model),
            escape_field(note)
        ),
    }
}

#[cfg(test)]
#[path = "results_test.rs"]
mod tests;

//! Language × model support matrix.
//!
//! Rectangular by construction: one row per language, one column per model.
//! The scraper writes it, manual annotations and the evaluation pipeline
//! read and update it, so the CSV form must survive a round trip.

use crate::error::{BenchError, BenchResult};
use anyhow::{Context, Result};
use std::path::Path;

/// Support state of one (language, model) cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportStatus {
    /// Model declares support for the language.
    Supported,
    /// No declared support.
    Unsupported,
    /// Declared support, but inference failed at runtime.
    Failed(String),
}

impl SupportStatus {
    /// CSV cell marker.
    pub fn marker(&self) -> String {
        match self {
            SupportStatus::Supported => "yes".to_string(),
            SupportStatus::Unsupported => "no".to_string(),
            SupportStatus::Failed(note) => format!("error: {note}"),
        }
    }

    /// Parse a CSV cell marker. Markers are matched case-insensitively;
    /// a failure note keeps its original case.
    pub fn parse_marker(cell: &str) -> BenchResult<Self> {
        let cell = cell.trim();
        if let Some(prefix) = cell.get(.."error:".len())
            && prefix.eq_ignore_ascii_case("error:")
        {
            let note = &cell["error:".len()..];
            return Ok(SupportStatus::Failed(note.trim().to_string()));
        }
        match cell.to_lowercase().as_str() {
            "yes" => Ok(SupportStatus::Supported),
            "no" => Ok(SupportStatus::Unsupported),
            other => Err(BenchError::MatrixFormat(format!(
                "unknown support marker: {other:?}"
            ))),
        }
    }
}

/// Language × model support matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportMatrix {
    languages: Vec<String>,
    models: Vec<String>,
    /// `cells[row][col]` for `languages[row]` × `models[col]`.
    cells: Vec<Vec<SupportStatus>>,
}

impl SupportMatrix {
    /// Create a matrix with all cells unsupported.
    ///
    /// Duplicate languages or models are dropped, keeping first occurrence.
    pub fn new(languages: Vec<String>, models: Vec<String>) -> Self {
        let languages = dedup_preserving_order(languages);
        let models = dedup_preserving_order(models);
        let cells = vec![vec![SupportStatus::Unsupported; models.len()]; languages.len()];
        Self {
            languages,
            models,
            cells,
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    fn index(&self, language: &str, model: &str) -> Option<(usize, usize)> {
        let row = self.languages.iter().position(|l| l == language)?;
        let col = self.models.iter().position(|m| m == model)?;
        Some((row, col))
    }

    /// Status of a cell, if both axes exist.
    pub fn status(&self, language: &str, model: &str) -> Option<&SupportStatus> {
        let (row, col) = self.index(language, model)?;
        Some(&self.cells[row][col])
    }

    /// Whether a pair is marked supported (and not failure-annotated).
    pub fn is_supported(&self, language: &str, model: &str) -> bool {
        matches!(self.status(language, model), Some(SupportStatus::Supported))
    }

    /// Set a cell. Returns false if either axis is unknown.
    pub fn set(&mut self, language: &str, model: &str, status: SupportStatus) -> bool {
        match self.index(language, model) {
            Some((row, col)) => {
                self.cells[row][col] = status;
                true
            }
            None => false,
        }
    }

    /// Mark a pair as supported.
    pub fn mark_supported(&mut self, language: &str, model: &str) -> bool {
        self.set(language, model, SupportStatus::Supported)
    }

    /// Annotate a runtime failure for a pair that claimed support.
    pub fn annotate_failure(&mut self, language: &str, model: &str, note: &str) -> bool {
        self.set(
            language,
            model,
            SupportStatus::Failed(note.to_string()),
        )
    }

    /// Languages a model is currently marked supported for.
    pub fn supported_languages(&self, model: &str) -> Vec<String> {
        self.languages
            .iter()
            .filter(|l| self.is_supported(l, model))
            .cloned()
            .collect()
    }

    /// Number of models marked supported for a language.
    pub fn supported_model_count(&self, language: &str) -> usize {
        self.models
            .iter()
            .filter(|m| self.is_supported(language, m))
            .count()
    }

    /// Render as CSV: header row of model ids, one row per language.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();

        let mut header = vec!["language".to_string()];
        header.extend(self.models.iter().map(|m| escape_field(m)));
        out.push_str(&header.join(","));
        out.push('\n');

        for (row, language) in self.languages.iter().enumerate() {
            let mut record = vec![escape_field(language)];
            record.extend(self.cells[row].iter().map(|c| escape_field(&c.marker())));
            out.push_str(&record.join(","));
            out.push('\n');
        }

        out
    }

    /// Parse a matrix from its CSV form.
    pub fn parse(content: &str) -> BenchResult<Self> {
        let mut lines = content.lines().filter(|l| !l.trim().is_empty());

        let header = lines
            .next()
            .ok_or_else(|| BenchError::MatrixFormat("empty matrix file".to_string()))?;
        let header = split_record(header)?;
        if header.first().map(String::as_str) != Some("language") {
            return Err(BenchError::MatrixFormat(
                "first header column must be 'language'".to_string(),
            ));
        }
        let models: Vec<String> = header[1..].to_vec();

        let mut languages = Vec::new();
        let mut cells = Vec::new();
        for line in lines {
            let record = split_record(line)?;
            if record.len() != models.len() + 1 {
                return Err(BenchError::MatrixFormat(format!(
                    "row {:?} has {} cells, expected {}",
                    record.first().map(String::as_str).unwrap_or(""),
                    record.len().saturating_sub(1),
                    models.len()
                )));
            }
            languages.push(record[0].clone());
            let row: BenchResult<Vec<SupportStatus>> =
                record[1..].iter().map(|c| SupportStatus::parse_marker(c)).collect();
            cells.push(row?);
        }

        let mut matrix = Self::new(languages, models);
        if matrix.languages.len() != cells.len()
            || cells.iter().any(|row| row.len() != matrix.models.len())
        {
            return Err(BenchError::MatrixFormat(
                "duplicate language rows or model columns".to_string(),
            ));
        }
        matrix.cells = cells;
        Ok(matrix)
    }

    /// Write the matrix to a CSV file.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, self.to_csv())
            .with_context(|| format!("Failed to write matrix file: {}", path.display()))
    }

    /// Load a matrix from a CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read matrix file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse matrix file: {}", path.display()))
    }
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Quote a CSV field if it contains a delimiter, quote, or newline.
pub(crate) fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split one CSV record, honoring quoted fields.
pub(crate) fn split_record(line: &str) -> BenchResult<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(BenchError::MatrixFormat(format!(
            "unterminated quoted field in line: {line}"
        )));
    }

    fields.push(current);
    Ok(fields)
}

#[cfg(test)]
#[path = "matrix_test.rs"]
mod tests;

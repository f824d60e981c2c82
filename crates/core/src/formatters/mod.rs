//! Report encoders and writers.
//!
//! Every encoder renders the whole report in memory first. Files are written
//! through a temporary file in the destination directory and renamed into
//! place. A multi-file CSV report that fails part way removes the files it
//! already moved, so a failed run leaves no partial artifact behind.

pub mod csv;
pub mod json;
pub mod markdown;

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use tempfile::NamedTempFile;

use crate::analysis::Analysis;
use crate::{BlockmapError, Result};

pub use csv::{CsvConfig, CsvFormatter, convert_to_csv, table_to_csv, write_row};
pub use json::{JsonConfig, JsonFormatter, convert_to_json};
pub use markdown::{MarkdownConfig, MarkdownFormatter, convert_to_markdown, render_table};

/// Output format of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = BlockmapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(BlockmapError::ConfigError(format!(
                "Invalid report format: {s}. Valid options: markdown, json, csv"
            ))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => f.write_str("markdown"),
            Self::Json => f.write_str("json"),
            Self::Csv => f.write_str("csv"),
        }
    }
}

/// Render a report as a single document.
pub fn render(analysis: &Analysis, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Markdown => Ok(convert_to_markdown(analysis, &MarkdownConfig::default())),
        ReportFormat::Json => convert_to_json(analysis, &JsonConfig { include_tables: false, pretty: true }),
        ReportFormat::Csv => convert_to_csv(analysis, &CsvConfig::default()),
    }
}

/// Write `contents` to `path` via a temporary sibling file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| BlockmapError::WriteError(e.error))?;
    Ok(())
}

/// Write a report to `path`.
///
/// CSV output aimed at an existing directory produces one file per view
/// inside it; every other combination writes a single file.
pub fn write_report(analysis: &Analysis, format: ReportFormat, path: &Path) -> Result<Vec<std::path::PathBuf>> {
    if format == ReportFormat::Csv && path.is_dir() {
        let files = CsvFormatter::new(CsvConfig::default()).files(analysis)?;

        let mut staged = Vec::with_capacity(files.len());
        for (name, contents) in files {
            let mut tmp = NamedTempFile::new_in(path)?;
            tmp.write_all(contents.as_bytes())?;
            tmp.flush()?;
            staged.push((tmp, path.join(name)));
        }

        let mut written: Vec<std::path::PathBuf> = Vec::with_capacity(staged.len());
        for (tmp, target) in staged {
            if let Err(e) = tmp.persist(&target) {
                tracing::warn!(file = %target.display(), "csv report write failed, removing written files");
                for done in &written {
                    let _ = std::fs::remove_file(done);
                }
                return Err(BlockmapError::WriteError(e.error));
            }
            written.push(target);
        }
        tracing::debug!(dir = %path.display(), files = written.len(), "wrote csv report");
        return Ok(written);
    }

    let contents = render(analysis, format)?;
    write_atomic(path, &contents)?;
    tracing::debug!(path = %path.display(), %format, "wrote report");
    Ok(vec![path.to_path_buf()])
}

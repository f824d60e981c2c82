use std::io::{self, Write};

use crate::analysis::Analysis;
use crate::report::{Table, tables};
use crate::{BlockmapError, Result};

/// Configuration for CSV output
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Field separator
    pub separator: char,
    /// Emit the header line of each table
    pub include_headers: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self { separator: ',', include_headers: true }
    }
}

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, "{sep}")?;
        }
        if needs_quotes(cell, sep) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    write!(w, "\r\n")
}

/// Write one table: optional header line, then its rows.
pub fn write_table<W: Write>(mut w: W, table: &Table, config: &CsvConfig) -> io::Result<()> {
    if config.include_headers {
        write_row(&mut w, &table.headers, config.separator)?;
    }
    for row in &table.rows {
        write_row(&mut w, row, config.separator)?;
    }
    Ok(())
}

/// Encode one table as a CSV document
pub fn table_to_csv(table: &Table, config: &CsvConfig) -> Result<String> {
    let mut buf = Vec::new();
    write_table(&mut buf, table, config)?;
    String::from_utf8(buf).map_err(|e| BlockmapError::RenderError(e.to_string()))
}

/// Encode every view into one stream.
///
/// Each table is introduced by a single-cell title row and followed by an
/// empty line.
pub fn convert_to_csv(analysis: &Analysis, config: &CsvConfig) -> Result<String> {
    let mut buf = Vec::new();
    for table in tables(analysis) {
        write_row(&mut buf, std::slice::from_ref(&table.title), config.separator)?;
        write_table(&mut buf, &table, config)?;
        write!(buf, "\r\n")?;
    }
    String::from_utf8(buf).map_err(|e| BlockmapError::RenderError(e.to_string()))
}

/// CSV formatter with configurable options
pub struct CsvFormatter {
    config: CsvConfig,
}

impl CsvFormatter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, analysis: &Analysis) -> Result<String> {
        convert_to_csv(analysis, &self.config)
    }

    /// One `(file name, contents)` pair per view.
    pub fn files(&self, analysis: &Analysis) -> Result<Vec<(String, String)>> {
        tables(analysis)
            .iter()
            .map(|table| Ok((format!("{}.csv", table.slug), table_to_csv(table, &self.config)?)))
            .collect()
    }
}

use crate::analysis::{Analysis, PageReport};
use crate::compare::{Comparison, MissingGroup};
use crate::extract::ExtractMode;
use crate::report::{Table, tables};
use crate::{BlockmapError, Result};
use serde::Serialize;

/// Complete JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    pub target_url: &'a str,
    pub mode: ExtractMode,
    /// Every page with its blocks, competitors first
    pub pages: Vec<PageEntry<'a>>,
    pub comparison: Comparison,
    pub missing: Vec<MissingGroup>,
    /// Rendered table views
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<Table>>,
}

/// One page in JSON output
#[derive(Debug, Clone, Serialize)]
pub struct PageEntry<'a> {
    #[serde(flatten)]
    pub page: &'a PageReport,
    pub group_count: usize,
}

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Include the table views next to the structured data
    pub include_tables: bool,
    /// Pretty print JSON output
    pub pretty: bool,
}

/// Convert an analysis to JSON
pub fn convert_to_json(analysis: &Analysis, config: &JsonConfig) -> Result<String> {
    let comparison = analysis.comparison();
    let missing = comparison.missing_from_target();

    let output = JsonOutput {
        target_url: &analysis.target_url,
        mode: analysis.mode,
        pages: analysis
            .pages
            .iter()
            .map(|page| PageEntry { page, group_count: page.group_count() })
            .collect(),
        comparison,
        missing,
        tables: config.include_tables.then(|| tables(analysis)),
    };

    let encoded = if config.pretty { serde_json::to_string_pretty(&output) } else { serde_json::to_string(&output) };
    encoded.map_err(|e| BlockmapError::RenderError(e.to_string()))
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, analysis: &Analysis) -> Result<String> {
        convert_to_json(analysis, &self.config)
    }
}

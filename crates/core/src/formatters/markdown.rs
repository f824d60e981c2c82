use crate::analysis::Analysis;
use crate::report::{Table, tables};

/// Configuration for Markdown output
#[derive(Debug, Clone)]
pub struct MarkdownConfig {
    /// Include TOML frontmatter describing the run
    pub include_frontmatter: bool,
    /// List pages that failed to load
    pub include_errors: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { include_frontmatter: true, include_errors: true }
    }
}

/// Render an analysis as Markdown, one section per view
pub fn convert_to_markdown(analysis: &Analysis, config: &MarkdownConfig) -> String {
    let mut output = String::new();

    if config.include_frontmatter {
        output.push_str(&generate_frontmatter(analysis));
        output.push('\n');
    }

    output.push_str(&format!("# Structure report for {}\n", analysis.target_url));

    for table in tables(analysis) {
        output.push('\n');
        output.push_str(&render_table(&table));
    }

    let errors = analysis.errors();
    if config.include_errors && !errors.is_empty() {
        output.push_str("\n## Failed pages\n\n");
        for (url, error) in errors {
            output.push_str(&format!("- {}: {}\n", url, escape_pipe(error)));
        }
    }

    output
}

/// Generate TOML frontmatter from the run settings
fn generate_frontmatter(analysis: &Analysis) -> String {
    let mut frontmatter = String::from("+++");
    frontmatter.push_str(&format!("\ntarget = {}", toml_escape_string(&analysis.target_url)));
    frontmatter.push_str(&format!("\nmode = {}", toml_escape_string(&analysis.mode.to_string())));

    let competitors: Vec<String> = analysis.competitors().map(|page| toml_escape_string(&page.url)).collect();
    frontmatter.push_str(&format!("\ncompetitors = [{}]", competitors.join(", ")));
    frontmatter.push_str(&format!("\nfailed_pages = {}", analysis.errors().len()));
    frontmatter.push_str("\n+++\n");

    frontmatter
}

/// Escape a string for TOML format
fn toml_escape_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('\"', "\\\"").replace('\n', "\\n"))
}

/// Render one view as a titled pipe table
pub fn render_table(table: &Table) -> String {
    let mut out = format!("## {}\n\n", table.title);

    if table.is_empty() {
        out.push_str("_No entries._\n");
        return out;
    }

    out.push_str(&row_line(&table.headers));
    out.push('|');
    for _ in &table.headers {
        out.push_str("---|");
    }
    out.push('\n');
    for row in &table.rows {
        out.push_str(&row_line(row));
    }

    out
}

fn row_line(cells: &[String]) -> String {
    let escaped: Vec<String> = cells.iter().map(|cell| escape_pipe(cell)).collect();
    format!("| {} |\n", escaped.join(" | "))
}

/// Escape pipe characters and flatten newlines for Markdown tables
fn escape_pipe(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Markdown formatter with configurable options
pub struct MarkdownFormatter {
    config: MarkdownConfig,
}

impl MarkdownFormatter {
    pub fn new(config: MarkdownConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, analysis: &Analysis) -> String {
        convert_to_markdown(analysis, &self.config)
    }
}

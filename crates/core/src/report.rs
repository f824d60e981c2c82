//! Tabular report views.
//!
//! Four views are derived from a run: the group-by-page comparison matrix,
//! the flat list of every extracted heading, per-page summary statistics and
//! the groups missing from the target. Each view is a plain [`Table`] of
//! strings so any encoder can render it.

use serde::Serialize;
use url::Url;

use crate::analysis::Analysis;
use crate::block::Block;
use crate::compare::{Comparison, PageBlocks};

/// Heading excerpts in the comparison view are cut to this many characters.
pub const HEADING_EXCERPT_CHARS: usize = 45;

pub const PRESENT_MARK: &str = "✓";
pub const ABSENT_MARK: &str = "—";
pub const TARGET_MISSING: &str = "missing ✗";
pub const TARGET_STAR: &str = "★";

/// A titled table of string cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub title: String,
    /// File-name friendly identifier.
    pub slug: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(title: &str, slug: &str, headers: Vec<String>) -> Self {
        Self { title: title.to_string(), slug: slug.to_string(), headers, rows: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Short display name of a page: its host (with port), or the raw URL.
pub fn short_name(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        _ => url.to_string(),
    }
}

fn excerpt(heading: &str) -> String {
    heading.chars().take(HEADING_EXCERPT_CHARS).collect()
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes".to_string() } else { "No".to_string() }
}

fn present(block: Option<&Block>) -> Option<String> {
    block.map(|b| format!("{PRESENT_MARK} {}", excerpt(&b.heading)))
}

/// Group-by-page matrix: one row per group, one column per competitor, then
/// the target, frequency and tier.
pub fn comparison_table(comparison: &Comparison) -> Table {
    let mut headers = vec!["Group".to_string()];
    headers.extend(comparison.competitor_urls.iter().map(|url| short_name(url)));
    headers.push(format!("{TARGET_STAR} {}", short_name(&comparison.target_url)));
    headers.push("Frequency".to_string());
    headers.push("Recommendation".to_string());

    let mut table = Table::new("Block comparison", "comparison", headers);
    for row in &comparison.rows {
        let mut cells = vec![row.group.clone()];
        cells.extend(
            row.competitors
                .iter()
                .map(|cell| present(cell.block.as_ref()).unwrap_or_else(|| ABSENT_MARK.to_string())),
        );
        cells.push(present(row.target.as_ref()).unwrap_or_else(|| TARGET_MISSING.to_string()));
        cells.push(row.frequency.to_string());
        cells.push(row.tier.label().to_string());
        table.rows.push(cells);
    }
    table
}

/// Every block of every page, pages in the order given.
pub fn headings_table(pages: &[PageBlocks<'_>]) -> Table {
    let headers = [
        "Site",
        "Level",
        "Heading",
        "Group",
        "Text length",
        "CTA",
        "Form",
        "List",
        "Embedded frame",
        "Video",
        "Table",
        "Images",
        "FAQ schema",
    ]
    .map(str::to_string)
    .to_vec();

    let mut table = Table::new("Headings H1-H6", "headings", headers);
    for page in pages {
        let site = short_name(page.url);
        for block in page.blocks {
            table.rows.push(vec![
                site.clone(),
                block.level_label(),
                block.heading.clone(),
                block.group.clone(),
                block.text_length.to_string(),
                block.cta_count.to_string(),
                yes_no(block.has_form),
                yes_no(block.has_list),
                yes_no(block.has_embedded_frame),
                yes_no(block.has_video),
                yes_no(block.has_table),
                block.image_count.to_string(),
                yes_no(block.has_faq_structured_data),
            ]);
        }
    }
    table
}

/// Per-page aggregates, competitors first, then the target.
pub fn summary_table(comparison: &Comparison) -> Table {
    let headers = [
        "Site", "Role", "Blocks", "Groups", "CTA", "Forms", "Lists", "Images", "Text length", "FAQ schemas",
    ]
    .map(str::to_string)
    .to_vec();

    let mut table = Table::new("Summary", "summary", headers);
    for summary in &comparison.summaries {
        table.rows.push(vec![
            short_name(&summary.url),
            summary.role.label().to_string(),
            summary.block_count.to_string(),
            summary.group_count.to_string(),
            summary.cta_count.to_string(),
            summary.form_count.to_string(),
            summary.list_count.to_string(),
            summary.image_count.to_string(),
            summary.text_length.to_string(),
            summary.faq_schema_count.to_string(),
        ]);
    }
    table
}

/// Groups competitors have and the target lacks, most frequent first.
pub fn missing_table(comparison: &Comparison) -> Table {
    let competitors = comparison.competitor_urls.len();
    let headers = ["Group", "Competitors", "Recommendation"].map(str::to_string).to_vec();

    let mut table = Table::new("Missing on target", "missing", headers);
    for missing in comparison.missing_from_target() {
        table.rows.push(vec![
            missing.group,
            format!("{}/{competitors}", missing.frequency),
            missing.tier.label().to_string(),
        ]);
    }
    table
}

/// All four views of an analysis.
pub fn tables(analysis: &Analysis) -> Vec<Table> {
    let comparison = analysis.comparison();
    vec![
        comparison_table(&comparison),
        headings_table(&analysis.page_blocks()),
        summary_table(&comparison),
        missing_table(&comparison),
    ]
}

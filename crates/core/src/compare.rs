//! Cross-page comparison of semantic groups.
//!
//! [`ComparisonMatrixBuilder`] turns the classified blocks of one target page
//! and its competitors into an ordered list of [`ComparisonRow`]s (one per
//! group seen anywhere) plus per-page [`PageSummary`] aggregates.
//!
//! Row order is canonical-dictionary order first, then groups outside the
//! dictionary (fallback labels) in the order pages were supplied and blocks
//! were first seen on them.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::groups::KeywordIndex;

/// Priority of a group derived from how many competitors have it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Three or more competitors have the group.
    Mandatory,
    /// Exactly two competitors have the group.
    Recommended,
    /// At most one competitor has the group.
    Optional,
}

impl Tier {
    pub fn from_frequency(frequency: usize) -> Self {
        match frequency {
            f if f >= 3 => Self::Mandatory,
            2 => Self::Recommended,
            _ => Self::Optional,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mandatory => "Mandatory",
            Self::Recommended => "Recommended",
            Self::Optional => "Optional",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a page is the one under analysis or a competitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageRole {
    Target,
    Competitor,
}

impl PageRole {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Target => "target",
            Self::Competitor => "competitor",
        }
    }
}

/// Borrowed view of one page's blocks handed to the builder.
#[derive(Debug, Clone, Copy)]
pub struct PageBlocks<'a> {
    pub url: &'a str,
    pub blocks: &'a [Block],
}

impl<'a> PageBlocks<'a> {
    pub fn new(url: &'a str, blocks: &'a [Block]) -> Self {
        Self { url, blocks }
    }
}

/// Presence of a group on one competitor page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorCell {
    pub url: String,
    /// First block of the group on that page.
    pub block: Option<Block>,
}

/// One row of the comparison matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub group: String,
    /// Whether the group comes from the dictionary rather than a fallback label.
    pub canonical: bool,
    /// One cell per competitor, in competitor order.
    pub competitors: Vec<CompetitorCell>,
    /// First block of the group on the target page.
    pub target: Option<Block>,
    /// Number of competitors having the group.
    pub frequency: usize,
    pub tier: Tier,
}

impl ComparisonRow {
    pub fn target_has(&self) -> bool {
        self.target.is_some()
    }
}

/// Aggregate counts for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub url: String,
    pub role: PageRole,
    pub block_count: usize,
    pub group_count: usize,
    pub cta_count: usize,
    pub form_count: usize,
    pub list_count: usize,
    pub image_count: usize,
    pub text_length: usize,
    pub faq_schema_count: usize,
}

impl PageSummary {
    pub fn from_blocks(url: &str, role: PageRole, blocks: &[Block]) -> Self {
        let group_count = blocks.iter().map(|b| b.group.as_str()).collect::<HashSet<_>>().len();

        Self {
            url: url.to_string(),
            role,
            block_count: blocks.len(),
            group_count,
            cta_count: blocks.iter().map(|b| b.cta_count).sum(),
            form_count: blocks.iter().filter(|b| b.has_form).count(),
            list_count: blocks.iter().filter(|b| b.has_list).count(),
            image_count: blocks.iter().map(|b| b.image_count).sum(),
            text_length: blocks.iter().map(|b| b.text_length).sum(),
            faq_schema_count: blocks.iter().filter(|b| b.has_faq_structured_data).count(),
        }
    }
}

/// A group competitors have and the target lacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingGroup {
    pub group: String,
    pub frequency: usize,
    pub tier: Tier,
}

/// The full comparison artifact handed to report rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub target_url: String,
    pub competitor_urls: Vec<String>,
    pub rows: Vec<ComparisonRow>,
    /// Competitors first, in order, then the target.
    pub summaries: Vec<PageSummary>,
}

impl Comparison {
    /// Groups present on at least one competitor but absent on the target,
    /// by descending frequency. Ties keep row order.
    pub fn missing_from_target(&self) -> Vec<MissingGroup> {
        let mut missing: Vec<MissingGroup> = self
            .rows
            .iter()
            .filter(|row| !row.target_has() && row.frequency > 0)
            .map(|row| MissingGroup { group: row.group.clone(), frequency: row.frequency, tier: row.tier })
            .collect();
        missing.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        missing
    }

    pub fn row(&self, group: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|row| row.group == group)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// First block per group of one page, plus the groups in first-seen order.
struct GroupedPage<'a> {
    url: &'a str,
    first: HashMap<&'a str, &'a Block>,
    order: Vec<&'a str>,
}

impl<'a> GroupedPage<'a> {
    fn new(page: PageBlocks<'a>) -> Self {
        let mut first = HashMap::new();
        let mut order = Vec::new();
        for block in page.blocks {
            if !first.contains_key(block.group.as_str()) {
                first.insert(block.group.as_str(), block);
                order.push(block.group.as_str());
            }
        }
        Self { url: page.url, first, order }
    }

    fn representative(&self, group: &str) -> Option<&'a Block> {
        self.first.get(group).copied()
    }
}

/// Builds the comparison matrix.
///
/// # Example
///
/// ```rust
/// use blockmap_core::{Block, BlockExtractor, ComparisonMatrixBuilder, ExtractConfig, PageBlocks, Tier};
///
/// let extractor = BlockExtractor::new(ExtractConfig::default());
/// let priced = extractor.extract_html("<section><h2>Pricing</h2></section>").unwrap();
/// let empty: Vec<Block> = Vec::new();
///
/// let comparison = ComparisonMatrixBuilder::canonical().build(
///     PageBlocks::new("https://me.example", &empty),
///     &[
///         PageBlocks::new("https://a.example", &priced),
///         PageBlocks::new("https://b.example", &priced),
///     ],
/// );
///
/// assert_eq!(comparison.rows[0].frequency, 2);
/// assert_eq!(comparison.rows[0].tier, Tier::Recommended);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ComparisonMatrixBuilder<'a> {
    index: &'a KeywordIndex,
}

impl ComparisonMatrixBuilder<'static> {
    pub fn canonical() -> Self {
        Self { index: KeywordIndex::canonical() }
    }
}

impl<'a> ComparisonMatrixBuilder<'a> {
    pub fn new(index: &'a KeywordIndex) -> Self {
        Self { index }
    }

    /// Builds rows and summaries. Pure; an all-empty input yields zero rows.
    pub fn build<'p>(&self, target: PageBlocks<'p>, competitors: &[PageBlocks<'p>]) -> Comparison {
        let grouped_competitors: Vec<GroupedPage<'p>> = competitors.iter().copied().map(GroupedPage::new).collect();
        let grouped_target = GroupedPage::new(target);

        let pages: Vec<&GroupedPage<'p>> = grouped_competitors
            .iter()
            .chain(std::iter::once(&grouped_target))
            .collect();

        let ordering = self.group_ordering(&pages);

        let rows = ordering
            .into_iter()
            .map(|group| {
                let cells: Vec<CompetitorCell> = grouped_competitors
                    .iter()
                    .map(|page| CompetitorCell {
                        url: page.url.to_string(),
                        block: page.representative(group).cloned(),
                    })
                    .collect();
                let frequency = cells.iter().filter(|cell| cell.block.is_some()).count();

                ComparisonRow {
                    group: group.to_string(),
                    canonical: self.index.is_canonical(group),
                    competitors: cells,
                    target: grouped_target.representative(group).cloned(),
                    frequency,
                    tier: Tier::from_frequency(frequency),
                }
            })
            .collect::<Vec<_>>();

        let summaries = competitors
            .iter()
            .map(|page| PageSummary::from_blocks(page.url, PageRole::Competitor, page.blocks))
            .chain(std::iter::once(PageSummary::from_blocks(
                target.url,
                PageRole::Target,
                target.blocks,
            )))
            .collect();

        tracing::debug!(rows = rows.len(), competitors = competitors.len(), "built comparison matrix");

        Comparison {
            target_url: target.url.to_string(),
            competitor_urls: competitors.iter().map(|page| page.url.to_string()).collect(),
            rows,
            summaries,
        }
    }

    /// Canonical groups present on any page, in table order, then every other
    /// group in page order and first-seen order within a page.
    fn group_ordering<'p>(&self, pages: &[&GroupedPage<'p>]) -> Vec<&'p str> {
        let mut ordering: Vec<&'p str> = Vec::new();
        let mut kept: HashSet<&str> = HashSet::new();

        for name in self.index.group_names() {
            let found = pages.iter().find_map(|page| page.first.get_key_value(name).map(|(key, _)| *key));
            if let Some(group) = found
                && kept.insert(group)
            {
                ordering.push(group);
            }
        }

        for page in pages {
            for &group in &page.order {
                if kept.insert(group) {
                    ordering.push(group);
                }
            }
        }

        ordering
    }
}

//! Results of an analysis run.
//!
//! An [`Analysis`] holds one [`PageReport`] per page, competitors first in
//! the order given and the target last. A page that failed to load carries
//! an empty block list and an error note.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::compare::{Comparison, ComparisonMatrixBuilder, PageBlocks, PageRole};
use crate::extract::ExtractMode;

/// Outcome of processing one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReport {
    pub url: String,
    pub role: PageRole,
    pub blocks: Vec<Block>,
    /// Why the page yielded no blocks, when it failed to load.
    pub error: Option<String>,
}

impl PageReport {
    pub fn new(url: impl Into<String>, role: PageRole, blocks: Vec<Block>) -> Self {
        Self { url: url.into(), role, blocks, error: None }
    }

    pub fn failed(url: impl Into<String>, role: PageRole, error: impl Into<String>) -> Self {
        Self { url: url.into(), role, blocks: Vec::new(), error: Some(error.into()) }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Number of distinct groups among the page's blocks.
    pub fn group_count(&self) -> usize {
        self.blocks.iter().map(|b| b.group.as_str()).collect::<HashSet<_>>().len()
    }

    pub fn as_page_blocks(&self) -> PageBlocks<'_> {
        PageBlocks::new(&self.url, &self.blocks)
    }
}

/// Result of a run: one report per page, competitors first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub target_url: String,
    pub mode: ExtractMode,
    pub pages: Vec<PageReport>,
}

impl Analysis {
    pub fn target(&self) -> Option<&PageReport> {
        self.pages.iter().find(|page| page.role == PageRole::Target)
    }

    pub fn competitors(&self) -> impl Iterator<Item = &PageReport> {
        self.pages.iter().filter(|page| page.role == PageRole::Competitor)
    }

    /// Blocks extracted for `url`, if the page belongs to the run.
    pub fn blocks_for(&self, url: &str) -> Option<&[Block]> {
        self.pages
            .iter()
            .find(|page| page.url == url)
            .map(|page| page.blocks.as_slice())
    }

    /// Pages that failed, with their error notes.
    pub fn errors(&self) -> Vec<(&str, &str)> {
        self.pages
            .iter()
            .filter_map(|page| page.error.as_deref().map(|e| (page.url.as_str(), e)))
            .collect()
    }

    /// Every page in processing order as borrowed block lists.
    pub fn page_blocks(&self) -> Vec<PageBlocks<'_>> {
        self.pages.iter().map(PageReport::as_page_blocks).collect()
    }

    /// Cross-page comparison over the canonical dictionary.
    pub fn comparison(&self) -> Comparison {
        let target = self
            .target()
            .map(PageReport::as_page_blocks)
            .unwrap_or_else(|| PageBlocks::new(&self.target_url, &[]));
        let competitors: Vec<PageBlocks<'_>> = self.competitors().map(PageReport::as_page_blocks).collect();

        ComparisonMatrixBuilder::canonical().build(target, &competitors)
    }
}

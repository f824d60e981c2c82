//! Sequential analysis runs.
//!
//! [`Analyzer`] fetches every competitor page in order and then the target
//! page, one at a time. Each fetch is bounded by the run's per-page timeout.
//! A page that fails to load contributes an empty block list and an error
//! note; it never aborts the run. There are no retries.
//!
//! # Example
//!
//! ```rust,no_run
//! use blockmap_core::{Analyzer, HttpSource, RunConfig};
//!
//! # async fn run() -> blockmap_core::Result<()> {
//! let config = RunConfig::builder("https://mysite.example")
//!     .competitors(["https://a.example", "https://b.example", "https://c.example", "https://d.example"])
//!     .build()?;
//!
//! let analysis = Analyzer::new(HttpSource::default(), config).run().await;
//! for missing in analysis.comparison().missing_from_target() {
//!     println!("{} ({}/4 competitors)", missing.group, missing.frequency);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use crate::analysis::{Analysis, PageReport};
use crate::block::Block;
use crate::compare::PageRole;
use crate::config::RunConfig;
use crate::extract::BlockExtractor;
use crate::fetch::PageSource;
use crate::{BlockmapError, Result};

/// Slack on top of the per-page timeout before a hung source is abandoned.
const FETCH_GRACE: Duration = Duration::from_secs(15);

/// Progress notifications emitted while a run proceeds.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    /// Page `index` of `total` (1-based) is about to be fetched.
    Started { index: usize, total: usize, url: &'a str, role: PageRole },
    /// Page `index` of `total` has been processed.
    Finished { index: usize, total: usize, report: &'a PageReport },
}

/// Fetches, extracts and collects the pages of a run.
pub struct Analyzer<S> {
    source: S,
    config: RunConfig,
    extractor: BlockExtractor<'static>,
}

impl<S: PageSource> Analyzer<S> {
    pub fn new(source: S, config: RunConfig) -> Self {
        let extractor = BlockExtractor::new(config.extract_config());
        Self { source, config, extractor }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Processes every page without progress reporting.
    pub async fn run(&self) -> Analysis {
        self.run_with_progress(|_| {}).await
    }

    /// Processes competitors first, then the target, calling `progress`
    /// before and after each page.
    pub async fn run_with_progress<F>(&self, mut progress: F) -> Analysis
    where
        F: FnMut(Progress<'_>),
    {
        let pages: Vec<(&str, PageRole)> = self
            .config
            .competitor_urls
            .iter()
            .map(|url| (url.as_str(), PageRole::Competitor))
            .chain(std::iter::once((self.config.target_url.as_str(), PageRole::Target)))
            .collect();
        let total = pages.len();

        let mut reports = Vec::with_capacity(total);
        for (i, (url, role)) in pages.into_iter().enumerate() {
            let index = i + 1;
            progress(Progress::Started { index, total, url, role });

            let report = self.analyze_page(url, role).await;
            progress(Progress::Finished { index, total, report: &report });
            reports.push(report);
        }

        Analysis { target_url: self.config.target_url.clone(), mode: self.config.mode, pages: reports }
    }

    /// Fetches and extracts a single page, turning any failure into a note.
    pub async fn analyze_page(&self, url: &str, role: PageRole) -> PageReport {
        match self.load_blocks(url).await {
            Ok(blocks) => {
                tracing::info!(url, role = role.label(), blocks = blocks.len(), "page analysed");
                PageReport::new(url, role, blocks)
            }
            Err(e) => {
                tracing::warn!(url, role = role.label(), error = %e, "page failed");
                PageReport::failed(url, role, e.to_string())
            }
        }
    }

    async fn load_blocks(&self, url: &str) -> Result<Vec<Block>> {
        let timeout = self.config.timeout_duration();
        let html = tokio::time::timeout(timeout + FETCH_GRACE, self.source.fetch(url, timeout))
            .await
            .map_err(|_| BlockmapError::Timeout { timeout: self.config.timeout })??;

        self.extractor.extract_html(&html)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::compare::Tier;

    struct MapSource {
        pages: HashMap<String, String>,
    }

    impl MapSource {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self { pages: pages.iter().map(|(url, html)| (url.to_string(), html.to_string())).collect() }
        }
    }

    impl PageSource for MapSource {
        async fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
            if url.contains("slow") {
                tokio::time::sleep(timeout * 10).await;
            }
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| BlockmapError::HttpStatus { status: 404, body: "not found".to_string() })
        }
    }

    const PRICED: &str = "<body><section><h2>Our pricing</h2></section><section><h2>FAQ</h2></section></body>";
    const TEAM: &str = "<body><section><h2>Our team</h2></section></body>";

    fn config(target: &str, competitors: &[&str]) -> RunConfig {
        RunConfig::builder(target).competitors(competitors.iter().copied()).build().unwrap()
    }

    #[tokio::test]
    async fn test_competitors_processed_before_target() {
        let source = MapSource::new(&[
            ("https://a.example", PRICED),
            ("https://b.example", PRICED),
            ("https://c.example", PRICED),
            ("https://d.example", TEAM),
            ("https://me.example", TEAM),
        ]);
        let config = config(
            "https://me.example",
            &["https://a.example", "https://b.example", "https://c.example", "https://d.example"],
        );

        let mut started = Vec::new();
        let analysis = Analyzer::new(source, config)
            .run_with_progress(|event| {
                if let Progress::Started { index, total, url, .. } = event {
                    started.push((index, total, url.to_string()));
                }
            })
            .await;

        assert_eq!(started.len(), 5);
        assert_eq!(started[0], (1, 5, "https://a.example".to_string()));
        assert_eq!(started[4], (5, 5, "https://me.example".to_string()));
        assert_eq!(analysis.pages.last().unwrap().role, PageRole::Target);
        assert!(analysis.errors().is_empty());

        let comparison = analysis.comparison();
        let pricing = comparison.row("Pricing").unwrap();
        assert_eq!(pricing.frequency, 3);
        assert_eq!(pricing.tier, Tier::Mandatory);
        assert!(!pricing.target_has());
    }

    #[tokio::test]
    async fn test_failed_page_is_isolated() {
        let source = MapSource::new(&[
            ("https://a.example", PRICED),
            ("https://b.example", PRICED),
            ("https://c.example", TEAM),
            ("https://me.example", TEAM),
        ]);
        let config = config(
            "https://me.example",
            &["https://a.example", "https://b.example", "https://c.example", "https://gone.example"],
        );

        let analysis = Analyzer::new(source, config).run().await;
        assert_eq!(analysis.pages.len(), 5);

        let errors = analysis.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "https://gone.example");
        assert!(errors[0].1.contains("404"));
        assert_eq!(analysis.blocks_for("https://gone.example"), Some(&[][..]));
        assert_eq!(analysis.blocks_for("https://a.example").map(<[Block]>::len), Some(2));
        assert_eq!(analysis.blocks_for("https://unknown.example"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_source_times_out() {
        let source = MapSource::new(&[
            ("https://a.example", PRICED),
            ("https://b.example", PRICED),
            ("https://c.example", PRICED),
            ("https://slow.example", PRICED),
            ("https://me.example", TEAM),
        ]);
        let config = config(
            "https://me.example",
            &["https://a.example", "https://b.example", "https://c.example", "https://slow.example"],
        );

        let analysis = Analyzer::new(source, config).run().await;
        let slow = &analysis.pages[3];
        assert!(slow.blocks.is_empty());
        assert_eq!(slow.error.as_deref(), Some("Request timed out after 30 seconds"));
        assert!(analysis.target().unwrap().is_ok());
    }
}

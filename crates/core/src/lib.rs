pub mod analysis;
pub mod block;
pub mod classify;
pub mod compare;
pub mod config;
pub mod error;
pub mod extract;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod formatters;
pub mod groups;
pub mod normalize;
pub mod parse;
pub mod report;
#[cfg(feature = "fetch")]
pub mod run;
pub mod schema;

pub use analysis::{Analysis, PageReport};
pub use block::Block;
pub use classify::GroupClassifier;
pub use compare::{
    Comparison, ComparisonMatrixBuilder, ComparisonRow, CompetitorCell, MissingGroup, PageBlocks, PageRole,
    PageSummary, Tier,
};
pub use config::{
    DEFAULT_TIMEOUT_SECS, MAX_COMPETITORS, MAX_TIMEOUT_SECS, MIN_COMPETITORS, MIN_TIMEOUT_SECS, RunConfig,
    RunConfigBuilder, parse_url_list, validate_url,
};
pub use error::{BlockmapError, Result};
pub use extract::{BlockExtractor, ExtractConfig, ExtractMode, extract_blocks, extract_blocks_from_html};
#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, FileSource, HttpSource, PageSource, RenderConfig, RenderingSource};
#[cfg(feature = "fetch")]
pub use fetch::{fetch_file, fetch_url};
pub use formatters::{
    CsvConfig, CsvFormatter, JsonConfig, JsonFormatter, MarkdownConfig, MarkdownFormatter, ReportFormat,
};
pub use formatters::{convert_to_csv, convert_to_json, convert_to_markdown, render, write_atomic, write_report};
pub use groups::{CANONICAL_GROUPS, DuplicateKeyword, KeywordIndex, SemanticGroup};
pub use normalize::normalize;
pub use parse::Document;
pub use report::{Table, comparison_table, headings_table, missing_table, short_name, summary_table};
#[cfg(feature = "fetch")]
pub use run::{Analyzer, Progress};
pub use schema::{declares_faq_page, parse_ld_json};

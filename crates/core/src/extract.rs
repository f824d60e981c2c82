//! Heading-anchored block extraction.
//!
//! The extractor scans a parsed page in document order for `h1`-`h6`
//! elements, resolves each heading to its nearest structural container and
//! records one [`Block`] per distinct container with the content signals
//! found inside it.
//!
//! The document is never mutated. Non-content elements (scripts, styles,
//! inline SVG, metadata) and, in [`ExtractMode::ContentOnly`], the page
//! header, footer and navigation landmarks are skipped while walking the tree.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use scraper::ElementRef;
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::classify::GroupClassifier;
use crate::parse::Document;
use crate::schema::declares_faq_page;
use crate::{BlockmapError, Result};

/// Elements that never contribute headings or text.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "svg", "meta", "link"];

/// Landmark regions dropped in content-only mode.
const LANDMARK_TAGS: &[&str] = &["header", "footer", "nav"];

/// Generic structural containers a heading can anchor.
const CONTAINER_TAGS: &[&str] = &["section", "div", "article", "main", "aside"];

const LD_JSON_TYPE: &str = "application/ld+json";

/// Which parts of the page are searched for headings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractMode {
    /// The whole body, typical for landing pages.
    #[default]
    Full,
    /// The body without `header`, `footer` and `nav`, typical for inner pages.
    ContentOnly,
}

impl FromStr for ExtractMode {
    type Err = BlockmapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "full" | "main" => Ok(Self::Full),
            "content-only" | "content" | "inner" => Ok(Self::ContentOnly),
            _ => Err(BlockmapError::ConfigError(format!(
                "Invalid extraction mode: {s}. Valid options: full, content-only"
            ))),
        }
    }
}

impl fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("full"),
            Self::ContentOnly => f.write_str("content-only"),
        }
    }
}

/// Configuration for block extraction
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Regions searched for headings
    pub mode: ExtractMode,
    /// How many ancestors are inspected when looking for a container
    pub max_ancestor_depth: usize,
    /// Links with visible text shorter than this count as calls to action
    pub cta_text_limit: usize,
    /// Headings with fewer characters are ignored
    pub min_heading_chars: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { mode: ExtractMode::Full, max_ancestor_depth: 8, cta_text_limit: 60, min_heading_chars: 2 }
    }
}

impl ExtractConfig {
    pub fn with_mode(mode: ExtractMode) -> Self {
        Self { mode, ..Default::default() }
    }

    fn is_pruned(&self, tag: &str) -> bool {
        NON_CONTENT_TAGS.contains(&tag) || self.is_pruned_landmark(tag)
    }

    fn is_pruned_landmark(&self, tag: &str) -> bool {
        self.mode == ExtractMode::ContentOnly && LANDMARK_TAGS.contains(&tag)
    }
}

/// Extracts blocks from pages and classifies their headings.
///
/// # Example
///
/// ```rust
/// use blockmap_core::{BlockExtractor, ExtractConfig};
///
/// let html = r#"<body><section><h2>Our pricing</h2><a href="/buy">Buy now</a></section></body>"#;
/// let blocks = BlockExtractor::new(ExtractConfig::default()).extract_html(html).unwrap();
///
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].group, "Pricing");
/// assert_eq!(blocks[0].cta_count, 1);
/// ```
#[derive(Debug, Clone)]
pub struct BlockExtractor<'a> {
    config: ExtractConfig,
    classifier: GroupClassifier<'a>,
}

impl BlockExtractor<'static> {
    /// Extractor using the built-in dictionary.
    pub fn new(config: ExtractConfig) -> Self {
        Self { config, classifier: GroupClassifier::canonical() }
    }
}

impl<'a> BlockExtractor<'a> {
    pub fn with_classifier(config: ExtractConfig, classifier: GroupClassifier<'a>) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Parses `html` and extracts its blocks.
    pub fn extract_html(&self, html: &str) -> Result<Vec<Block>> {
        let doc = Document::parse(html)?;
        Ok(self.extract(&doc))
    }

    /// Extracts blocks in document order of their first-seen container.
    ///
    /// A page without qualifying headings yields an empty vector.
    pub fn extract(&self, doc: &Document) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut seen_containers = HashSet::new();

        for (heading, level) in collect_headings(doc.body(), &self.config) {
            let text = heading_text(heading, &self.config);
            if text.chars().count() < self.config.min_heading_chars {
                continue;
            }

            let Some(container) = resolve_container(heading, self.config.max_ancestor_depth) else {
                continue;
            };
            // tree node identity, not the `id` attribute
            if !seen_containers.insert((*container).id()) {
                continue;
            }

            let signals = measure_container(container, &self.config);
            let group = self.classifier.classify(&text);

            blocks.push(Block {
                heading: text,
                level,
                text_length: signals.text_length,
                cta_count: signals.buttons + signals.cta_links,
                has_form: signals.has_form,
                has_list: signals.has_list,
                has_embedded_frame: signals.has_iframe,
                has_video: signals.has_video,
                has_table: signals.has_table,
                image_count: signals.images,
                has_faq_structured_data: signals.has_faq_schema,
                group,
            });
        }

        tracing::debug!(mode = %self.config.mode, blocks = blocks.len(), "extracted blocks");
        blocks
    }
}

/// Extracts the blocks of a parsed page.
pub fn extract_blocks(doc: &Document, config: &ExtractConfig, classifier: &GroupClassifier<'_>) -> Vec<Block> {
    BlockExtractor::with_classifier(config.clone(), *classifier).extract(doc)
}

/// Parses `html` and extracts its blocks with the built-in dictionary.
pub fn extract_blocks_from_html(html: &str, config: &ExtractConfig) -> Result<Vec<Block>> {
    BlockExtractor::new(config.clone()).extract_html(html)
}

/// Content signals measured inside one container.
#[derive(Debug, Default)]
struct Signals {
    text_length: usize,
    buttons: usize,
    cta_links: usize,
    has_form: bool,
    has_list: bool,
    has_iframe: bool,
    has_video: bool,
    has_table: bool,
    images: usize,
    has_faq_schema: bool,
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Headings under `root` in document order, skipping pruned subtrees.
fn collect_headings<'a>(root: ElementRef<'a>, config: &ExtractConfig) -> Vec<(ElementRef<'a>, u8)> {
    let mut headings = Vec::new();
    let mut stack: Vec<ElementRef<'a>> = root.children().rev().filter_map(ElementRef::wrap).collect();

    while let Some(el) = stack.pop() {
        let tag = el.value().name();
        if config.is_pruned(tag) {
            continue;
        }
        if let Some(level) = heading_level(tag) {
            headings.push((el, level));
        }
        stack.extend(el.children().rev().filter_map(ElementRef::wrap));
    }

    headings
}

/// Nearest structural container above `heading`.
///
/// Walks at most `max_depth` ancestors. Reaching `body`/`html`, the document
/// node, or the depth limit falls back to the heading's parent element.
fn resolve_container(heading: ElementRef<'_>, max_depth: usize) -> Option<ElementRef<'_>> {
    let parent = heading.parent().and_then(ElementRef::wrap)?;
    let mut current = Some(parent);

    for _ in 0..max_depth {
        let Some(el) = current else {
            break;
        };
        let tag = el.value().name();
        if matches!(tag, "body" | "html") {
            break;
        }
        if CONTAINER_TAGS.contains(&tag) {
            return Some(el);
        }
        current = el.parent().and_then(ElementRef::wrap);
    }

    Some(parent)
}

/// Trimmed, non-empty text pieces under `root` joined by `separator`.
/// Raw text nodes under `root` in document order, skipping pruned elements.
fn text_nodes<'a>(root: ElementRef<'a>, config: &ExtractConfig) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut stack: Vec<_> = root.children().rev().collect();

    while let Some(node) = stack.pop() {
        if let Some(text) = node.value().as_text() {
            pieces.push(&**text);
            continue;
        }
        if let Some(el) = ElementRef::wrap(node)
            && !config.is_pruned(el.value().name())
        {
            stack.extend(node.children().rev());
        }
    }

    pieces
}

fn visible_text(root: ElementRef<'_>, config: &ExtractConfig, separator: &str) -> String {
    let pieces: Vec<&str> = text_nodes(root, config)
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect();
    pieces.join(separator)
}

/// Heading text as rendered: inline markup never splits a word, and
/// whitespace runs collapse to one space.
fn heading_text(heading: ElementRef<'_>, config: &ExtractConfig) -> String {
    let raw = text_nodes(heading, config).concat();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_ld_json(script: ElementRef<'_>) -> bool {
    script
        .value()
        .attr("type")
        .is_some_and(|ty| ty.trim().eq_ignore_ascii_case(LD_JSON_TYPE))
}

fn measure_container(container: ElementRef<'_>, config: &ExtractConfig) -> Signals {
    let mut signals = Signals::default();
    let mut text_chars = 0usize;
    let mut text_pieces = 0usize;
    let mut stack: Vec<_> = container.children().rev().collect();

    while let Some(node) = stack.pop() {
        if let Some(text) = node.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                text_chars += trimmed.chars().count();
                text_pieces += 1;
            }
            continue;
        }

        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        let tag = el.value().name();

        if config.is_pruned_landmark(tag) {
            continue;
        }
        if tag == "script" && is_ld_json(el) {
            let payload: String = el.text().collect();
            signals.has_faq_schema |= declares_faq_page(&payload);
            continue;
        }
        if config.is_pruned(tag) {
            continue;
        }

        match tag {
            "button" => signals.buttons += 1,
            "a" => {
                let label = visible_text(el, config, "");
                let chars = label.chars().count();
                if chars > 0 && chars < config.cta_text_limit {
                    signals.cta_links += 1;
                }
            }
            "form" => signals.has_form = true,
            "ul" | "ol" => signals.has_list = true,
            "iframe" => signals.has_iframe = true,
            "video" => signals.has_video = true,
            "table" => signals.has_table = true,
            "img" => signals.images += 1,
            _ => {}
        }

        stack.extend(node.children().rev());
    }

    // pieces are joined with single spaces
    signals.text_length = text_chars + text_pieces.saturating_sub(1);
    signals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str, mode: ExtractMode) -> Vec<Block> {
        BlockExtractor::new(ExtractConfig::with_mode(mode)).extract_html(html).unwrap()
    }

    #[test]
    fn test_extract_config_default() {
        let config = ExtractConfig::default();
        assert_eq!(config.mode, ExtractMode::Full);
        assert_eq!(config.max_ancestor_depth, 8);
        assert_eq!(config.cta_text_limit, 60);
        assert_eq!(config.min_heading_chars, 2);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("full".parse::<ExtractMode>().unwrap(), ExtractMode::Full);
        assert_eq!("Content-Only".parse::<ExtractMode>().unwrap(), ExtractMode::ContentOnly);
        assert_eq!("inner".parse::<ExtractMode>().unwrap(), ExtractMode::ContentOnly);
        assert!(matches!("sideways".parse::<ExtractMode>(), Err(BlockmapError::ConfigError(_))));
        assert_eq!(ExtractMode::ContentOnly.to_string(), "content-only");
    }

    #[test]
    fn test_blocks_in_document_order() {
        let html = r#"
            <body>
                <section><h1>Welcome to Acme</h1></section>
                <section><h2>Pricing</h2></section>
                <section><h2>Customer reviews</h2></section>
            </body>
        "#;

        let blocks = extract(html, ExtractMode::Full);
        let groups: Vec<&str> = blocks.iter().map(|b| b.group.as_str()).collect();
        assert_eq!(groups, vec!["Hero", "Pricing", "Testimonials"]);
        assert_eq!(blocks[0].level, 1);
        assert_eq!(blocks[1].level, 2);
    }

    #[test]
    fn test_container_dedup_keeps_first_heading() {
        let html = r#"
            <body>
                <div class="pricing">
                    <h2>Plans and pricing</h2>
                    <h3>Enterprise plan</h3>
                </div>
            </body>
        "#;

        let blocks = extract(html, ExtractMode::Full);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].heading, "Plans and pricing");
    }

    #[test]
    fn test_nearest_container_wins() {
        let html = r#"
            <body>
                <section id="outer">
                    <div><span><h2>Our team</h2></span></div>
                    <div><h2>Our story</h2></div>
                </section>
            </body>
        "#;

        let blocks = extract(html, ExtractMode::Full);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].group, "Team");
        assert_eq!(blocks[1].group, "About");
    }

    #[test]
    fn test_heading_directly_in_body_uses_body() {
        let html = r#"<body><h2>Pricing</h2><p>Cheap.</p><h2>FAQ</h2></body>"#;

        let blocks = extract(html, ExtractMode::Full);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].heading, "Pricing");
        assert_eq!(blocks[0].text_length, "Pricing Cheap. FAQ".chars().count());
    }

    #[test]
    fn test_depth_limit_falls_back_to_parent() {
        let html = r#"
            <body>
                <div id="far">
                    <span><b><i><em><u><small><strong><mark><h3>Deep heading</h3></mark></strong></small></u></em></i></b></span>
                </div>
            </body>
        "#;

        let blocks = extract(html, ExtractMode::Full);
        assert_eq!(blocks.len(), 1);
        // the container is <mark>, so only the heading's own text is measured
        assert_eq!(blocks[0].text_length, "Deep heading".len());
    }

    #[test]
    fn test_heading_word_split_by_inline_markup() {
        let html = r#"
            <body>
                <section><h2>Pri<span>cing</span></h2></section>
                <section><h2><b>Т</b>арифы</h2></section>
                <section><h2>Why choose <em>us</em></h2></section>
            </body>
        "#;

        let blocks = extract(html, ExtractMode::Full);
        let headings: Vec<(&str, &str)> = blocks.iter().map(|b| (b.heading.as_str(), b.group.as_str())).collect();
        assert_eq!(
            headings,
            vec![("Pricing", "Pricing"), ("Тарифы", "Pricing"), ("Why choose us", "Benefits")]
        );
    }

    #[test]
    fn test_heading_whitespace_collapsed() {
        let html = "<body><section><h2>  Why   choose\n   us </h2></section></body>";

        let blocks = extract(html, ExtractMode::Full);
        assert_eq!(blocks[0].heading, "Why choose us");
    }

    #[test]
    fn test_short_headings_skipped() {
        let html = r#"<body><section><h2> A </h2></section><section><h2></h2></section></body>"#;
        assert!(extract(html, ExtractMode::Full).is_empty());
    }

    #[test]
    fn test_content_signals() {
        let html = r#"
            <body>
                <section>
                    <h2>Contact us</h2>
                    <p>Write   to us any time.</p>
                    <form><input name="email"><button>Send</button></form>
                    <ul><li>Phone</li></ul>
                    <a href="/a">Call</a>
                    <a href="/b"></a>
                    <a href="/c">This link text is definitely far longer than sixty characters in total</a>
                    <a href="/d"><svg><title>icon</title></svg></a>
                    <iframe src="https://maps.example.com"></iframe>
                    <video src="/v.mp4"></video>
                    <table><tr><td>9-18</td></tr></table>
                    <img src="/1.png"><img src="/2.png">
                </section>
            </body>
        "#;

        let blocks = extract(html, ExtractMode::Full);
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.group, "Contacts");
        assert_eq!(block.cta_count, 2);
        assert!(block.has_form);
        assert!(block.has_list);
        assert!(block.has_embedded_frame);
        assert!(block.has_video);
        assert!(block.has_table);
        assert_eq!(block.image_count, 2);
        assert!(!block.has_faq_structured_data);
    }

    #[test]
    fn test_text_length_ignores_scripts_and_styles() {
        let html = r#"
            <body>
                <section>
                    <h2>About</h2>
                    <style>.x { color: red }</style>
                    <script>var hidden = "text";</script>
                    <p>We build things.</p>
                </section>
            </body>
        "#;

        let blocks = extract(html, ExtractMode::Full);
        assert_eq!(blocks[0].text_length, "About We build things.".chars().count());
    }

    #[test]
    fn test_faq_structured_data() {
        let html = r#"
            <body>
                <section>
                    <h2>Frequently asked questions</h2>
                    <script type="application/ld+json">{"@context":"https://schema.org","@type":"FAQPage"}</script>
                </section>
                <section>
                    <h2>Pricing</h2>
                    <script type="application/ld+json">{"@type": "FAQPage",</script>
                </section>
            </body>
        "#;

        let blocks = extract(html, ExtractMode::Full);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].has_faq_structured_data);
        assert!(!blocks[1].has_faq_structured_data);
    }

    #[test]
    fn test_content_only_skips_landmarks() {
        let html = r#"
            <body>
                <header><div><h2>Site menu</h2></div></header>
                <nav><h3>Navigation links</h3></nav>
                <main>
                    <section><h2>Our services</h2><nav><a href="/x">Menu</a></nav></section>
                </main>
                <footer><div><h4>Contacts</h4></div></footer>
            </body>
        "#;

        let full = extract(html, ExtractMode::Full);
        assert_eq!(full.len(), 4);

        let content = extract(html, ExtractMode::ContentOnly);
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].group, "Services / Products");
        assert_eq!(content[0].cta_count, 0);
    }

    #[test]
    fn test_headings_inside_noscript_ignored() {
        let html = r#"<body><div><noscript><h2>Enable JavaScript</h2></noscript></div></body>"#;
        assert!(extract(html, ExtractMode::Full).is_empty());
    }

    #[test]
    fn test_no_headings_yields_empty() {
        let html = r#"<html><body><p>Just text</p></body></html>"#;
        assert!(extract(html, ExtractMode::ContentOnly).is_empty());
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let html = r#"
            <body>
                <header><h1>Brand</h1></header>
                <section><h2>Why choose us</h2><ul><li>Fast</li></ul></section>
                <section><h2>Zzqx Wobble Init Panel</h2></section>
            </body>
        "#;
        let doc = Document::parse(html).unwrap();
        let config = ExtractConfig::with_mode(ExtractMode::ContentOnly);

        let classifier = GroupClassifier::canonical();

        let first = extract_blocks(&doc, &config, &classifier);
        let second = extract_blocks(&doc, &config, &classifier);
        assert_eq!(first, second);
        assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
    }
}

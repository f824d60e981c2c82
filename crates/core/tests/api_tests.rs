//! Library API integration tests
use std::time::Duration;

use blockmap_core::*;

const PAGES_DIR: &str = "../../tests/fixtures/pages";
const TARGET: &str = "https://mysite.example/";
const COMPETITORS: [&str; 4] = [
    "https://alpha.example/",
    "https://beta.example/landing",
    "https://gamma.example/",
    "https://delta.example/",
];

fn get_page_fixture(host: &str) -> String {
    std::fs::read_to_string(format!("{PAGES_DIR}/{host}.html")).unwrap()
}

fn run_config(mode: ExtractMode) -> RunConfig {
    RunConfig::builder(TARGET).competitors(COMPETITORS).mode(mode).build().unwrap()
}

async fn analyze_fixtures(mode: ExtractMode) -> Analysis {
    Analyzer::new(FileSource::new(PAGES_DIR), run_config(mode)).run().await
}

fn groups(blocks: &[Block]) -> Vec<&str> {
    blocks.iter().map(|b| b.group.as_str()).collect()
}

#[tokio::test]
async fn test_fixture_pages_full_mode() {
    let analysis = analyze_fixtures(ExtractMode::Full).await;

    assert_eq!(analysis.pages.len(), 5);
    assert!(analysis.errors().is_empty());

    let target = analysis.target().unwrap();
    assert_eq!(
        groups(&target.blocks),
        vec!["site navigation", "Hero", "Services / Products", "Testimonials", "Contacts", "Contacts"]
    );
    assert_eq!(target.group_count(), 5);
    assert_eq!(target.blocks[1].level, 1);
    assert_eq!(target.blocks[1].cta_count, 1);
    assert!(target.blocks[4].has_form);
}

#[tokio::test]
async fn test_fixture_pages_content_only_mode() {
    let analysis = analyze_fixtures(ExtractMode::ContentOnly).await;

    let target = analysis.target().unwrap();
    assert_eq!(groups(&target.blocks), vec!["Hero", "Services / Products", "Testimonials", "Contacts"]);
}

#[tokio::test]
async fn test_pricing_missing_on_target_is_mandatory() {
    let analysis = analyze_fixtures(ExtractMode::Full).await;
    let comparison = analysis.comparison();

    let pricing = comparison.row("Pricing").unwrap();
    assert_eq!(pricing.frequency, 3);
    assert_eq!(pricing.tier, Tier::Mandatory);
    assert!(!pricing.target_has());
    assert_eq!(pricing.competitors[1].block.as_ref().unwrap().heading, "Тарифы и цены");
    assert!(pricing.competitors[3].block.is_none());

    let order: Vec<&str> = comparison.rows.iter().map(|r| r.group.as_str()).collect();
    assert_eq!(
        order,
        vec![
            "Hero",
            "Services / Products",
            "Pricing",
            "Testimonials",
            "FAQ",
            "Team",
            "About",
            "Contacts",
            "Blog / Articles",
            "Video",
            "what offer",
            "site navigation",
        ]
    );

    let missing: Vec<(String, usize)> = comparison
        .missing_from_target()
        .into_iter()
        .map(|m| (m.group, m.frequency))
        .collect();
    assert_eq!(missing[0], ("Pricing".to_string(), 3));
    assert_eq!(missing[1], ("FAQ".to_string(), 3));
    assert_eq!(missing.len(), 7);
    assert!(missing.iter().all(|(group, _)| group != "site navigation"));
}

#[tokio::test]
async fn test_faq_structured_data_detection() {
    let analysis = analyze_fixtures(ExtractMode::Full).await;

    let alpha = analysis.blocks_for("https://alpha.example/").unwrap();
    let faq = alpha.iter().find(|b| b.group == "FAQ").unwrap();
    assert!(faq.has_faq_structured_data);

    let delta = analysis.blocks_for("https://delta.example/").unwrap();
    let faq = delta.iter().find(|b| b.group == "FAQ").unwrap();
    assert!(!faq.has_faq_structured_data);
}

#[tokio::test]
async fn test_missing_page_does_not_abort_run() {
    let config = RunConfig::builder(TARGET)
        .competitors(COMPETITORS)
        .competitor("https://epsilon.example/")
        .build()
        .unwrap();

    let analysis = Analyzer::new(FileSource::new(PAGES_DIR), config).run().await;
    assert_eq!(analysis.pages.len(), 6);

    let errors = analysis.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, "https://epsilon.example/");
    assert!(errors[0].1.contains("File not found"));

    let comparison = analysis.comparison();
    assert_eq!(comparison.competitor_urls.len(), 5);
    assert_eq!(comparison.row("Pricing").unwrap().frequency, 3);
}

struct StaticSource;

impl PageSource for StaticSource {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<String> {
        let host = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();
        match host.as_str() {
            "unauthorized.example" => Err(BlockmapError::Unauthorized),
            "blocked.example" => Err(BlockmapError::UpstreamBlocked { status: 422 }),
            _ => Ok(format!("<body><section><h2>Pricing</h2><p>{host}</p></section></body>")),
        }
    }
}

#[tokio::test]
async fn test_source_errors_become_page_notes() {
    let config = RunConfig::builder("https://me.example")
        .competitors([
            "https://a.example",
            "https://unauthorized.example",
            "https://blocked.example",
            "https://d.example",
        ])
        .build()
        .unwrap();

    let analysis = Analyzer::new(StaticSource, config).run().await;
    let notes: Vec<&str> = analysis.errors().into_iter().map(|(_, e)| e).collect();
    assert_eq!(
        notes,
        vec!["Rendering service rejected the API key", "Site blocked scraping (status 422)"]
    );

    let pricing = analysis.comparison().row("Pricing").cloned().unwrap();
    assert_eq!(pricing.frequency, 2);
    assert_eq!(pricing.tier, Tier::Recommended);
    assert!(pricing.target_has());
}

#[tokio::test]
async fn test_reports_render_in_every_format() {
    let analysis = analyze_fixtures(ExtractMode::Full).await;

    let markdown = render(&analysis, ReportFormat::Markdown).unwrap();
    assert!(markdown.contains("★ mysite.example"));
    assert!(markdown.contains("| Pricing | ✓ Pricing plans | ✓ Тарифы и цены | ✓ Our prices | — | missing ✗ | 3 | Mandatory |"));

    let json: serde_json::Value = serde_json::from_str(&render(&analysis, ReportFormat::Json).unwrap()).unwrap();
    assert_eq!(json["missing"][0]["tier"], "mandatory");

    let csv = render(&analysis, ReportFormat::Csv).unwrap();
    assert!(csv.contains("Summary\r\nSite,Role,Blocks,Groups"));
    assert!(csv.contains("mysite.example,target,6,5,"));
}

#[tokio::test]
async fn test_runs_are_deterministic() {
    let first = analyze_fixtures(ExtractMode::Full).await;
    let second = analyze_fixtures(ExtractMode::Full).await;

    assert_eq!(first, second);
    assert_eq!(
        render(&first, ReportFormat::Json).unwrap(),
        render(&second, ReportFormat::Json).unwrap()
    );
}

#[test]
fn test_extract_blocks_from_fixture() {
    let html = get_page_fixture("beta.example");
    let blocks = extract_blocks_from_html(&html, &ExtractConfig::default()).unwrap();

    assert_eq!(groups(&blocks), vec!["Hero", "Pricing", "Testimonials", "Contacts"]);
    let contacts = &blocks[3];
    assert!(contacts.has_form);
    assert!(contacts.has_embedded_frame);
    assert_eq!(contacts.cta_count, 1);
}

#[test]
fn test_custom_keyword_table() {
    static TABLE: &[SemanticGroup] = &[
        SemanticGroup { name: "Shipping", keywords: &["delivery", "shipping", "доставка"] },
        SemanticGroup { name: "Pricing", keywords: &["price"] },
    ];
    let index = KeywordIndex::from_table(TABLE);
    let classifier = GroupClassifier::new(&index);

    let doc = Document::parse("<section><h2>Free delivery</h2></section><div><h2>Доставка</h2></div>").unwrap();
    let blocks = extract_blocks(&doc, &ExtractConfig::default(), &classifier);
    assert_eq!(groups(&blocks), vec!["Shipping", "Shipping"]);

    let comparison = ComparisonMatrixBuilder::new(&index).build(
        PageBlocks::new("https://me.example", &blocks),
        &[PageBlocks::new("https://a.example", &blocks)],
    );
    assert!(comparison.rows[0].canonical);
}

#[test]
fn test_canonical_table_shape() {
    assert_eq!(CANONICAL_GROUPS.len(), 17);
    assert_eq!(CANONICAL_GROUPS[0].name, "Hero");
    assert_eq!(CANONICAL_GROUPS[16].name, "CTA / Lead form");

    let duplicates: Vec<&str> = KeywordIndex::canonical()
        .duplicate_keywords()
        .iter()
        .map(|d| d.keyword.as_str())
        .collect();
    assert_eq!(duplicates, vec!["get started", "нам доверяют", "наши клиенты"]);
}

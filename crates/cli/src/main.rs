mod echo;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use blockmap_core::{
    Analyzer, CANONICAL_GROUPS, ExtractMode, FileSource, HttpSource, PageSource, Progress, RenderConfig,
    RenderingSource, ReportFormat, RunConfig, parse_url_list, render, write_report,
};
use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compare the section structure of a page against its competitors
#[derive(Parser, Debug)]
#[command(name = "blockmap")]
#[command(author = "Blockmap Contributors")]
#[command(version)]
#[command(about = "Compare the section structure of a page against its competitors", long_about = None)]
struct Args {
    /// Page under analysis
    #[arg(short, long, value_name = "URL", required_unless_present = "list_groups")]
    target: Option<String>,

    /// Competitor page (repeat 4 to 10 times)
    #[arg(short, long = "competitor", value_name = "URL")]
    competitors: Vec<String>,

    /// File with competitor URLs, one per line
    #[arg(long, value_name = "FILE")]
    competitors_file: Option<PathBuf>,

    /// Parsing mode (full, content-only)
    #[arg(short, long, default_value = "full", value_name = "MODE")]
    mode: ExtractMode,

    /// Per-page timeout in seconds (15-60)
    #[arg(long, default_value = "30", value_name = "SECS", value_parser = clap::value_parser!(u64).range(15..=60))]
    timeout: u64,

    /// API key of the rendering service
    #[arg(long, env = "BLOCKMAP_API_KEY", hide_env_values = true, value_name = "KEY")]
    api_key: Option<String>,

    /// Endpoint of the rendering service
    #[arg(long, value_name = "URL")]
    render_endpoint: Option<String>,

    /// Fetch pages with plain HTTP instead of the rendering service
    #[arg(long, conflicts_with = "pages_dir")]
    direct: bool,

    /// Read saved pages from DIR/<host>.html instead of fetching
    #[arg(long, value_name = "DIR")]
    pages_dir: Option<PathBuf>,

    /// Report format (markdown, json, csv)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    format: ReportFormat,

    /// Output file, or directory for csv (default: stdout)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print the built-in semantic groups and exit
    #[arg(long)]
    list_groups: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Page providers selectable from the command line
enum Source {
    Rendering(RenderingSource),
    Http(HttpSource),
    Files(FileSource),
}

impl PageSource for Source {
    async fn fetch(&self, url: &str, timeout: Duration) -> blockmap_core::Result<String> {
        match self {
            Self::Rendering(source) => source.fetch(url, timeout).await,
            Self::Http(source) => source.fetch(url, timeout).await,
            Self::Files(source) => source.fetch(url, timeout).await,
        }
    }
}

impl Source {
    fn describe(&self) -> String {
        match self {
            Self::Rendering(source) => format!("rendering service ({})", source.config().endpoint),
            Self::Http(_) => "direct HTTP".to_string(),
            Self::Files(source) => format!("saved pages in {}", source.dir().display()),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn select_source(args: &Args) -> anyhow::Result<Source> {
    if let Some(dir) = &args.pages_dir {
        if !dir.is_dir() {
            bail!("Pages directory not found: {}", dir.display());
        }
        return Ok(Source::Files(FileSource::new(dir)));
    }
    if args.direct {
        return Ok(Source::Http(HttpSource::default()));
    }

    let Some(key) = args.api_key.as_deref().filter(|key| !key.trim().is_empty()) else {
        bail!("No rendering service API key: pass --api-key, set BLOCKMAP_API_KEY, or use --direct");
    };
    let mut config = RenderConfig::new(key.trim());
    if let Some(endpoint) = &args.render_endpoint {
        config.endpoint = endpoint.clone();
    }
    let source = RenderingSource::new(config).context("Failed to set up the rendering service")?;
    Ok(Source::Rendering(source))
}

fn build_config(args: &Args) -> anyhow::Result<RunConfig> {
    let mut competitors = args.competitors.clone();
    if let Some(path) = &args.competitors_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read competitors file: {}", path.display()))?;
        competitors.extend(parse_url_list(&text));
    }

    let target = args.target.clone().unwrap_or_default();
    RunConfig::builder(target)
        .competitors(competitors)
        .mode(args.mode)
        .timeout(args.timeout)
        .build()
        .context("Invalid run configuration")
}

fn print_groups() {
    for group in CANONICAL_GROUPS {
        println!("{}: {}", group.name, group.keywords.join(", "));
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.list_groups {
        print_groups();
        return Ok(());
    }

    let config = build_config(&args)?;
    let source = select_source(&args)?;

    echo::print_banner();
    echo::print_info(&format!("Target: {}", config.target_url));
    echo::print_info(&format!(
        "{} competitors, {} mode, {}s per page, {}",
        config.competitor_urls.len(),
        config.mode,
        config.timeout,
        source.describe()
    ));
    eprintln!();

    let analyzer = Analyzer::new(source, config);
    let analysis = analyzer
        .run_with_progress(|event| match event {
            Progress::Started { index, total, url, role } => {
                echo::print_step(index, total, &format!("{} {}", role.label(), url.bright_white().underline()));
            }
            Progress::Finished { report, .. } => echo::print_page_preview(report),
        })
        .await;

    let comparison = analysis.comparison();
    eprintln!();
    echo::print_missing(&comparison.missing_from_target(), comparison.competitor_urls.len());

    let failed = analysis.errors().len();
    if failed > 0 {
        tracing::warn!(failed, total = analysis.pages.len(), "pages failed to load");
        echo::print_warning(&format!("{failed} of {} pages failed to load", analysis.pages.len()));
    }

    match &args.output {
        Some(path) => {
            let written = write_report(&analysis, args.format, path)
                .inspect_err(|e| tracing::error!(path = %path.display(), error = %e, "report write failed"))
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            for file in written {
                tracing::info!(path = %file.display(), format = %args.format, "report written");
                echo::print_success(&format!("Report written to {}", file.display().bright_white()));
            }
        }
        None => {
            let output = render(&analysis, args.format).context("Failed to render report")?;
            print!("{output}");
        }
    }

    Ok(())
}

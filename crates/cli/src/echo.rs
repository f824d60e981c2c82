use blockmap_core::{MissingGroup, PageReport, Tier, short_name};
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Blockmap".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Compare page structure against competitors\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print the outcome of one page: block and group counts, or its error
pub fn print_page_preview(report: &PageReport) {
    match &report.error {
        Some(error) => print_error(&format!("{}: {}", short_name(&report.url), error)),
        None if report.blocks.is_empty() => {
            print_warning(&format!("{}: no headings found", short_name(&report.url)));
        }
        None => eprintln!(
            "  {} {}  {} {}",
            "Blocks:".dimmed(),
            report.blocks.len().to_string().bright_white(),
            "Groups:".dimmed(),
            report.group_count().to_string().bright_white()
        ),
    }
}

/// Print the groups competitors have and the target lacks
pub fn print_missing(missing: &[MissingGroup], competitors: usize) {
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Missing on target".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    if missing.is_empty() {
        print_success("The target covers every group its competitors have");
        eprintln!();
        return;
    }

    for group in missing {
        let share = format!("{}/{}", group.frequency, competitors);
        match group.tier {
            Tier::Mandatory => eprintln!("  {:<28} {:>6}  {}", group.group, share, group.tier.bright_red()),
            Tier::Recommended => eprintln!("  {:<28} {:>6}  {}", group.group, share, group.tier.bright_yellow()),
            Tier::Optional => eprintln!("  {:<28} {:>6}  {}", group.group, share, group.tier.dimmed()),
        }
    }
    eprintln!();
}

//! Command implementations.
//!
//! Every command starts with the same crawl ([`collect`]) and differs only in
//! what it does with the merged entries.

mod prerender;
mod sitemap;
mod urls;

pub use prerender::run_prerender;
pub use sitemap::write_sitemap;
pub use urls::print_urls;

use crate::error::CliError;
use chrono::NaiveDate;
use colored::Colorize;
use sitegen_core::{Collected, SiteConfig, StopReason, collect_from_api};

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Loaded and validated configuration.
    pub config: SiteConfig,
    /// Fallback date for undated entries.
    pub today: NaiveDate,
    /// Suppress summary output.
    pub quiet: bool,
}

/// Crawl every collection and print one status line per collection.
pub async fn collect(ctx: &RunContext) -> Result<Collected, CliError> {
    let collected = collect_from_api(&ctx.config, ctx.today).await?;
    if !ctx.quiet {
        for report in &collected.collections {
            let status = match &report.stop {
                StopReason::ShortPage { .. } | StopReason::EmptyPage { .. } => "✓".green(),
                StopReason::FetchFailed { .. } | StopReason::PageLimit { .. } => "!".yellow(),
            };
            eprintln!(
                "{status} {}: {} entries from {} page(s){}",
                report.name.bold(),
                report.entries,
                report.pages,
                describe_stop(&report.stop)
            );
        }
    }
    Ok(collected)
}

fn describe_stop(stop: &StopReason) -> String {
    match stop {
        StopReason::ShortPage { .. } | StopReason::EmptyPage { .. } => String::new(),
        StopReason::FetchFailed { page, error } => {
            format!(" (stopped at page {page}: {error})")
        },
        StopReason::PageLimit { max_pages } => format!(" (page limit {max_pages} reached)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_stop() {
        assert_eq!(describe_stop(&StopReason::ShortPage { page: 2 }), "");
        assert_eq!(
            describe_stop(&StopReason::FetchFailed {
                page: 3,
                error: "timeout".to_string()
            }),
            " (stopped at page 3: timeout)"
        );
        assert_eq!(
            describe_stop(&StopReason::PageLimit { max_pages: 5 }),
            " (page limit 5 reached)"
        );
    }
}

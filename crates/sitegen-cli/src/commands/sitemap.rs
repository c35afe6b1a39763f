//! `sitegen sitemap`: render and write the XML sitemap.

use super::{RunContext, collect};
use crate::cli::SitemapArgs;
use crate::error::CliError;
use anyhow::Result;
use colored::Colorize;
use sitegen_core::emit::{SiteUrl, render_sitemap, write_output};
use std::io::Write;
use tracing::warn;

/// Crawl, merge, render, then write the sitemap to its file or stdout.
pub async fn write_sitemap(ctx: &RunContext, args: &SitemapArgs) -> Result<()> {
    let site_url = match args.base_url.as_deref() {
        Some(raw) => SiteUrl::parse(raw),
        None => {
            if ctx.config.uses_placeholder_site_url() {
                warn!(
                    base_url = %ctx.config.site.base_url,
                    "site.base_url is not set, sitemap URLs use the placeholder origin"
                );
            }
            ctx.config.site_url()
        },
    }
    .map_err(CliError::usage)?;

    let collected = collect(ctx).await?;
    let xml = render_sitemap(&collected.entries, &site_url).map_err(CliError::internal)?;

    if args.stdout {
        std::io::stdout()
            .lock()
            .write_all(xml.as_bytes())
            .map_err(CliError::output)?;
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| ctx.config.sitemap.output.clone());
    write_output(&output, &xml).map_err(CliError::from)?;

    if !ctx.quiet {
        eprintln!(
            "{} Wrote {} URLs ({} static, {} dynamic) to {}",
            "✓".green(),
            collected.entries.len().to_string().bold(),
            collected.static_count,
            collected.entries.len() - collected.static_count,
            output.display().to_string().cyan()
        );
    }
    Ok(())
}

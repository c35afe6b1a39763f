//! `sitegen urls`: the pre-render route list, without running anything.

use super::{RunContext, collect};
use crate::cli::UrlsArgs;
use crate::error::CliError;
use anyhow::Result;
use colored::Colorize;
use sitegen_core::emit::{merge_url_list, render_url_list, write_output};
use std::io::Write;

/// Crawl and print (or write) the route list: always-included paths first,
/// then crawled paths in fetch order.
pub async fn print_urls(ctx: &RunContext, args: &UrlsArgs) -> Result<()> {
    let collected = collect(ctx).await?;
    let routes = merge_url_list(&ctx.config.prerender.always_include, &collected.dynamic);
    let rendered = render_url_list(&routes);

    match &args.output {
        Some(path) => {
            write_output(path, &rendered).map_err(CliError::from)?;
            if !ctx.quiet {
                eprintln!(
                    "{} Wrote {} routes to {}",
                    "✓".green(),
                    routes.len().to_string().bold(),
                    path.display().to_string().cyan()
                );
            }
        },
        None => std::io::stdout()
            .lock()
            .write_all(rendered.as_bytes())
            .map_err(CliError::output)?,
    }
    Ok(())
}

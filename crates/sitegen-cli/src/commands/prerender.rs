//! `sitegen prerender`: run the pre-render tool against the crawled routes.

use super::{RunContext, collect};
use crate::cli::PrerenderArgs;
use crate::error::CliError;
use anyhow::Result;
use colored::Colorize;
use sitegen_core::emit::merge_url_list;
use sitegen_core::prerender::run_with_include_list;
use tracing::info;

/// Inject the route list into the pre-render config, run the tool, restore.
///
/// The config file is back to its original bytes afterwards whether the tool
/// succeeds or not. A failing tool's exit code becomes sitegen's exit code.
pub async fn run_prerender(ctx: &RunContext, args: &PrerenderArgs) -> Result<()> {
    let settings = &ctx.config.prerender;
    let config_file = args
        .config_file
        .clone()
        .unwrap_or_else(|| settings.config_file.clone());
    let field = args.field.as_deref().unwrap_or(&settings.include_field);
    let command = if args.command.is_empty() {
        &settings.command
    } else {
        &args.command
    };

    let collected = collect(ctx).await?;
    let routes = merge_url_list(&settings.always_include, &collected.dynamic);

    if args.dry_run {
        for route in &routes {
            println!("{route}");
        }
        return Ok(());
    }

    info!(
        config = %config_file.display(),
        field,
        command = %command.join(" "),
        routes = routes.len(),
        "running pre-render"
    );
    run_with_include_list(&config_file, field, &routes, command)
        .await
        .map_err(CliError::from)?;

    if !ctx.quiet {
        eprintln!(
            "{} Pre-rendered {} routes; {} restored",
            "✓".green(),
            routes.len().to_string().bold(),
            config_file.display().to_string().cyan()
        );
    }
    Ok(())
}

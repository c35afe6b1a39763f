//! sitegen CLI - sitemap and pre-render routes from the agency API
//!
//! This is the library side of the `sitegen` binary: argument parsing,
//! configuration loading, logging setup and command dispatch.
use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use sitegen_core::SiteConfig;

mod cli;
mod commands;
pub mod error;
mod utils;

use crate::commands::RunContext;
use crate::error::CliError;
use crate::utils::initialize_logging;
use cli::{Cli, Commands, SitemapArgs};

/// Execute the sitegen CLI with the current arguments and environment.
///
/// # Errors
///
/// Returns an error if configuration is invalid, output cannot be written, or
/// the pre-render command fails. Use [`error::exit_code_from_error`] to turn
/// it into a process exit code.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let config = SiteConfig::load(cli.config.as_deref())
        .map_err(CliError::from)?
        .with_api_url(cli.api_url.as_deref());
    config.validate().map_err(CliError::from)?;

    let ctx = RunContext {
        config,
        today: cli.today.unwrap_or_else(|| Utc::now().date_naive()),
        quiet: cli.quiet,
    };

    execute_command(cli.command, &ctx).await
}

async fn execute_command(command: Option<Commands>, ctx: &RunContext) -> Result<()> {
    match command {
        Some(Commands::Sitemap(args)) => commands::write_sitemap(ctx, &args).await,
        Some(Commands::Urls(args)) => commands::print_urls(ctx, &args).await,
        Some(Commands::Prerender(args)) => commands::run_prerender(ctx, &args).await,
        None => commands::write_sitemap(ctx, &SitemapArgs::default()).await,
    }
}

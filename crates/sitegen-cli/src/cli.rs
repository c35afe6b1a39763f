//! Command-line interface definitions for sitegen.
//!
//! # Examples
//!
//! ```bash
//! # Write public/sitemap.xml (the default command)
//! SITEGEN_API_URL=https://api.agency.example/api sitegen
//!
//! # Print the sitemap instead of writing it
//! sitegen sitemap --stdout
//!
//! # Print the pre-render route list
//! sitegen urls
//!
//! # Inject routes into package.json, run react-snap, restore package.json
//! sitegen prerender
//!
//! # Same, with a different pre-render command
//! sitegen prerender -- npx react-snap --no-sandbox
//! ```

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for the `sitegen` command
#[derive(Parser, Clone, Debug)]
#[command(name = "sitegen")]
#[command(version)]
#[command(about = "sitegen - Sitemap and pre-render routes from the agency API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Path to configuration file (default: ./sitegen.toml when present). Also via `SITEGEN_CONFIG`.
    #[arg(long, global = true, value_name = "FILE", env = "SITEGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the content API (overrides `api.base_url`)
    #[arg(long, global = true, value_name = "URL", env = "SITEGEN_API_URL")]
    pub api_url: Option<String>,

    /// Date used for entries without timestamps (default: today, UTC)
    #[arg(long, global = true, value_name = "YYYY-MM-DD", hide = true)]
    pub today: Option<NaiveDate>,
}

/// Available subcommands
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Crawl the API and write the XML sitemap (default)
    Sitemap(SitemapArgs),

    /// Crawl the API and print the pre-render route list
    Urls(UrlsArgs),

    /// Crawl the API, inject the route list into the pre-render config and run the pre-render tool
    Prerender(PrerenderArgs),
}

/// Arguments for `sitegen sitemap`
#[derive(Args, Clone, Debug, Default)]
pub struct SitemapArgs {
    /// Output file (default: `sitemap.output` from config)
    #[arg(short = 'o', long, value_name = "FILE", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print the sitemap to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Public site origin used in `<loc>` (overrides `site.base_url`)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

/// Arguments for `sitegen urls`
#[derive(Args, Clone, Debug, Default)]
pub struct UrlsArgs {
    /// Write the list to a file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for `sitegen prerender`
#[derive(Args, Clone, Debug, Default)]
pub struct PrerenderArgs {
    /// JSON config read by the pre-render tool (overrides `prerender.config_file`)
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Dotted field holding the include list (overrides `prerender.include_field`)
    #[arg(long, value_name = "FIELD")]
    pub field: Option<String>,

    /// Print the route list without touching the config or running anything
    #[arg(long)]
    pub dry_run: bool,

    /// Pre-render command and arguments (overrides `prerender.command`)
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

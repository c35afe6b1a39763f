//! sitegen CLI entry point.

use colored::Colorize;
use sitegen_cli::error::exit_code_from_error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match sitegen_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(exit_code_from_error(&err))
        },
    }
}

//! sam-detect CLI entry point
//!
//! Parses the command line, runs the command, and renders failures as
//! user-friendly errors with a non-zero exit code.

use anyhow::Result;
use clap::Parser;
use sam_detect::cli;
use sam_detect::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}

//! # Monoweave CLI
//!
//! Binary entry point for the `monoweave` command-line tool. Parses
//! arguments with `clap` and dispatches to a subcommand; all real work
//! lives in the library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}

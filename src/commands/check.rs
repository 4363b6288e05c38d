//! Check command implementation
//!
//! Validates a repository list without registering a single remote or
//! creating any file: the same parser `create` uses, run to completion.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use monoweave::output::{emoji, OutputConfig};
use monoweave::repolist::RepoList;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Repository list file, or '-' for standard input
    #[arg(short, long, value_name = "PATH", default_value = "-")]
    pub input: PathBuf,

    /// Suppress the per-repository listing
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the check command
pub fn execute(args: CheckArgs, output: &OutputConfig) -> Result<()> {
    let reader: Box<dyn BufRead> = if args.input.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(&args.input)?))
    };

    let mut count = 0;
    for spec in RepoList::new(reader) {
        let spec = spec?;
        count += 1;
        if !args.quiet {
            println!(
                "{} {} -> {}/ ({})",
                emoji(output, "📦", "[REPO]"),
                spec.name,
                spec.folder,
                spec.location
            );
        }
    }

    if !args.quiet {
        println!();
        println!(
            "{} {} repositories OK",
            emoji(output, "✅", "[OK]"),
            count
        );
    }
    Ok(())
}

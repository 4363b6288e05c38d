//! Create command implementation
//!
//! Runs the full pipeline: bootstrap (or re-enter) the working copy,
//! integrate every repository named on the input list, flatten the
//! staged tags, and leave the primary branch checked out.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;

use monoweave::output::{emoji, OutputConfig};
use monoweave::phases::{init, integrate, orchestrator};
use monoweave::repolist::RepoList;

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Resume an interrupted run instead of starting fresh
    #[arg(long = "continue")]
    pub resume: bool,

    /// Destination directory for the monorepo
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = "MONOWEAVE_NAME",
        default_value = "core"
    )]
    pub name: PathBuf,

    /// Branch that keeps its name instead of being namespaced
    #[arg(
        long,
        value_name = "BRANCH",
        env = "MONOWEAVE_PRIMARY",
        default_value = integrate::DEFAULT_PRIMARY_BRANCH
    )]
    pub primary: String,

    /// Repository list file, or '-' for standard input
    #[arg(short, long, value_name = "PATH", default_value = "-")]
    pub input: PathBuf,

    /// Temporary-files location handed to git subprocesses
    #[arg(long, value_name = "PATH", env = "MONOWEAVE_TMPDIR")]
    pub tmpdir: Option<PathBuf>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Show detailed progress information
    #[arg(short, long)]
    pub verbose: bool,
}

/// Execute the create command
pub fn execute(args: CreateArgs, output: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();

    if !args.quiet {
        let verb = if args.resume { "Resuming" } else { "Weaving" };
        println!(
            "{} {} monorepo at {}",
            emoji(output, "🧶", "[WEAVE]"),
            verb,
            args.name.display()
        );
        if args.verbose {
            println!("   Primary branch: {}", args.primary);
            println!("   Repository list: {}", args.input.display());
        }
        println!();
    }

    let reader: Box<dyn BufRead> = if args.input.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(&args.input)?))
    };
    let specs = RepoList::new(reader);

    let mut vcs = init::prepare(&args.name, &args.primary, args.resume, args.tmpdir.as_deref())?;

    match orchestrator::run(&mut vcs, specs, &args.primary) {
        Ok(stats) => {
            if !args.quiet {
                let duration = start_time.elapsed();
                println!(
                    "{} Merged {} repositories ({} branches, {} tags) in {:.2}s",
                    emoji(output, "✅", "[DONE]"),
                    stats.repositories,
                    stats.branches,
                    stats.tags,
                    duration.as_secs_f64()
                );
            }
            Ok(())
        }
        Err(e) => {
            if !args.quiet {
                println!("{} Create failed", emoji(output, "❌", "[FAIL]"));
                println!();
            }
            Err(e.into())
        }
    }
}

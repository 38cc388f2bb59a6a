//! Command-line entry point: parse flags, set up tracing, walk one thread.

mod cli;
mod logging;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use threadgrab::auth::TerminalPrompt;
use threadgrab::context::CrawlContext;
use threadgrab::http::UreqTransport;
use threadgrab::walker::{walk_thread, WalkOutcome, WalkSummary};
use tracing::error;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init_tracing(cli.verbose) {
        eprintln!("{e}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.crawl_config()?;
    let transport = UreqTransport::new(&config);
    let mut ctx = CrawlContext::new(config, Box::new(transport), Box::new(TerminalPrompt))?;

    let summary = walk_thread(&mut ctx, &cli.url, &cli.output)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &WalkSummary) {
    println!(
        "Thread: {}",
        summary.thread_dir.as_deref().unwrap_or("(not created)")
    );
    println!(
        "Pages: {}  Downloaded: {}  Failed: {}",
        summary.pages_visited, summary.assets_downloaded, summary.assets_failed
    );
    match &summary.outcome {
        WalkOutcome::Completed => println!("Done."),
        WalkOutcome::Aborted { url, reason } => println!("Stopped early at {url}: {reason}"),
    }
}

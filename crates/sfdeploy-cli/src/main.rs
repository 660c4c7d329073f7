//! sfdeploy - build, deploy and restart a SmartFoxServer 2X extension
//!
//! Usage:
//!   sfdeploy                    # Interactive run using ./sfdeploy_config.json
//!   sfdeploy --reuse            # Reuse the saved configuration without asking
//!   sfdeploy --config <path>    # Use another configuration file

mod interactive;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sfdeploy_core::prelude::*;

use crate::interactive::TerminalOperator;

#[derive(Parser)]
#[command(name = "sfdeploy")]
#[command(about = "Build, deploy and restart a SmartFoxServer 2X extension", long_about = None)]
struct Cli {
    /// Configuration file (default: ./sfdeploy_config.json)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Reuse the saved configuration without asking
    #[arg(long, short)]
    reuse: bool,

    /// Exit immediately instead of waiting for Enter
    #[arg(long)]
    no_pause: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sfdeploy=info,sfdeploy_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let store = match &cli.config {
        Some(path) => ConfigStore::from_path(path),
        None => ConfigStore::from_current_dir()?,
    };
    let reuse = if cli.reuse {
        ReusePolicy::Always
    } else {
        ReusePolicy::Ask
    };

    let mut operator = TerminalOperator::new();
    operator.print_header()?;

    let outcome = DeploymentPipeline::new(&mut operator, store, Platform::current())
        .with_reuse(reuse)
        .run();

    match outcome {
        Ok(summary) => {
            print_summary(&summary);
            if !cli.no_pause {
                pause()?;
            }
            Ok(())
        }
        Err(failure) => {
            eprintln!();
            eprintln!(
                "{} {} phase failed",
                style("✗").red(),
                style(failure.state).bold()
            );
            eprintln!("  {}", failure.error);
            std::process::exit(1);
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", style("  Summary").bold());
    println!("  ───────────────────────────");
    println!("  Extension: {}", style(&summary.config.extension_name).green());
    println!("  Archive:   {}", style(summary.transfer.deployed.display()).green());
    if !summary.termination.terminated.is_empty() {
        println!("  Stopped:   {:?}", summary.termination.terminated);
    }
    println!(
        "  Cleaned:   {} class file(s), {} archive(s)",
        summary.cleanup.classes_removed,
        summary.cleanup.archives_removed.len()
    );
    println!();
}

fn pause() -> Result<()> {
    print!("Press Enter to exit...");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

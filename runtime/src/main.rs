// Copyright 2026 Skimmer Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use skimmer_runtime::cli;
use skimmer_runtime::config::ConfigOverrides;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "skimmer",
    about = "Skimmer: collect the newest submissions and rank them by age",
    version,
    after_help = "Run 'skimmer <command> --help' for details on each command.\nRun 'skimmer' with no command to collect the default listing."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging and show ages in the listing
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect the live listing with headless Chromium and print it newest first
    Newest(NewestArgs),
    /// Rank a saved listing page (HTML file) without launching a browser
    Rank {
        /// Path to the saved HTML page
        file: PathBuf,
        /// Number of ranked entries to print
        #[arg(long, default_value = "100")]
        limit: usize,
    },
    /// Check environment and diagnose issues
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[derive(Args)]
struct NewestArgs {
    /// Listing page to collect
    #[arg(long)]
    url: Option<String>,
    /// Keep collecting until at least this many entries are held
    #[arg(long)]
    target: Option<usize>,
    /// Number of ranked entries to print
    #[arg(long)]
    limit: Option<usize>,
    /// Maximum number of extraction rounds
    #[arg(long)]
    max_rounds: Option<u32>,
    /// Settle delay after each scroll, in milliseconds
    #[arg(long)]
    settle_ms: Option<u64>,
    /// Navigation timeout in milliseconds
    #[arg(long)]
    nav_timeout_ms: Option<u64>,
    /// Timeout waiting for the listing to appear, in milliseconds
    #[arg(long)]
    selector_timeout_ms: Option<u64>,
    /// Path to a Chromium/Chrome binary
    #[arg(long)]
    chromium: Option<PathBuf>,
    /// Save the collected page's HTML here (rank it later with `skimmer rank`)
    #[arg(long, value_name = "FILE")]
    save_html: Option<PathBuf>,
}

impl From<NewestArgs> for ConfigOverrides {
    fn from(args: NewestArgs) -> Self {
        Self {
            url: args.url,
            target: args.target,
            limit: args.limit,
            max_rounds: args.max_rounds,
            settle_delay_ms: args.settle_ms,
            navigation_timeout_ms: args.nav_timeout_ms,
            selector_timeout_ms: args.selector_timeout_ms,
            chromium_path: args.chromium,
            snapshot_path: args.save_html,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var("SKIMMER_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("SKIMMER_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("SKIMMER_VERBOSE", "1");
    }
    if cli.no_color {
        std::env::set_var("SKIMMER_NO_COLOR", "1");
    }

    // Diagnostics go to stderr; stdout carries the listing
    let default_directive = if cli.verbose {
        "skimmer_runtime=debug"
    } else {
        "skimmer_runtime=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        // No subcommand → collect the default listing
        None => cli::newest_cmd::run(ConfigOverrides::default()).await,

        Some(Commands::Newest(args)) => cli::newest_cmd::run(args.into()).await,
        Some(Commands::Rank { file, limit }) => cli::rank_cmd::run(&file, limit).await,
        Some(Commands::Doctor) => cli::doctor::run().await,
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "skimmer", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error. Errors print even with --quiet
    if let Err(e) = &result {
        cli::output::report_error(e);
        std::process::exit(1);
    }

    result
}

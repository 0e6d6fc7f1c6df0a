// Copyright 2026 DadosJusBr Contributors
// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use mpac_collector::cli;
use mpac_collector::cli::collect_cmd::CollectRequest;
use mpac_collector::cli::output::{render_error, OutputMode};
use mpac_collector::config::{BrowserOptions, DEFAULT_USER_AGENT};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "mpac-collector",
    about = "Collect MPAC pay statement and indemnity spreadsheets",
    version,
    after_help = "Run 'mpac-collector <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download both spreadsheets for a month
    Collect {
        /// Month to collect, e.g. "07"
        #[arg(long, env = "MONTH")]
        month: String,
        /// Four-digit year to collect
        #[arg(long, env = "YEAR")]
        year: String,
        /// Directory that receives the spreadsheets
        #[arg(long, env = "OUTPUT_FOLDER", default_value = "output")]
        output_dir: PathBuf,
        /// Overall collection deadline in seconds
        #[arg(long, env = "COLLECTION_TIMEOUT_SECS", default_value = "120")]
        timeout_secs: u64,
        /// Wait after every page interaction, in seconds
        #[arg(long, env = "STEP_DELAY_SECS", default_value = "5")]
        step_delay_secs: u64,
        /// Chromium executable (discovered when omitted)
        #[arg(long, env = "MPAC_CHROMIUM_PATH")]
        chromium: Option<PathBuf>,
        /// Show the browser window
        #[arg(long)]
        headed: bool,
        /// User agent sent by the browser
        #[arg(long, default_value = DEFAULT_USER_AGENT)]
        user_agent: String,
        /// Stream progress events to stderr as JSON lines
        #[arg(long)]
        events: bool,
    },
    /// Check environment and diagnose issues
    Doctor {
        /// Directory that would receive the spreadsheets
        #[arg(long, env = "OUTPUT_FOLDER", default_value = "output")]
        output_dir: PathBuf,
        /// Chromium executable to check instead of discovering one
        #[arg(long, env = "MPAC_CHROMIUM_PATH")]
        chromium: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // stdout is reserved for results.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);
    let mode = OutputMode::from_flag(cli.json);

    let result = match cli.command {
        Commands::Collect {
            month,
            year,
            output_dir,
            timeout_secs,
            step_delay_secs,
            chromium,
            headed,
            user_agent,
            events,
        } => {
            let request = CollectRequest {
                month,
                year,
                output_dir,
                timeout: Duration::from_secs(timeout_secs),
                step_delay: Duration::from_secs(step_delay_secs),
                browser: BrowserOptions {
                    executable: chromium,
                    headless: !headed,
                    user_agent,
                    ..BrowserOptions::default()
                },
                stream_events: events,
            };
            cli::collect_cmd::run(request, mode).await
        }
        Commands::Doctor {
            output_dir,
            chromium,
        } => cli::doctor::run(&output_dir, chromium).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "mpac-collector", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if mode.is_json() {
            println!("{}", render_error(mode, e));
        } else {
            eprintln!("{}", render_error(mode, e));
        }
        std::process::exit(1);
    }

    result
}

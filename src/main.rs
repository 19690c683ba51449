// Copyright 2026 Reelstat Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use reelstat::cli;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "reelstat",
    about = "Reelstat — box-office analytics over the highest-grossing films table",
    version,
    after_help = "Run 'reelstat <command> --help' for details on each command."
)]
struct Cli {
    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP analysis server
    Serve {
        /// Port to listen on (falls back to $PORT, then 5000)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the fetch → clean → analyze pipeline once
    Analyze {
        /// Write the JSON answer array to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Serve { port } => cli::serve_cmd::run(port).await,
        Commands::Analyze { output } => cli::analyze_cmd::run(output.as_deref()).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "reelstat", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }

    result
}

fn init_tracing(verbose: bool, quiet: bool) {
    let directive = if verbose {
        "reelstat=debug"
    } else if quiet {
        "reelstat=warn"
    } else {
        "reelstat=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().unwrap()),
        )
        .init();
}

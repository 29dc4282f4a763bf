//! kline CLI - daily minute-kline builder for aggregated-trade archives.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod settings;

use display::Format;
use settings::RunArgs;

#[derive(Parser)]
#[command(name = "kline")]
#[command(about = "Build per-minute klines from daily aggregated-trade archives", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only, no progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and write the klines of a trading day
    Build {
        #[command(flatten)]
        run: RunArgs,

        /// Category to build (spot, um, all). Defaults to the configured categories.
        #[arg(short, long)]
        category: Option<String>,

        /// Root directory for the kline tables
        #[arg(short, long)]
        output_root: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<Format>,
    },

    /// List the archives of a trading day
    List {
        #[command(flatten)]
        run: RunArgs,

        /// Category to list (spot, um, all). Defaults to the configured categories.
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Aggregate one instrument and print its day summary
    Show {
        /// Instrument symbol (e.g., BTCUSDT)
        symbol: String,

        #[command(flatten)]
        run: RunArgs,

        /// Category of the instrument (spot, um)
        #[arg(short, long, default_value = "um")]
        category: String,
    },
}

/// Installs the log subscriber. `RUST_LOG` wins over the verbosity flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Build {
            run,
            category,
            output_root,
            format,
        } => {
            commands::build::build(&run, category.as_deref(), output_root, format, cli.quiet).await
        }
        Commands::List { run, category } => commands::list::list_archives(&run, category.as_deref()),
        Commands::Show {
            symbol,
            run,
            category,
        } => commands::show::show_instrument(&symbol, &run, &category),
    }
}

//! Alsvid Command-Line Interface
//!
//! The main entry point for the Alsvid synthesis tool: describe a qudit
//! state-preparation problem in a JSON or YAML file, get back a
//! minimal-cost circuit.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod problem;

use commands::{gates, solve, version};

/// Alsvid - minimal-cost qudit state-preparation circuit synthesis
#[derive(Parser)]
#[command(name = "alsvid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a minimal-cost circuit for a problem description
    Solve {
        /// Problem file (JSON or YAML)
        input: String,

        /// Write a JSON report of the result
        #[arg(short, long)]
        output: Option<String>,

        /// Cap on settled nodes (overrides the problem file)
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Cap on tentative path cost (overrides the problem file)
        #[arg(long)]
        max_cost: Option<f64>,

        /// Wall-clock limit in seconds (overrides the problem file)
        #[arg(long)]
        deadline_secs: Option<f64>,

        /// Quantization granularity in decimal places (overrides the problem file)
        #[arg(long)]
        decimals: Option<u32>,

        /// Amplitude magnitude floor (overrides the problem file)
        #[arg(long)]
        epsilon: Option<f64>,
    },

    /// List the built-in gate catalog for a qudit dimension
    Gates {
        /// Qudit dimension
        #[arg(short, long, default_value = "2")]
        dimension: u32,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging: RUST_LOG wins, -v/-vv/-vvv otherwise.
    let fallback = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_target(false)
        .init();

    let exit_code = match cli.command {
        Commands::Solve {
            input,
            output,
            max_expansions,
            max_cost,
            deadline_secs,
            decimals,
            epsilon,
        } => solve::execute(
            &input,
            output.as_deref(),
            &solve::Overrides {
                max_expansions,
                max_cost,
                deadline_secs,
                decimals,
                epsilon,
            },
        )?,

        Commands::Gates { dimension } => {
            gates::execute(dimension)?;
            0
        }

        Commands::Version => {
            version::execute();
            0
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

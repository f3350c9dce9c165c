//! `mqtt-seedgen`: writes a fuzzing seed corpus of broker-to-client MQTT
//! frames.
//!
//! ```text
//! mqtt-seedgen generate --out tools/fuzz/mqtt_client/seeds
//! mqtt-seedgen generate --no-dynamic --manifest seeds.toml
//! mqtt-seedgen list --json
//! ```
//!
//! Logging goes to stderr and honours `RUST_LOG`; without it the default is
//! `mqtt_seedgen=info`, raised to `debug` by `--verbose` and `trace` by
//! `--debug`.

#![warn(clippy::pedantic)]

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::generate_cmd::GenerateCommand;
use commands::list_cmd::ListCommand;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mqtt-seedgen")]
#[command(about = "Generate MQTT broker-to-client seed corpora for fuzzing")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, help = "Enable verbose logging")]
    verbose: bool,

    #[arg(long, global = true, help = "Enable debug logging")]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write every seed (and its dyn_ twin) to a directory
    Generate(GenerateCommand),
    /// Print the corpus without writing files
    List(ListCommand),
}

pub(crate) fn init_basic_tracing(verbose: bool, debug: bool) {
    let default_level = if debug {
        "mqtt_seedgen=trace"
    } else if verbose {
        "mqtt_seedgen=debug"
    } else {
        "mqtt_seedgen=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(cmd) => commands::generate_cmd::execute(cmd, cli.verbose, cli.debug),
        Commands::List(cmd) => commands::list_cmd::execute(cmd, cli.verbose, cli.debug),
    }
}

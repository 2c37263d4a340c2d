use std::path::PathBuf;

use clap::{Parser, Subcommand};
use oiw_core::config::CONFIG_ENV;
use oiw_core::OiwConfig;
use tracing::debug;

mod verify;

#[derive(Parser)]
#[command(name = "oiw")]
#[command(about = "oiw - OpenCL installable driver that wraps a real OpenCL implementation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the wrapper driver and the real OpenCL library work together
    Verify {
        /// Wrapper driver library to check (defaults to the one next to this binary)
        #[arg(long)]
        icd: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Points this process, and the driver library it loads, at `config`.
fn use_config(config: Option<PathBuf>) {
    if let Some(path) = config {
        debug!(path = %path.display(), "using configuration file");
        std::env::set_var(CONFIG_ENV, path);
    }
}

fn main() -> anyhow::Result<()> {
    oiw_common::logging::init_logging("info");

    let cli = Cli::parse();

    match cli.command {
        Commands::Verify { icd, config, json } => {
            use_config(config);
            verify::run_verify(icd, json)
        }
        Commands::Config { config } => {
            use_config(config);
            let config = OiwConfig::from_env();
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

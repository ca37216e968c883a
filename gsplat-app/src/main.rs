//! Gsplat command-line tool
//!
//! Decodes Gaussian splat PLY files and reports what they contain:
//! - `inspect`: full decode with a summary (optionally as JSON)
//! - `header`: header layout only, without reading any records

mod config;
mod inspect;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gsplat - Gaussian splat PLY inspection
#[derive(Parser, Debug)]
#[command(name = "gsplat")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file with logging and import settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level filter, used when RUST_LOG is not set
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Do not log import failures (they still fail the command)
    #[arg(long, global = true)]
    quiet_errors: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a splat PLY file and print a summary
    Inspect {
        /// Path to the PLY file
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the PLY header layout without decoding records
    Header {
        /// Path to the PLY file
        file: PathBuf,
    },
}

fn run(args: Args) -> Result<(), config::AppError> {
    let mut config = match &args.config {
        Some(path) => config::AppConfig::load(path)?,
        None => config::AppConfig::default(),
    };
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if args.quiet_errors {
        config.import.report_import_errors = false;
    }

    config::init_logging(&config.logging);

    match args.command {
        Command::Inspect { file, json } => inspect::inspect(&file, &config.import, json),
        Command::Header { file } => inspect::header(&file),
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

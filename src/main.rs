// Copyright 2026 aceqd Contributors
// SPDX-License-Identifier: Apache-2.0

//! aceqd command-line driver
//!
//! Runs simulation requests described in YAML files through the ACE solver.
//!
//! # Usage
//!
//! ```bash
//! # Run a request and print the result table
//! aceqd run request.yaml
//!
//! # Only write the parameter and pulse files
//! aceqd prepare request.yaml
//!
//! # Show which process-tensor file a request uses
//! aceqd pt-name request.yaml
//!
//! # Check that the solver binary can be found
//! aceqd check
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use aceqd::{
    config::{Config, LoggingConfig},
    process_tensor,
    pulse::ChirpedPulse,
    solver::AceRunner,
    AceSystem, Result, RunOutcome, SimulationRequest, VERSION,
};

/// Driver for the ACE quantum-dot dynamics solver
#[derive(Parser)]
#[command(name = "aceqd")]
#[command(author = "aceqd Contributors")]
#[command(version = VERSION)]
#[command(about = "Configure and run the ACE solver")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a request and print the solver's result table
    Run {
        /// Request file (YAML)
        request: PathBuf,

        /// Directory for temporary files
        #[arg(long, env = "ACEQD_TEMP_DIR")]
        temp_dir: Option<PathBuf>,

        /// Stream solver output
        #[arg(short, long)]
        verbose: bool,

        /// Keep the parameter file after the run
        #[arg(long)]
        keep_param: bool,
    },

    /// Write parameter and pulse files without running the solver
    Prepare {
        /// Request file (YAML)
        request: PathBuf,

        /// Directory for the prepared files
        #[arg(long, env = "ACEQD_TEMP_DIR")]
        temp_dir: Option<PathBuf>,
    },

    /// Print the process-tensor file a request reads or writes
    PtName {
        /// Request file (YAML)
        request: PathBuf,
    },

    /// Show effective configuration
    Config,

    /// Check that the solver binary can be found
    Check,
}

/// A request file: the request itself plus the pulses driving it.
#[derive(Deserialize)]
struct RequestFile {
    #[serde(flatten)]
    request: SimulationRequest,

    #[serde(default)]
    pulses: Vec<ChirpedPulse>,
}

impl RequestFile {
    fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_logging(&config.logging);

    match cli.command {
        Commands::Run {
            request,
            temp_dir,
            verbose,
            keep_param,
        } => {
            if let Some(dir) = temp_dir {
                config.solver.temp_dir = dir;
            }
            config.validate()?;

            let mut file = RequestFile::load(&request)?;
            file.request.verbose |= verbose;
            file.request.files.keep_param |= keep_param;

            let system = AceSystem::new(&config.solver);
            match system.run(&file.request, &file.pulses) {
                Ok(RunOutcome::Completed(table)) => {
                    for row in table.rows() {
                        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
                        println!("{}", line.join(" "));
                    }
                }
                Ok(RunOutcome::Prepared { param_file }) => {
                    println!("{}", param_file.display());
                }
                Err(e) => {
                    error!(error = %e, request = %request.display(), "Run failed");
                    return Err(e);
                }
            }
        }

        Commands::Prepare { request, temp_dir } => {
            if let Some(dir) = temp_dir {
                config.solver.temp_dir = dir;
            }
            config.validate()?;

            let mut file = RequestFile::load(&request)?;
            file.request.files.prepare_only = true;

            let system = AceSystem::new(&config.solver);
            if let RunOutcome::Prepared { param_file } = system.run(&file.request, &file.pulses)? {
                println!("{}", param_file.display());
            }
        }

        Commands::PtName { request } => {
            let file = RequestFile::load(&request)?;
            let pt_file = process_tensor::resolve_path(&file.request);
            let state = if pt_file.exists() { "cached" } else { "missing" };
            println!("{} ({})", pt_file.display(), state);
        }

        Commands::Config => {
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Check => {
            let runner = AceRunner::new(config.solver.binary.clone());
            match runner.locate() {
                Some(path) => {
                    info!(solver = %path.display(), "Solver found");
                    println!("{}: {}", config.solver.binary, path.display());
                }
                None => {
                    eprintln!("{}: not found", config.solver.binary);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Initialize logging with tracing.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

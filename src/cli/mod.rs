use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use txrm_params::table::PLACEHOLDER_SAMPLE_ID;

mod config;
mod info;
mod inspect;
mod table;

use config::{CliOverrides, Config, ReportSettings};

/// txrm-params - Xradia TXRM acquisition parameters for LIMS import
#[derive(Parser)]
#[command(name = "txrm-params")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract scan parameters and write the LIMS CSV table
    Table {
        /// Input TXRM file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output CSV path (defaults to <INPUT stem>_Params.csv)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Sample ID to include (repeatable; overrides --start/--count)
        #[arg(short = 's', long = "sample", value_name = "ID")]
        samples: Vec<String>,

        /// First sample number of a consecutive range (default: 1000)
        #[arg(long, value_name = "N")]
        start: Option<u64>,

        /// Number of consecutive samples (default: 1)
        #[arg(short = 'n', long, value_name = "K")]
        count: Option<u64>,

        /// Alignment time row value (default: 15)
        #[arg(short = 'a', long)]
        alignment_time: Option<i64>,

        /// Processing time row value (default: 15)
        #[arg(short = 'p', long)]
        processing_time: Option<i64>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Show the feedback trail and rows for one sample without writing a file
    Inspect {
        /// Input TXRM file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Sample ID stamped into the printed rows
        #[arg(short = 's', long = "sample", default_value = PLACEHOLDER_SAMPLE_ID)]
        sample: String,

        /// Alignment time row value (default: 15)
        #[arg(short = 'a', long)]
        alignment_time: Option<i64>,

        /// Processing time row value (default: 15)
        #[arg(short = 'p', long)]
        processing_time: Option<i64>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// List the storages and streams inside a TXRM file
    Info {
        /// Input TXRM file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

fn load_config(path: Option<PathBuf>) -> Result<Option<Config>> {
    path.map(|p| Config::from_file(&p)).transpose()
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Table {
            input,
            output,
            samples,
            start,
            count,
            alignment_time,
            processing_time,
            config,
        } => {
            let file_config = load_config(config)?;
            let overrides = CliOverrides {
                samples,
                start_sample: start,
                count,
                alignment_time,
                processing_time,
            };
            let settings = ReportSettings::resolve(overrides, file_config.as_ref())?;
            table::run(input, output, settings)
        }
        Commands::Inspect {
            input,
            sample,
            alignment_time,
            processing_time,
            config,
        } => {
            let file_config = load_config(config)?;
            let overrides = CliOverrides {
                alignment_time,
                processing_time,
                ..Default::default()
            };
            let settings = ReportSettings::resolve(overrides, file_config.as_ref())?;
            inspect::run(input, sample, settings.params)
        }
        Commands::Info { file } => info::run(file),
    }
}

//! # txrm-params
//!
//! A command-line tool that turns Xradia TXRM scan metadata into the CSV
//! table imported by the lab's LIMS.
//!
//! ## Usage
//!
//! ```bash
//! # Table for sample 1000, written to scan_Params.csv
//! txrm-params table scan.txrm
//!
//! # Three consecutive samples with custom operator times
//! txrm-params table scan.txrm out.csv --start 2040 --count 3 -a 20 -p 30
//!
//! # Show what would be written
//! txrm-params inspect scan.txrm
//!
//! # List container streams
//! txrm-params info scan.txrm
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}

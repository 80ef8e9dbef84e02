//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use gabarito::ProductVariant;
use std::path::PathBuf;

/// Gabarito: map cost and sale spreadsheets onto a canonical schema
#[derive(Parser)]
#[command(name = "gabarito")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the pages of a CSV or spreadsheet file
    Sheets {
        /// Path to the source file (CSV/XLS/XLSX/XLSM)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show the detected header and sample rows of one page
    Preview {
        /// Path to the source file (CSV/XLS/XLSX/XLSM)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Zero-based page index
        #[arg(short, long, default_value = "0")]
        sheet: usize,

        /// First data cell, e.g. A5
        #[arg(long, default_value = "A1")]
        start_cell: String,

        /// Last sheet row to read (1-based, inclusive)
        #[arg(long)]
        stop_row: Option<u32>,

        /// Number of sample rows to print
        #[arg(short, long, default_value = "5")]
        rows: usize,

        /// Write the extracted table to this CSV file
        #[arg(long, value_name = "OUT")]
        csv: Option<PathBuf>,
    },

    /// Show mapping progress and what still blocks the export
    Status {
        /// Path to the plan file
        #[arg(value_name = "PLAN")]
        plan: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay a plan and write its config file
    Build {
        /// Path to the plan file
        #[arg(value_name = "PLAN")]
        plan: PathBuf,

        /// Directory for the config file (default: the plan's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output name, overrides the plan's (written as config_<NAME>.json)
        #[arg(short, long)]
        name: Option<String>,

        /// Product variant, overrides the plan's (standard or locked)
        #[arg(long)]
        variant: Option<ProductVariant>,

        /// Print the config instead of writing it
        #[arg(long)]
        stdout: bool,
    },
}

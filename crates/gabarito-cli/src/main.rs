//! Gabarito CLI - build column-mapping configs from spreadsheets.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use colored::Colorize;
use cli::{Cli, Commands};
use logging::LogConfig;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(&LogConfig::from_verbosity(cli.verbose));

    let result = match cli.command {
        Commands::Sheets { file } => commands::sheets::run(file),

        Commands::Preview {
            file,
            sheet,
            start_cell,
            stop_row,
            rows,
            csv,
        } => commands::preview::run(file, sheet, start_cell, stop_row, rows, csv),

        Commands::Status { plan, json } => commands::status::run(plan, json),

        Commands::Build {
            plan,
            output_dir,
            name,
            variant,
            stdout,
        } => commands::build::run(plan, output_dir, name, variant, stdout),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

//! Sheets command - list the pages of a source file.

use std::path::PathBuf;

use colored::Colorize;
use gabarito::Gabarito;

pub fn run(file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let workbook = Gabarito::new().load_workbook(&file)?;

    println!(
        "{} {} ({}, {} pages)",
        "Pages in".cyan().bold(),
        workbook.name().white(),
        workbook.metadata.format,
        workbook.sheets.len()
    );
    println!();

    for (index, sheet) in workbook.sheets.iter().enumerate() {
        match sheet.used_range() {
            Some(range) => println!(
                "  {:>3}  {:30} {} ({} rows x {} cols)",
                index.to_string().white().bold(),
                sheet.name,
                format!("{}:{}", range.start, range.end).cyan(),
                range.height(),
                range.width()
            ),
            None => println!(
                "  {:>3}  {:30} {}",
                index.to_string().white().bold(),
                sheet.name,
                "empty".dimmed()
            ),
        }
    }

    println!();
    println!(
        "Run {} to inspect a page.",
        format!("gabarito preview {} --sheet <N> --start-cell <CELL>", file.display()).cyan()
    );

    Ok(())
}

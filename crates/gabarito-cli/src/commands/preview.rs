//! Preview command - show the header detected for a start cell.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use colored::Colorize;
use gabarito::{Gabarito, GabaritoError, SourceTable};

pub fn run(
    file: PathBuf,
    sheet_index: usize,
    start_cell: String,
    stop_row: Option<u32>,
    sample_rows: usize,
    csv_out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let gabarito = Gabarito::new();
    let workbook = gabarito.load_workbook(&file)?;
    let sheet = workbook
        .sheet(sheet_index)
        .ok_or_else(|| GabaritoError::SheetNotFound(format!("page {}", sheet_index)))?;

    let range = gabarito.resolver().extract(sheet, &start_cell, stop_row)?;

    println!(
        "{} {} / {}",
        "Preview of".cyan().bold(),
        workbook.name().white(),
        sheet.name.white()
    );
    println!(
        "Header row: {}   Data rows: {}",
        (range.header_row_index + 1).to_string().white().bold(),
        range.data_rows.len().to_string().white().bold()
    );
    println!();

    println!("{}", "Columns:".yellow().bold());
    for (i, column) in range.columns.iter().enumerate() {
        println!("  {:>3}  {}", i, column);
    }

    if sample_rows > 0 && !range.data_rows.is_empty() {
        println!();
        println!("{}", "Sample rows:".yellow().bold());
        for (row, values) in range.source_rows.iter().zip(&range.data_rows).take(sample_rows) {
            println!("  {:>5}  {}", (row + 1).to_string().dimmed(), values.join(" | "));
        }
    }

    if let Some(out) = csv_out {
        let table = SourceTable::new(workbook.name(), range.columns, range.data_rows);
        let writer = BufWriter::new(File::create(&out)?);
        table.write_csv(writer)?;
        println!();
        println!(
            "{} {} rows to {}",
            "Wrote".green().bold(),
            table.row_count(),
            out.display().to_string().cyan()
        );
    }

    Ok(())
}

//! Status command - show mapping progress for a plan.

use std::path::PathBuf;

use colored::Colorize;
use gabarito::mapping::MappingProgress;
use gabarito::{Gabarito, MergeConfig, Session, SourceFile};

const BAR_WIDTH: usize = 30;

pub fn run(plan_path: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !plan_path.exists() {
        return Err(format!("Plan file not found: {}", plan_path.display()).into());
    }

    let gabarito = Gabarito::new();
    let (plan, session) = gabarito.load_plan(&plan_path)?;
    let assembler = gabarito.assembler_for(&plan);
    let readiness = assembler.readiness(&session);

    let schema = session.schema();
    let reconciler = session.reconciler();
    let mappings = session.mappings();
    let required = reconciler.progress(mappings, &schema.required_columns);
    let optional = reconciler.progress(mappings, &schema.optional_columns);
    let unmapped_optional = reconciler.unmapped(mappings, &schema.optional_columns);
    let extras = reconciler.extra_variations(mappings);
    let keys = merge_keys(&session);

    if json_output {
        let sources: Vec<_> = SourceFile::ALL
            .iter()
            .filter_map(|&file| {
                session.source(file).map(|table| {
                    serde_json::json!({
                        "file": file,
                        "name": table.name,
                        "columns": table.column_count(),
                        "rows": table.row_count(),
                        "pages": session.pages(file).len(),
                    })
                })
            })
            .collect();

        let key_entries: Vec<_> = keys
            .iter()
            .map(|key| {
                serde_json::json!({
                    "file": key.file,
                    "key": key.key,
                    "custom": key.custom,
                })
            })
            .collect();

        let status = serde_json::json!({
            "plan": plan_path.display().to_string(),
            "variant": assembler.variant(),
            "sources": sources,
            "progress": {
                "required": required,
                "optional": optional,
            },
            "unmappedOptional": unmapped_optional,
            "extraVariations": extras,
            "uniqueVariations": reconciler.unique_variation_count(mappings),
            "mergeKeys": key_entries,
            "readiness": readiness,
            "isReady": readiness.is_ready(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Mapping status for".cyan().bold(),
        plan_path.display().to_string().white()
    );
    println!();

    println!("{}", "Sources:".yellow().bold());
    for file in SourceFile::ALL {
        match session.source(file) {
            Some(table) => println!(
                "  {:6} {} ({} columns, {} rows)",
                file.as_str(),
                table.name.white(),
                table.column_count(),
                table.row_count()
            ),
            None => println!("  {:6} {}", file.as_str(), "not attached".dimmed()),
        }
    }
    println!();

    print_progress("Required", &required);
    print_progress("Optional", &optional);
    println!();

    if !keys.is_empty() {
        println!("{}", "Merge keys:".yellow().bold());
        for key in &keys {
            let note = if key.custom {
                " (not a column of this file)".yellow().to_string()
            } else {
                String::new()
            };
            println!("  {:6} {}{}", key.file.as_str(), key.key.white(), note);
        }
        println!();
    }

    if !extras.is_empty() {
        println!(
            "Extra variations on {}: {}",
            schema.variation_column.white(),
            extras.join(", ").cyan()
        );
        println!();
    }

    if readiness.is_ready() {
        println!("{}", "Ready to export.".green().bold());
        println!(
            "Run {} to write the config.",
            format!("gabarito build {}", plan_path.display()).cyan().bold()
        );
        return Ok(());
    }

    println!("{}", "Blocking the export:".yellow().bold());
    if !readiness.has_source {
        println!("  {} no source file attached", "-".red());
    }
    for column in &readiness.missing_required {
        println!("  {} {} is not mapped", "-".red(), column.white());
    }
    if !readiness.merge_ready {
        println!("  {} merge keys are not set for both files", "-".red());
    }

    Ok(())
}

/// A chosen merge key and whether it was typed by hand.
#[derive(Debug, PartialEq)]
struct MergeKey<'a> {
    file: SourceFile,
    key: &'a str,
    custom: bool,
}

/// Keys that have been set, left side first.
fn merge_keys(session: &Session) -> Vec<MergeKey<'_>> {
    let Some(merge) = session.merge_config() else {
        return Vec::new();
    };
    [
        (merge.left_file, merge.left_key.as_str()),
        (merge.right_file, merge.right_key.as_str()),
    ]
    .into_iter()
    .filter(|(_, key)| !key.is_empty())
    .map(|(file, key)| {
        let columns = session.source(file).map(|t| t.columns.as_slice());
        MergeKey {
            file,
            key,
            custom: MergeConfig::is_custom_key(key, columns),
        }
    })
    .collect()
}

fn print_progress(label: &str, progress: &MappingProgress) {
    let fraction = progress.fraction();
    let count = format!("{}/{}", progress.mapped, progress.total);
    let count = if progress.is_complete() {
        count.green().bold()
    } else {
        count.white().bold()
    };
    println!(
        "{:9} {} {} ({:.0}%)",
        format!("{}:", label),
        progress_bar(fraction, BAR_WIDTH).cyan(),
        count,
        fraction * 100.0
    );
}

fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0)) * width as f64).round() as usize;
    "█".repeat(filled) + &"░".repeat(width - filled)
}

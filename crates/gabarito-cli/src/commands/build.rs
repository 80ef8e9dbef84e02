//! Build command - replay a plan and write its config file.

use std::path::{Path, PathBuf};

use colored::Colorize;
use gabarito::{ConfigAssembler, Gabarito, ProductVariant, DEFAULT_OUTPUT_NAME};

pub fn run(
    plan_path: PathBuf,
    output_dir: Option<PathBuf>,
    name: Option<String>,
    variant: Option<ProductVariant>,
    to_stdout: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !plan_path.exists() {
        return Err(format!("Plan file not found: {}", plan_path.display()).into());
    }

    let gabarito = Gabarito::new();
    let (plan, session) = gabarito.load_plan(&plan_path)?;
    let assembler = match variant {
        Some(v) => ConfigAssembler::new(v),
        None => gabarito.assembler_for(&plan),
    };

    let Some(config) = assembler.assemble(&session) else {
        let readiness = assembler.readiness(&session);
        let mut gaps = Vec::new();
        if !readiness.has_source {
            gaps.push("no source file attached".to_string());
        }
        if !readiness.missing_required.is_empty() {
            gaps.push(format!("unmapped: {}", readiness.missing_required.join(", ")));
        }
        if !readiness.merge_ready {
            gaps.push("merge keys not set".to_string());
        }
        return Err(format!("Plan is not ready to export ({})", gaps.join("; ")).into());
    };

    if to_stdout {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let name = name
        .or_else(|| plan.output.clone())
        .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string());
    let dir = output_dir.unwrap_or_else(|| default_output_dir(&plan_path));
    let path = config.save_named(&dir, &name)?;

    println!(
        "{} {} ({} mappings, {} variant)",
        "Wrote".green().bold(),
        path.display().to_string().cyan(),
        config.column_mapping.len().to_string().white().bold(),
        variant_label(assembler.variant())
    );

    Ok(())
}

fn default_output_dir(plan_path: &Path) -> PathBuf {
    match plan_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn variant_label(variant: ProductVariant) -> &'static str {
    match variant {
        ProductVariant::Standard => "standard",
        ProductVariant::Locked => "locked",
    }
}

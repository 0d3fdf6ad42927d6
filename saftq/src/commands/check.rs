// saftq/src/commands/check.rs
//
// USE CASE: Audit a file with the quality battery, without cleaning it.

use std::path::{Path, PathBuf};

use anyhow::Context;
use comfy_table::{Cell, Table as Grid, presets::UTF8_FULL};
use saftq_core::application::run_standard_checks;
use saftq_core::domain::Table;
use saftq_core::domain::schema::{self, normalize_header};
use saftq_core::infrastructure::config::load_config;
use saftq_core::infrastructure::fs::atomic_write;
use saftq_core::infrastructure::io::read_table;

pub fn execute(
    input: PathBuf,
    report: Option<PathBuf>,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    let base_dir = input.parent().unwrap_or(Path::new("."));
    let pipeline = load_config(config.as_deref(), base_dir)
        .with_context(|| format!("Failed to load configuration for '{}'", input.display()))?;

    println!("🩺 Auditing '{}'...", input.display());
    let mut table =
        read_table(&input).with_context(|| format!("Cannot read '{}'", input.display()))?;
    // Raw SAF-T exports carry namespace prefixes; strip them so the checks
    // find their columns.
    table.rename_columns(normalize_header);
    let table = best_effort_typing(&table)?;

    let dataset = pipeline.dataset_label.clone().unwrap_or_else(|| {
        input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "SAF-T".to_string())
    });
    let checker = run_standard_checks(&table, &dataset, &pipeline.thresholds)?;
    let quality = checker.generate_report()?;

    // Render the battery results
    let mut grid = Grid::new();
    grid.load_preset(UTF8_FULL);
    grid.set_header(vec!["Check", "Category", "Status", "Metric", "Message"]);
    for result in &quality.results {
        grid.add_row(vec![
            Cell::new(&result.name),
            Cell::new(result.category.label()),
            Cell::new(if result.passed { "✅ PASS" } else { "❌ FAIL" }),
            Cell::new(format!("{:.2}", result.metric)),
            Cell::new(&result.message),
        ]);
    }
    println!("{grid}");
    println!(
        "📊 {}: {}/{} passed ({:.1}%) -> {}",
        quality.dataset, quality.passed, quality.total, quality.overall_pct, quality.status
    );

    if let Some(path) = report {
        let content = serde_json::to_string_pretty(&quality)?;
        atomic_write(&path, content)
            .with_context(|| format!("Cannot write report to '{}'", path.display()))?;
        println!("📁 Report written to {}", path.display());
    }

    Ok(())
}

/// Coerce each cell to its declared type where possible, keeping the
/// original cell where not. CSV sources arrive untyped; without this the
/// data-type checks would flag every textual number. Cells that genuinely
/// cannot be coerced stay as they are and get flagged.
fn best_effort_typing(table: &Table) -> anyhow::Result<Table> {
    let dtypes: Vec<_> = table
        .columns()
        .iter()
        .map(|name| schema::field(name).map(|f| f.dtype))
        .collect();

    let rows = table
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(&dtypes)
                .map(|(cell, dtype)| match dtype {
                    Some(ty) => ty.coerce(cell).unwrap_or_else(|| cell.clone()),
                    None => cell.clone(),
                })
                .collect()
        })
        .collect();

    Ok(table.with_rows(rows)?)
}

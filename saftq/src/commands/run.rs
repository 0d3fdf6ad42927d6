// saftq/src/commands/run.rs
//
// USE CASE: Run the full ETL + quality pipeline on one file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use saftq_core::application::{RunConfig, run};
use saftq_core::infrastructure::config::load_config;

pub fn execute(
    input: PathBuf,
    output: PathBuf,
    report_dir: PathBuf,
    full_clean: bool,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    // A. Load the Config (Infra)
    println!("⚙️  Loading configuration...");
    let base_dir = input.parent().unwrap_or(Path::new("."));
    let pipeline = load_config(config.as_deref(), base_dir)
        .with_context(|| format!("Failed to load configuration for '{}'", input.display()))?;
    println!(
        "   Coerce policy: {:?} | Full clean: {}",
        pipeline.cleaning.coerce_policy, full_clean
    );

    // B. Run the Pipeline (Application Layer)
    println!("🚀 Processing '{}'...", input.display());
    let run_config = RunConfig {
        input: input.clone(),
        output,
        report_dir: report_dir.clone(),
        full_clean,
        pipeline,
    };

    let outcome =
        run(&run_config).with_context(|| format!("Pipeline failed for '{}'", input.display()))?;

    // C. Textual report
    let summary = &outcome.summary;
    println!(
        "\n✨ SUCCESS! {} -> {} rows ({:.1}% retained) in {:.2?}",
        summary.rows_in,
        summary.rows_out,
        summary.retention_pct,
        start.elapsed()
    );
    for stage in &summary.stages {
        println!("   - {}: removed {} rows", stage.stage, stage.rows_removed);
    }
    if summary.columns_dropped > 0 {
        println!("   - sparse columns dropped: {}", summary.columns_dropped);
    }

    let report = &outcome.report;
    let icon = if report.failed == 0 { "📊" } else { "⚠️ " };
    println!(
        "{} Quality: {}/{} checks passed ({:.1}%) -> {}",
        icon, report.passed, report.total, report.overall_pct, report.status
    );
    println!("📁 Cleaned file: {}", outcome.output.display());
    println!("📁 Reports in:   {}", report_dir.display());

    Ok(())
}

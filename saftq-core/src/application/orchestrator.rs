// saftq-core/src/application/orchestrator.rs
//
// One full run: extract -> clean -> export -> check -> report. Only fatal
// I/O and schema errors propagate; data-quality failures are recorded in
// the report and never fail the run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::application::battery::run_standard_checks;
use crate::application::pipeline::{EtlPipeline, PipelineSummary};
use crate::domain::quality::QualityReport;
use crate::error::SaftError;
use crate::infrastructure::config::PipelineConfig;
use crate::infrastructure::fs::atomic_write;

pub const QUALITY_REPORT_FILE: &str = "quality_report.json";
pub const PIPELINE_SUMMARY_FILE: &str = "pipeline_summary.json";

/// Inputs of one orchestrated run. All paths are explicit; nothing is
/// discovered from the working directory.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub report_dir: PathBuf,
    /// Also deduplicate, drop null rows and drop sparse columns.
    pub full_clean: bool,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Serialize)]
pub struct RunOutcome {
    pub summary: PipelineSummary,
    pub report: QualityReport,
    pub output: PathBuf,
}

pub fn run(config: &RunConfig) -> Result<RunOutcome, SaftError> {
    info!(input = ?config.input, output = ?config.output, "Starting pipeline run");

    // 1. CLEAN (documented default stage order)
    let mut pipeline = EtlPipeline::extract(&config.input)?
        .strip_xml_prefixes()
        .filter_valid_sales()?
        .convert_types(config.pipeline.cleaning.coerce_policy);

    if config.full_clean {
        pipeline = pipeline
            .remove_duplicates_and_nulls(&config.pipeline.cleaning.required_columns)?
            .drop_sparse_columns(config.pipeline.cleaning.sparse_column_threshold);
    }

    // 2. EXPORT the cleaned table before checking: the dashboards consume
    // the file even when quality turns out poor.
    let pipeline = pipeline.export(&config.output)?;
    let (table, summary) = pipeline.finish();

    // 3. CHECK the cleaned table
    let label = config
        .pipeline
        .dataset_label
        .clone()
        .unwrap_or_else(|| dataset_label_from(&config.input));
    let checker = run_standard_checks(&table, &label, &config.pipeline.thresholds)?;
    let report = checker.generate_report()?;
    info!(
        total = report.total,
        passed = report.passed,
        status = %report.status,
        "Quality battery finished"
    );

    // 4. PERSIST the report documents
    fs::create_dir_all(&config.report_dir)?;
    write_json(&config.report_dir.join(QUALITY_REPORT_FILE), &report)?;
    write_json(&config.report_dir.join(PIPELINE_SUMMARY_FILE), &summary)?;

    Ok(RunOutcome {
        summary,
        report,
        output: config.output.clone(),
    })
}

fn dataset_label_from(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "SAF-T".to_string())
}

fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<(), SaftError> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| SaftError::InternalError(format!("Serialization: {e}")))?;
    atomic_write(path, content)?;
    Ok(())
}

// saftq-core/src/infrastructure/config.rs
//
// Explicit, file-based configuration. Every tolerance and threshold the
// checks use lives here as a named field with a documented default, so a
// run is reproducible from the config file alone. There is no directory
// scanning: absent file means defaults, nothing else.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::domain::schema::CoercePolicy;
use crate::infrastructure::error::InfrastructureError;

pub const DEFAULT_CONFIG_FILE: &str = "saftq.yaml";

fn default_min_invoice_date() -> NaiveDate {
    // SAF-T was not mandated before the 2000s; anything earlier is noise.
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Thresholds consumed by the standard quality battery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Max null pct for the critical columns (InvoiceDate, CreditAmount).
    pub critical_max_null_pct: f64,
    /// Max null pct for the remaining schema columns.
    pub standard_max_null_pct: f64,
    /// Max null pct tolerated on TaxPercentage.
    pub tax_max_null_pct: f64,
    /// Allowed |CreditAmount - Quantity x UnitPrice| deviation.
    pub billing_tolerance: f64,
    /// Dates before this are invalid.
    pub min_invoice_date: NaiveDate,
    /// Dates after today + horizon are invalid.
    pub future_horizon_days: i64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            critical_max_null_pct: 1.0,
            standard_max_null_pct: 2.0,
            tax_max_null_pct: 5.0,
            billing_tolerance: 0.01,
            min_invoice_date: default_min_invoice_date(),
            future_horizon_days: 1,
        }
    }
}

/// Knobs for the cleaning stages of the ETL pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningOptions {
    /// What happens to a cell that fails type coercion.
    pub coerce_policy: CoercePolicy,
    /// Rows with nulls in any of these columns are dropped.
    pub required_columns: Vec<String>,
    /// Columns whose null fraction exceeds this are dropped in full-clean mode.
    pub sparse_column_threshold: f64,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            coerce_policy: CoercePolicy::default(),
            required_columns: vec![
                "InvoiceDate".to_string(),
                "ProductCode".to_string(),
                "CreditAmount".to_string(),
            ],
            sparse_column_threshold: 0.7,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub dataset_label: Option<String>,
    pub cleaning: CleaningOptions,
    pub thresholds: QualityThresholds,
}

/// Load the pipeline configuration.
///
/// `explicit` wins when given (missing file is then an error); otherwise
/// `saftq.yaml` next to the input is used when present, defaults when not.
/// Environment variables are applied last (config file < env).
pub fn load_config(
    explicit: Option<&Path>,
    base_dir: &Path,
) -> Result<PipelineConfig, InfrastructureError> {
    let mut config = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(InfrastructureError::Config(format!(
                    "configuration file not found: '{}'",
                    path.display()
                )));
            }
            parse_file(path)?
        }
        None => {
            let candidate = base_dir.join(DEFAULT_CONFIG_FILE);
            if candidate.exists() {
                parse_file(&candidate)?
            } else {
                PipelineConfig::default()
            }
        }
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

fn parse_file(path: &Path) -> Result<PipelineConfig, InfrastructureError> {
    info!(path = ?path, "Loading pipeline configuration");
    let content = fs::read_to_string(path)?;
    let config: PipelineConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut PipelineConfig) {
    if let Ok(val) = std::env::var("SAFTQ_BILLING_TOLERANCE")
        && let Ok(tol) = val.parse::<f64>()
    {
        info!(old = config.thresholds.billing_tolerance, new = tol, "Overriding billing tolerance via ENV");
        config.thresholds.billing_tolerance = tol;
    }
    if let Ok(val) = std::env::var("SAFTQ_COERCE_POLICY") {
        match val.as_str() {
            "drop_row" => config.cleaning.coerce_policy = CoercePolicy::DropRow,
            "nullify" => config.cleaning.coerce_policy = CoercePolicy::Nullify,
            other => tracing::warn!(value = other, "Ignoring unknown SAFTQ_COERCE_POLICY"),
        }
    }
}

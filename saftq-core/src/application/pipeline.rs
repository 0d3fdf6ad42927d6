// saftq-core/src/application/pipeline.rs
//
// The ETL pipeline as an ownership-passing fluent builder: every stage
// consumes the pipeline state and returns the next one, so no stage can
// retain a reference to a superseded table. Each stage is a pure function
// of its input table plus fixed parameters; re-runs are deterministic.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::schema::{self, CoercePolicy, SAFT_SCHEMA, SemanticType};
use crate::domain::table::{Table, Value};
use crate::error::SaftError;
use crate::infrastructure::io;

/// Rows removed by one named stage, in execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageCount {
    pub stage: String,
    pub rows_removed: usize,
}

/// Counts at each stage of a pipeline run, for the textual report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub source: String,
    pub rows_in: usize,
    pub columns_in: usize,
    pub stages: Vec<StageCount>,
    pub prefixes_stripped: usize,
    pub coercion_failures: usize,
    pub columns_dropped: usize,
    pub rows_out: usize,
    pub columns_out: usize,
    pub retention_pct: f64,
}

impl PipelineSummary {
    fn start(source: &Path, table: &Table) -> Self {
        Self {
            source: source.display().to_string(),
            rows_in: table.row_count(),
            columns_in: table.column_count(),
            stages: Vec::new(),
            prefixes_stripped: 0,
            coercion_failures: 0,
            columns_dropped: 0,
            rows_out: table.row_count(),
            columns_out: table.column_count(),
            retention_pct: 100.0,
        }
    }

    fn record(&mut self, stage: &str, rows_removed: usize, table: &Table) {
        self.stages.push(StageCount {
            stage: stage.to_string(),
            rows_removed,
        });
        self.refresh(table);
    }

    fn refresh(&mut self, table: &Table) {
        self.rows_out = table.row_count();
        self.columns_out = table.column_count();
        self.retention_pct = if self.rows_in == 0 {
            100.0
        } else {
            (self.rows_out as f64 / self.rows_in as f64 * 10_000.0).round() / 100.0
        };
    }

    /// Rows removed by a named stage, if it ran.
    pub fn removed_by(&self, stage: &str) -> Option<usize> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.rows_removed)
    }
}

#[derive(Debug)]
pub struct EtlPipeline {
    table: Table,
    summary: PipelineSummary,
}

impl EtlPipeline {
    /// Load the source table and validate the required SAF-T columns once,
    /// up front. Downstream stages may then assume the schema.
    pub fn extract(source: &Path) -> Result<Self, SaftError> {
        info!(source = ?source, "Extracting table");
        let table = io::read_table(source)?;
        schema::validate_required(&table)?;
        let summary = PipelineSummary::start(source, &table);
        info!(rows = table.row_count(), columns = table.column_count(), "Extraction complete");
        Ok(Self { table, summary })
    }

    /// Start from an in-memory table (used by the checker-only code path
    /// and by tests). Schema validation still applies.
    pub fn from_table(table: Table, label: &str) -> Result<Self, SaftError> {
        schema::validate_required(&table)?;
        let summary = PipelineSummary::start(Path::new(label), &table);
        Ok(Self { table, summary })
    }

    /// Strip XML namespace prefixes (`ns1:`) echoed into the header row by
    /// the SAF-T export. No-op when absent.
    pub fn strip_xml_prefixes(mut self) -> Self {
        let before: Vec<String> = self.table.columns().to_vec();
        self.table.rename_columns(schema::normalize_header);
        let stripped = before
            .iter()
            .zip(self.table.columns())
            .filter(|(a, b)| a != b)
            .count();
        self.summary.prefixes_stripped = stripped;
        if stripped > 0 {
            info!(count = stripped, "Stripped XML namespace prefixes");
        }
        self
    }

    /// Keep only plausible sales rows: Quantity > 0 and CreditAmount
    /// present. Quantity is evaluated through numeric coercion so the
    /// filter behaves the same before and after convert_types.
    pub fn filter_valid_sales(mut self) -> Result<Self, SaftError> {
        let qty_idx = self.table.column_index("Quantity")?;
        let amount_idx = self.table.column_index("CreditAmount")?;
        let removed = self.table.retain_rows(|row| {
            let qty_positive = SemanticType::Number
                .coerce(&row[qty_idx])
                .and_then(|v| v.as_f64())
                .is_some_and(|q| q > 0.0);
            qty_positive && !row[amount_idx].is_null()
        });
        info!(removed, "Filtered invalid sales rows");
        self.summary.record("filter_valid_sales", removed, &self.table);
        Ok(self)
    }

    /// Coerce every schema column to its declared semantic type. Cells that
    /// cannot be represented follow the explicit policy: drop the row or
    /// null the cell. Either way the count lands in the summary.
    pub fn convert_types(mut self, policy: CoercePolicy) -> Self {
        let targets: Vec<(usize, SemanticType)> = SAFT_SCHEMA
            .iter()
            .filter_map(|spec| {
                self.table
                    .column_index(spec.name)
                    .ok()
                    .map(|idx| (idx, spec.dtype))
            })
            .collect();

        let mut failures = 0usize;
        let mut rows_removed = 0usize;
        let mut new_rows = Vec::with_capacity(self.table.row_count());

        'rows: for row in self.table.rows() {
            let mut row = row.clone();
            for &(idx, dtype) in &targets {
                match dtype.coerce(&row[idx]) {
                    Some(value) => row[idx] = value,
                    None => {
                        failures += 1;
                        match policy {
                            CoercePolicy::DropRow => {
                                rows_removed += 1;
                                continue 'rows;
                            }
                            CoercePolicy::Nullify => row[idx] = Value::Null,
                        }
                    }
                }
            }
            new_rows.push(row);
        }

        // Column set is unchanged, so the rebuild cannot fail.
        if let Ok(table) = self.table.with_rows(new_rows) {
            self.table = table;
        }
        self.summary.coercion_failures = failures;
        self.summary.record("convert_types", rows_removed, &self.table);
        if failures > 0 {
            info!(failures, policy = ?policy, "Type coercion failures handled");
        }
        self
    }

    /// Remove exact-duplicate rows (first occurrence wins), then rows with
    /// nulls in the required column set. Idempotent: a second pass over an
    /// already-clean table removes nothing.
    pub fn remove_duplicates_and_nulls(mut self, required: &[String]) -> Result<Self, SaftError> {
        let mut seen = HashSet::new();
        let duplicates = self.table.retain_rows(|row| {
            let key: Vec<_> = row.iter().map(Value::dedup_key).collect();
            seen.insert(key)
        });
        self.summary.record("remove_duplicates", duplicates, &self.table);

        let indices: Vec<usize> = required
            .iter()
            .map(|c| self.table.column_index(c))
            .collect::<Result<_, _>>()?;
        let nulls = self
            .table
            .retain_rows(|row| indices.iter().all(|&i| !row[i].is_null()));
        self.summary.record("remove_nulls", nulls, &self.table);

        info!(duplicates, nulls, "Removed duplicates and null rows");
        Ok(self)
    }

    /// Drop columns whose null fraction exceeds the threshold. Part of the
    /// optional full-clean path; the required schema columns never qualify
    /// on sane data, but nothing here special-cases them.
    pub fn drop_sparse_columns(mut self, max_null_fraction: f64) -> Self {
        let sparse: Vec<usize> = (0..self.table.column_count())
            .filter(|&idx| self.table.null_fraction(idx) > max_null_fraction)
            .collect();
        if !sparse.is_empty() {
            info!(count = sparse.len(), "Dropping sparse columns");
            self.table.drop_columns(&sparse);
        }
        self.summary.columns_dropped = sparse.len();
        self.summary.refresh(&self.table);
        self
    }

    /// Write the current table; format selected by the destination
    /// extension. The pipeline state flows on for report generation.
    pub fn export(self, destination: &Path) -> Result<Self, SaftError> {
        io::write_table(&self.table, destination)?;
        info!(destination = ?destination, rows = self.table.row_count(), "Exported cleaned table");
        Ok(self)
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn summary(&self) -> &PipelineSummary {
        &self.summary
    }

    pub fn finish(self) -> (Table, PipelineSummary) {
        (self.table, self.summary)
    }
}

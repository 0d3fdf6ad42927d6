// saftq-core/src/domain/quality/checker.rs
//
// Data-quality assertions over a table. A check never fails the run on bad
// data: it records a QualityResult carrying a diagnostic message and a
// measured metric. Only a missing column is fatal, because that is a
// configuration mismatch rather than a data-quality finding.

use chrono::NaiveDate;

use crate::domain::error::DomainError;
use crate::domain::quality::report::QualityReport;
use crate::domain::quality::result::{Category, QualityResult};
use crate::domain::schema::SemanticType;
use crate::domain::table::{Table, Value};

pub struct QualityChecker<'a> {
    table: &'a Table,
    dataset: String,
    results: Vec<QualityResult>,
}

impl<'a> QualityChecker<'a> {
    pub fn new(table: &'a Table, dataset: impl Into<String>) -> Self {
        Self {
            table,
            dataset: dataset.into(),
            results: Vec::new(),
        }
    }

    pub fn results(&self) -> &[QualityResult] {
        &self.results
    }

    // --- COMPLETUDE ---

    /// Passes iff the observed null percentage stays within `max_null_pct`.
    pub fn test_completeness(&mut self, column: &str, max_null_pct: f64) -> Result<(), DomainError> {
        let idx = self.table.column_index(column)?;
        let pct = round2(self.table.null_fraction(idx) * 100.0);
        let name = format!("completeness: {column}");
        let result = if pct <= max_null_pct {
            QualityResult::pass(
                name,
                Category::Completude,
                format!("{column}: {pct:.2}% nulls (limit {max_null_pct}%)"),
                pct,
            )
        } else {
            QualityResult::fail(
                name,
                Category::Completude,
                format!("{column}: {pct:.2}% nulls exceeds limit of {max_null_pct}%"),
                pct,
            )
        };
        self.results.push(result);
        Ok(())
    }

    // --- CONSISTÊNCIA ---

    /// Passes iff every non-null cell already carries the declared type.
    pub fn test_data_type(&mut self, column: &str, expected: SemanticType) -> Result<(), DomainError> {
        let mismatches = self
            .table
            .column_values(column)?
            .filter(|v| !expected.matches(v))
            .count();
        let name = format!("data type: {column}");
        let result = if mismatches == 0 {
            QualityResult::pass(
                name,
                Category::Consistencia,
                format!("{column}: all values are {expected:?}"),
                0.0,
            )
        } else {
            QualityResult::fail(
                name,
                Category::Consistencia,
                format!("{column}: {mismatches} values are not {expected:?}"),
                mismatches as f64,
            )
        };
        self.results.push(result);
        Ok(())
    }

    /// Passes iff every non-null numeric value falls within [min, max].
    pub fn test_value_range(
        &mut self,
        column: &str,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<(), DomainError> {
        let violations = self
            .table
            .column_values(column)?
            .filter_map(Value::as_f64)
            .filter(|v| min.is_some_and(|m| *v < m) || max.is_some_and(|m| *v > m))
            .count();
        let bounds = format!(
            "[{}, {}]",
            min.map_or("-inf".into(), |m| m.to_string()),
            max.map_or("+inf".into(), |m| m.to_string())
        );
        let name = format!("value range: {column}");
        let result = if violations == 0 {
            QualityResult::pass(
                name,
                Category::Consistencia,
                format!("{column}: all values within {bounds}"),
                0.0,
            )
        } else {
            QualityResult::fail(
                name,
                Category::Consistencia,
                format!("{column}: {violations} values outside {bounds}"),
                violations as f64,
            )
        };
        self.results.push(result);
        Ok(())
    }

    // --- INTEGRIDADE ---

    /// Passes iff no combination of the key columns repeats.
    pub fn test_duplicates(&mut self, key_columns: &[&str]) -> Result<(), DomainError> {
        let duplicates = self.table.row_count() - self.distinct_keys(key_columns)?;
        let name = format!("duplicates: {}", key_columns.join("+"));
        let result = if duplicates == 0 {
            QualityResult::pass(
                name,
                Category::Integridade,
                format!("no duplicate rows over ({})", key_columns.join(", ")),
                0.0,
            )
        } else {
            QualityResult::fail(
                name,
                Category::Integridade,
                format!("{} duplicate rows over ({})", duplicates, key_columns.join(", ")),
                duplicates as f64,
            )
        };
        self.results.push(result);
        Ok(())
    }

    /// Passes iff the key columns uniquely identify every row.
    pub fn test_primary_key(&mut self, key_columns: &[&str]) -> Result<(), DomainError> {
        let distinct = self.distinct_keys(key_columns)?;
        let total = self.table.row_count();
        let name = format!("primary key: {}", key_columns.join("+"));
        let result = if distinct == total {
            QualityResult::pass(
                name,
                Category::Integridade,
                format!("({}) is a valid primary key", key_columns.join(", ")),
                0.0,
            )
        } else {
            QualityResult::fail(
                name,
                Category::Integridade,
                format!(
                    "{} duplicated combinations of ({})",
                    total - distinct,
                    key_columns.join(", ")
                ),
                (total - distinct) as f64,
            )
        };
        self.results.push(result);
        Ok(())
    }

    // --- CONFORMIDADE ---

    /// Passes iff every non-null numeric value is strictly positive.
    /// On failure the message names the first offending row (1-based).
    pub fn test_positive_values(&mut self, column: &str) -> Result<(), DomainError> {
        let mut violations = 0usize;
        let mut first_row = None;
        for (i, v) in self.table.column_values(column)?.enumerate() {
            if v.as_f64().is_some_and(|n| n <= 0.0) {
                violations += 1;
                first_row.get_or_insert(i + 1);
            }
        }
        let name = format!("positive values: {column}");
        let result = if violations == 0 {
            QualityResult::pass(
                name,
                Category::Conformidade,
                format!("{column}: all values positive"),
                0.0,
            )
        } else {
            // first_row is set whenever violations > 0
            let row = first_row.unwrap_or_default();
            QualityResult::fail(
                name,
                Category::Conformidade,
                format!("{column}: {violations} non-positive values (first at row {row})"),
                violations as f64,
            )
        };
        self.results.push(result);
        Ok(())
    }

    /// Passes iff every non-null value is a date inside the sane window
    /// [min_date, today + horizon_days]. Non-date cells count as violations.
    pub fn test_valid_dates(
        &mut self,
        column: &str,
        min_date: NaiveDate,
        horizon_days: i64,
    ) -> Result<(), DomainError> {
        let max_date = chrono::Local::now().date_naive() + chrono::Duration::days(horizon_days);
        let violations = self
            .table
            .column_values(column)?
            .filter(|v| !v.is_null())
            .filter(|v| match v.as_date() {
                Some(d) => d < min_date || d > max_date,
                None => true,
            })
            .count();
        let name = format!("valid dates: {column}");
        let result = if violations == 0 {
            QualityResult::pass(
                name,
                Category::Conformidade,
                format!("{column}: all dates within [{min_date}, {max_date}]"),
                0.0,
            )
        } else {
            QualityResult::fail(
                name,
                Category::Conformidade,
                format!("{column}: {violations} values outside [{min_date}, {max_date}] or not dates"),
                violations as f64,
            )
        };
        self.results.push(result);
        Ok(())
    }

    // --- NEGÓCIO ---

    /// Passes iff |amount - quantity * price| <= tolerance on every row where
    /// all three cells are numeric.
    pub fn test_consistent_billing(
        &mut self,
        quantity_col: &str,
        price_col: &str,
        amount_col: &str,
        tolerance: f64,
    ) -> Result<(), DomainError> {
        let qty_idx = self.table.column_index(quantity_col)?;
        let price_idx = self.table.column_index(price_col)?;
        let amount_idx = self.table.column_index(amount_col)?;

        let violations = self
            .table
            .rows()
            .iter()
            .filter_map(|row| {
                let qty = row[qty_idx].as_f64()?;
                let price = row[price_idx].as_f64()?;
                let amount = row[amount_idx].as_f64()?;
                Some((amount - qty * price).abs() > tolerance)
            })
            .filter(|violated| *violated)
            .count();

        let result = if violations == 0 {
            QualityResult::pass(
                "consistent billing",
                Category::Negocio,
                format!("{amount_col} matches {quantity_col} x {price_col} (tolerance {tolerance})"),
                0.0,
            )
        } else {
            QualityResult::fail(
                "consistent billing",
                Category::Negocio,
                format!(
                    "{violations} rows where {amount_col} deviates from {quantity_col} x {price_col} by more than {tolerance}"
                ),
                violations as f64,
            )
        };
        self.results.push(result);
        Ok(())
    }

    // --- RELATÓRIO ---

    /// Aggregate all recorded results. Deterministic, no I/O side effects.
    pub fn generate_report(&self) -> Result<QualityReport, DomainError> {
        if self.results.is_empty() {
            return Err(DomainError::EmptyReport);
        }
        Ok(QualityReport::build(
            &self.dataset,
            chrono::Utc::now().to_rfc3339(),
            self.table.row_count(),
            self.table.column_count(),
            &self.results,
        ))
    }

    fn distinct_keys(&self, key_columns: &[&str]) -> Result<usize, DomainError> {
        let indices: Vec<usize> = key_columns
            .iter()
            .map(|c| self.table.column_index(c))
            .collect::<Result<_, _>>()?;
        let mut seen = std::collections::HashSet::new();
        for row in self.table.rows() {
            let key: Vec<_> = indices.iter().map(|&i| row[i].dedup_key()).collect();
            seen.insert(key);
        }
        Ok(seen.len())
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

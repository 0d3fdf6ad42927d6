// saftq-core/src/domain/quality/report.rs

use serde::{Deserialize, Serialize};

use crate::domain::quality::result::{Category, QualityResult};

/// Derived status badge for an overall pass percentage.
pub fn status_label(pass_pct: f64) -> &'static str {
    if pass_pct >= 95.0 {
        "Excelente"
    } else if pass_pct >= 80.0 {
        "Completo"
    } else if pass_pct >= 50.0 {
        "Parcial"
    } else {
        "Incompleto"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub total: usize,
    pub passed: usize,
    pub pass_pct: f64,
}

/// Aggregated outcome of one checker run. Created fresh per run,
/// write-once afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub dataset: String,
    pub timestamp: String,
    pub rows: usize,
    pub columns: usize,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub overall_pct: f64,
    pub status: String,
    pub categories: Vec<CategorySummary>,
    pub results: Vec<QualityResult>,
}

impl QualityReport {
    pub(crate) fn build(
        dataset: &str,
        timestamp: String,
        rows: usize,
        columns: usize,
        results: &[QualityResult],
    ) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let overall_pct = round2(passed as f64 / total as f64 * 100.0);

        let categories = Category::ALL
            .iter()
            .filter_map(|cat| {
                let in_cat: Vec<&QualityResult> =
                    results.iter().filter(|r| r.category == *cat).collect();
                if in_cat.is_empty() {
                    return None;
                }
                let cat_passed = in_cat.iter().filter(|r| r.passed).count();
                Some(CategorySummary {
                    category: *cat,
                    total: in_cat.len(),
                    passed: cat_passed,
                    pass_pct: round2(cat_passed as f64 / in_cat.len() as f64 * 100.0),
                })
            })
            .collect();

        Self {
            dataset: dataset.to_string(),
            timestamp,
            rows,
            columns,
            total,
            passed,
            failed: total - passed,
            overall_pct,
            status: status_label(overall_pct).to_string(),
            categories,
            results: results.to_vec(),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

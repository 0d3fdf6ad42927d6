// saftq-core/src/application/battery.rs
//
// The standard SAF-T check battery: a fixed catalog of assertions spanning
// all five categories. Each check only fires when its column survived
// cleaning; asking the checker for a column the caller knows is absent
// remains the fatal configuration-error path.

use crate::domain::error::DomainError;
use crate::domain::quality::QualityChecker;
use crate::domain::schema::SemanticType;
use crate::domain::table::Table;
use crate::infrastructure::config::QualityThresholds;

/// Run the standard battery over `table`, returning the populated checker.
pub fn run_standard_checks<'a>(
    table: &'a Table,
    dataset: &str,
    thresholds: &QualityThresholds,
) -> Result<QualityChecker<'a>, DomainError> {
    let mut checker = QualityChecker::new(table, dataset);
    let has = |c: &str| table.has_column(c);

    // --- completude ---
    if has("InvoiceDate") {
        checker.test_completeness("InvoiceDate", thresholds.critical_max_null_pct)?;
    }
    if has("CreditAmount") {
        checker.test_completeness("CreditAmount", thresholds.critical_max_null_pct)?;
    }
    for col in ["ProductCode", "Quantity", "UnitPrice"] {
        if has(col) {
            checker.test_completeness(col, thresholds.standard_max_null_pct)?;
        }
    }
    if has("TaxPercentage") {
        checker.test_completeness("TaxPercentage", thresholds.tax_max_null_pct)?;
    }

    // --- consistência: declared types ---
    if has("InvoiceDate") {
        checker.test_data_type("InvoiceDate", SemanticType::Date)?;
    }
    for col in ["CreditAmount", "Quantity", "UnitPrice", "TaxPercentage"] {
        if has(col) {
            checker.test_data_type(col, SemanticType::Number)?;
        }
    }

    // --- consistência: value ranges ---
    for col in ["CreditAmount", "Quantity", "UnitPrice"] {
        if has(col) {
            checker.test_value_range(col, Some(0.0), None)?;
        }
    }
    if has("TaxPercentage") {
        checker.test_value_range("TaxPercentage", Some(0.0), Some(100.0))?;
    }
    if has("LineNumber") {
        checker.test_value_range("LineNumber", Some(1.0), None)?;
    }

    // --- integridade ---
    let key: Vec<&str> = ["InvoiceDate", "ProductCode", "LineNumber"]
        .into_iter()
        .filter(|c| has(c))
        .collect();
    if !key.is_empty() {
        checker.test_duplicates(&key)?;
        checker.test_primary_key(&key)?;
    }

    // --- conformidade ---
    for col in ["CreditAmount", "Quantity", "UnitPrice"] {
        if has(col) {
            checker.test_positive_values(col)?;
        }
    }
    if has("InvoiceDate") {
        checker.test_valid_dates(
            "InvoiceDate",
            thresholds.min_invoice_date,
            thresholds.future_horizon_days,
        )?;
    }

    // --- negócio ---
    if has("Quantity") && has("UnitPrice") && has("CreditAmount") {
        checker.test_consistent_billing(
            "Quantity",
            "UnitPrice",
            "CreditAmount",
            thresholds.billing_tolerance,
        )?;
    }

    Ok(checker)
}

// saftq-core/src/domain/schema.rs
//
// Static schema descriptor for the SAF-T invoice-line export.
// Logical field names map to declared semantic types; presence of the
// required set is validated once at extraction time so that a renamed or
// missing column fails early instead of at an arbitrary later stage.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::table::{Table, Value};

/// Declared semantic type of a schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Date,
    Number,
    Int,
    Text,
}

/// What to do with a cell that fails type coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercePolicy {
    /// Drop the whole row.
    DropRow,
    /// Keep the row, replace the offending cell with null.
    #[default]
    Nullify,
}

pub struct FieldSpec {
    pub name: &'static str,
    pub dtype: SemanticType,
    pub required: bool,
}

/// The fixed SAF-T invoice-line column set.
pub const SAFT_SCHEMA: &[FieldSpec] = &[
    FieldSpec { name: "InvoiceDate", dtype: SemanticType::Date, required: true },
    FieldSpec { name: "ProductCode", dtype: SemanticType::Text, required: true },
    FieldSpec { name: "ProductDescription", dtype: SemanticType::Text, required: true },
    FieldSpec { name: "Quantity", dtype: SemanticType::Number, required: true },
    FieldSpec { name: "UnitPrice", dtype: SemanticType::Number, required: true },
    FieldSpec { name: "CreditAmount", dtype: SemanticType::Number, required: true },
    FieldSpec { name: "LineNumber", dtype: SemanticType::Int, required: true },
    FieldSpec { name: "TaxPercentage", dtype: SemanticType::Number, required: true },
];

pub fn field(name: &str) -> Option<&'static FieldSpec> {
    SAFT_SCHEMA.iter().find(|f| f.name == name)
}

// SAF-T exports echo XML namespace prefixes ("ns1:InvoiceDate") into the
// spreadsheet headers.
static XML_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // literal pattern
    Regex::new(r"^ns\d+:").unwrap()
});

/// Strip a leading XML namespace prefix from a header name, if present.
pub fn normalize_header(name: &str) -> String {
    XML_PREFIX.replace(name, "").into_owned()
}

/// Check that every required schema column is present, tolerating XML
/// namespace prefixes on the raw headers.
pub fn validate_required(table: &Table) -> Result<(), DomainError> {
    let normalized: Vec<String> = table.columns().iter().map(|c| normalize_header(c)).collect();
    for spec in SAFT_SCHEMA.iter().filter(|f| f.required) {
        if !normalized.iter().any(|c| c == spec.name) {
            return Err(DomainError::ColumnNotFound {
                column: spec.name.to_string(),
                available: table.columns().join(", "),
            });
        }
    }
    Ok(())
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

// Spreadsheet serial day 1 is 1899-12-31; day 60 is the fictitious
// 1900-02-29, hence the conventional 1899-12-30 epoch.
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None; // out of the representable 1900..9999 window
    }
    let (y, m, d) = EXCEL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(chrono::Days::new(serial as u64))
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    None
}

impl SemanticType {
    /// Coerce a cell to this type. `None` means the value cannot be
    /// represented and the pipeline's `CoercePolicy` decides its fate.
    /// Nulls pass through untouched.
    pub fn coerce(&self, value: &Value) -> Option<Value> {
        match (self, value) {
            (_, Value::Null) => Some(Value::Null),
            (SemanticType::Date, Value::Date(d)) => Some(Value::Date(*d)),
            (SemanticType::Date, Value::Text(s)) => parse_date_text(s).map(Value::Date),
            (SemanticType::Date, Value::Number(n)) => excel_serial_to_date(*n).map(Value::Date),
            (SemanticType::Date, Value::Int(i)) => excel_serial_to_date(*i as f64).map(Value::Date),
            (SemanticType::Number, Value::Number(n)) => Some(Value::Number(*n)),
            (SemanticType::Number, Value::Int(i)) => Some(Value::Number(*i as f64)),
            (SemanticType::Number, Value::Text(s)) => {
                s.trim().parse::<f64>().ok().map(Value::Number)
            }
            (SemanticType::Int, Value::Int(i)) => Some(Value::Int(*i)),
            (SemanticType::Int, Value::Number(n)) if n.fract() == 0.0 => Some(Value::Int(*n as i64)),
            (SemanticType::Int, Value::Text(s)) => s.trim().parse::<i64>().ok().map(Value::Int),
            (SemanticType::Text, Value::Text(s)) => Some(Value::Text(s.clone())),
            // Text columns accept whatever landed in them; stringifying codes
            // read as numbers keeps ProductCode comparable after round-trips.
            (SemanticType::Text, other) => Some(Value::Text(other.render())),
            _ => None,
        }
    }

    /// Whether a cell already carries this declared type (nulls count).
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (SemanticType::Date, Value::Date(_))
                | (SemanticType::Number, Value::Number(_))
                | (SemanticType::Int, Value::Int(_))
                | (SemanticType::Text, Value::Text(_))
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header_strips_namespace() {
        assert_eq!(normalize_header("ns1:InvoiceDate"), "InvoiceDate");
        assert_eq!(normalize_header("ns12:Quantity"), "Quantity");
        assert_eq!(normalize_header("InvoiceDate"), "InvoiceDate");
        // Only a leading token is a namespace prefix.
        assert_eq!(normalize_header("Codens1:x"), "Codens1:x");
    }

    #[test]
    fn test_coerce_date_from_text_and_serial() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(
            SemanticType::Date.coerce(&Value::Text("2024-03-15".into())),
            Some(Value::Date(expected))
        );
        assert_eq!(
            SemanticType::Date.coerce(&Value::Text("15/03/2024".into())),
            Some(Value::Date(expected))
        );
        // 2024-03-15 is serial 45366.
        assert_eq!(
            SemanticType::Date.coerce(&Value::Number(45366.0)),
            Some(Value::Date(expected))
        );
        assert_eq!(SemanticType::Date.coerce(&Value::Text("not a date".into())), None);
    }

    #[test]
    fn test_coerce_number_and_int() {
        assert_eq!(
            SemanticType::Number.coerce(&Value::Text(" 3.25 ".into())),
            Some(Value::Number(3.25))
        );
        assert_eq!(SemanticType::Int.coerce(&Value::Number(7.0)), Some(Value::Int(7)));
        assert_eq!(SemanticType::Int.coerce(&Value::Number(7.5)), None);
        assert_eq!(SemanticType::Number.coerce(&Value::Date(NaiveDate::MIN)), None);
    }

    #[test]
    fn test_null_passes_through_every_type() {
        for dtype in [SemanticType::Date, SemanticType::Number, SemanticType::Int, SemanticType::Text] {
            assert_eq!(dtype.coerce(&Value::Null), Some(Value::Null));
            assert!(dtype.matches(&Value::Null));
        }
    }

    #[test]
    fn test_validate_required_tolerates_prefixes() {
        let cols: Vec<String> = SAFT_SCHEMA.iter().map(|f| format!("ns1:{}", f.name)).collect();
        let table = Table::new(cols, vec![]).unwrap();
        assert!(validate_required(&table).is_ok());

        let table = Table::new(vec!["InvoiceDate".into()], vec![]).unwrap();
        let err = validate_required(&table).unwrap_err();
        assert!(matches!(err, DomainError::ColumnNotFound { .. }));
    }
}

// saftq-core/src/domain/table.rs
//
// In-memory tabular store: one header row plus a rectangular body.
// Every other component reads or rebuilds this structure; rows are never
// mutated in place across stages.

use chrono::NaiveDate;

use crate::domain::error::DomainError;

/// A single cell of the tabular store.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Number(f64),
    Int(i64),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view over `Number` and `Int` cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Render for delimited/spreadsheet output. Nulls become empty cells.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Text(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Hashable stand-in for `Value`, used for exact-duplicate detection.
/// f64 cells are compared by bit pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey {
    Null,
    Text(String),
    Number(u64),
    Int(i64),
    Date(NaiveDate),
}

impl Value {
    pub(crate) fn dedup_key(&self) -> ValueKey {
        match self {
            Value::Null => ValueKey::Null,
            Value::Text(s) => ValueKey::Text(s.clone()),
            Value::Number(n) => ValueKey::Number(n.to_bits()),
            Value::Int(i) => ValueKey::Int(*i),
            Value::Date(d) => ValueKey::Date(*d),
        }
    }
}

/// The tabular store proper.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table, enforcing a rectangular body up front.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, DomainError> {
        let width = columns.len();
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(DomainError::RaggedRow {
                    row: idx + 1,
                    found: row.len(),
                    expected: width,
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Physical index of a named column. Missing columns are a configuration
    /// mismatch, not a data-quality issue.
    pub fn column_index(&self, name: &str) -> Result<usize, DomainError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DomainError::ColumnNotFound {
                column: name.to_string(),
                available: self.columns.join(", "),
            })
    }

    /// Iterate the cells of a named column, top to bottom.
    pub fn column_values(&self, name: &str) -> Result<impl Iterator<Item = &Value>, DomainError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Fraction of null cells in a column, in [0, 1]. Empty tables count as 0.
    pub fn null_fraction(&self, idx: usize) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        let nulls = self.rows.iter().filter(|row| row[idx].is_null()).count();
        nulls as f64 / self.rows.len() as f64
    }

    /// Rewrite header names through `f` (used for XML prefix stripping).
    pub fn rename_columns<F: Fn(&str) -> String>(&mut self, f: F) {
        for col in &mut self.columns {
            *col = f(col);
        }
    }

    /// Keep only rows matching the predicate; returns the number removed.
    pub fn retain_rows<F: FnMut(&[Value]) -> bool>(&mut self, mut pred: F) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| pred(row));
        before - self.rows.len()
    }

    /// Drop the columns at the given physical indices.
    pub fn drop_columns(&mut self, indices: &[usize]) {
        let mut keep: Vec<bool> = vec![true; self.columns.len()];
        for &i in indices {
            if i < keep.len() {
                keep[i] = false;
            }
        }
        self.columns = std::mem::take(&mut self.columns)
            .into_iter()
            .zip(keep.iter())
            .filter_map(|(c, &k)| k.then_some(c))
            .collect();
        self.rows = std::mem::take(&mut self.rows)
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(keep.iter())
                    .filter_map(|(v, &k)| k.then_some(v))
                    .collect()
            })
            .collect();
    }

    /// Replace the body wholesale (pipeline stages rebuild rather than patch).
    pub fn with_rows(&self, rows: Vec<Vec<Value>>) -> Result<Self, DomainError> {
        Table::new(self.columns.clone(), rows)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["a".into(), "b".into()],
            vec![
                vec![Value::Int(1), Value::Text("x".into())],
                vec![Value::Null, Value::Text("y".into())],
                vec![Value::Int(3), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![Value::Int(1)]],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::RaggedRow { row: 1, found: 1, expected: 2 }));
    }

    #[test]
    fn test_column_lookup() {
        let t = sample();
        assert_eq!(t.column_index("b").unwrap(), 1);
        let err = t.column_index("missing").unwrap_err();
        assert!(matches!(err, DomainError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_null_fraction() {
        let t = sample();
        let a = t.column_index("a").unwrap();
        assert!((t.null_fraction(a) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_retain_rows_counts_removed() {
        let mut t = sample();
        let removed = t.retain_rows(|row| !row[0].is_null());
        assert_eq!(removed, 1);
        assert_eq!(t.row_count(), 2);
    }

    #[test]
    fn test_drop_columns() {
        let mut t = sample();
        t.drop_columns(&[0]);
        assert_eq!(t.columns(), &["b".to_string()]);
        assert_eq!(t.rows()[0].len(), 1);
    }

    #[test]
    fn test_dedup_key_distinguishes_types() {
        assert_ne!(Value::Int(1).dedup_key(), Value::Number(1.0).dedup_key());
        assert_eq!(Value::Number(2.5).dedup_key(), Value::Number(2.5).dedup_key());
    }
}

// saftq-core/src/infrastructure/io/mod.rs
//
// Table readers and writers, dispatched on file extension. Each call opens
// and releases its file handle within the call; no handles outlive a stage.

pub mod csv;
pub mod xlsx;

use std::path::Path;

use crate::domain::table::Table;
use crate::infrastructure::error::InfrastructureError;

/// Supported on-disk table encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Xlsx,
    Csv,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, InfrastructureError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" => Ok(TableFormat::Xlsx),
            "csv" => Ok(TableFormat::Csv),
            other => Err(InfrastructureError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Load a table from disk. The first sheet (xlsx) or the whole file (csv)
/// must start with a header row.
pub fn read_table(path: &Path) -> Result<Table, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::SourceNotFound(path.to_path_buf()));
    }
    match TableFormat::from_path(path)? {
        TableFormat::Xlsx => xlsx::read(path),
        TableFormat::Csv => csv::read(path),
    }
}

/// Write a table to disk, format selected by the destination extension.
pub fn write_table(table: &Table, path: &Path) -> Result<(), InfrastructureError> {
    match TableFormat::from_path(path)? {
        TableFormat::Xlsx => xlsx::write(table, path),
        TableFormat::Csv => csv::write(table, path),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            TableFormat::from_path(Path::new("out.XLSX")).ok(),
            Some(TableFormat::Xlsx)
        );
        assert_eq!(
            TableFormat::from_path(Path::new("out.csv")).ok(),
            Some(TableFormat::Csv)
        );
        assert!(matches!(
            TableFormat::from_path(Path::new("out.parquet")),
            Err(InfrastructureError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_read_missing_source() {
        let err = read_table(&PathBuf::from("/nonexistent/input.xlsx")).unwrap_err();
        assert!(matches!(err, InfrastructureError::SourceNotFound(_)));
    }
}

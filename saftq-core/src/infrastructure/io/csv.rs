// saftq-core/src/infrastructure/io/csv.rs
//
// Delimited-text adapter. Cells come back untyped (Text or Null); the
// pipeline's convert_types stage applies the schema's declared types.

use std::path::Path;

use crate::domain::table::{Table, Value};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

pub fn read(path: &Path) -> Result<Table, InfrastructureError> {
    let format_err = |reason: String| InfrastructureError::SourceFormat {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .from_path(path)
        .map_err(|e| format_err(e.to_string()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| format_err(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format_err(e.to_string()))?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        Value::Null
                    } else {
                        Value::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Table::new(headers, rows).map_err(|e| format_err(e.to_string()))
}

pub fn write(table: &Table, path: &Path) -> Result<(), InfrastructureError> {
    let export_err = |reason: String| InfrastructureError::Export {
        path: path.to_path_buf(),
        reason,
    };

    // Serialize in memory, then atomic rename; a failed export must not
    // leave a truncated file where the dashboard expects data.
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns())
        .map_err(|e| export_err(e.to_string()))?;
    for row in table.rows() {
        let record: Vec<String> = row.iter().map(Value::render).collect();
        writer
            .write_record(&record)
            .map_err(|e| export_err(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| export_err(e.to_string()))?;
    atomic_write(path, bytes)?;
    Ok(())
}

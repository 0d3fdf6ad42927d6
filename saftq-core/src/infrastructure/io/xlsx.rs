// saftq-core/src/infrastructure/io/xlsx.rs
//
// Spreadsheet adapter: calamine for reading, rust_xlsxwriter for writing.
// Only the first worksheet is materialized; additional sheets (product
// catalog, precomputed summaries) are reference data the pipeline ignores.

use std::path::Path;

use calamine::{Data, DataType, Reader, open_workbook_auto};
use rust_xlsxwriter::Workbook;

use crate::domain::schema::excel_serial_to_date;
use crate::domain::table::{Table, Value};
use crate::infrastructure::error::InfrastructureError;

fn cell_to_value(cell: &Data) -> Value {
    if cell.is_empty() {
        Value::Null
    } else if cell.is_int() {
        cell.as_i64().map(Value::Int).unwrap_or(Value::Null)
    } else if cell.is_float() {
        cell.as_f64().map(Value::Number).unwrap_or(Value::Null)
    } else if cell.is_datetime() {
        cell.get_datetime()
            .and_then(|dt| excel_serial_to_date(dt.as_f64()))
            .map(Value::Date)
            .unwrap_or(Value::Null)
    } else if cell.is_string() {
        match cell.as_string() {
            Some(s) if !s.trim().is_empty() => Value::Text(s),
            _ => Value::Null,
        }
    } else {
        // Bool and error cells have no SAF-T meaning; echo them as text so
        // the quality checks can still count them as type mismatches.
        cell.as_string().map(Value::Text).unwrap_or(Value::Null)
    }
}

pub fn read(path: &Path) -> Result<Table, InfrastructureError> {
    let format_err = |reason: String| InfrastructureError::SourceFormat {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| format_err(e.to_string()))?;
    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| format_err("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| format_err(e.to_string()))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .ok_or_else(|| format_err(format!("sheet '{first_sheet}' is empty")))?
        .iter()
        .map(|c| c.as_string().unwrap_or_default())
        .collect();

    let body: Vec<Vec<Value>> = rows_iter
        .map(|row| {
            let mut cells: Vec<Value> = row.iter().map(cell_to_value).collect();
            // calamine trims trailing empties on ragged sheets
            cells.resize(headers.len(), Value::Null);
            cells.truncate(headers.len());
            cells
        })
        .collect();

    Table::new(headers, body).map_err(|e| format_err(e.to_string()))
}

pub fn write(table: &Table, path: &Path) -> Result<(), InfrastructureError> {
    let export_err = |reason: String| InfrastructureError::Export {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        worksheet
            .write_string(0, col as u16, name.as_str())
            .map_err(|e| export_err(e.to_string()))?;
    }
    for (r, row) in table.rows().iter().enumerate() {
        let excel_row = (r + 1) as u32;
        for (c, value) in row.iter().enumerate() {
            let col = c as u16;
            match value {
                Value::Null => {}
                Value::Number(n) => {
                    worksheet
                        .write_number(excel_row, col, *n)
                        .map_err(|e| export_err(e.to_string()))?;
                }
                Value::Int(i) => {
                    worksheet
                        .write_number(excel_row, col, *i as f64)
                        .map_err(|e| export_err(e.to_string()))?;
                }
                // Dates and text ship as ISO strings; extract() re-coerces.
                other => {
                    worksheet
                        .write_string(excel_row, col, other.render())
                        .map_err(|e| export_err(e.to_string()))?;
                }
            }
        }
    }

    workbook.save(path).map_err(|e| export_err(e.to_string()))?;
    Ok(())
}

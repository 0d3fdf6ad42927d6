// saftq-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Column '{column}' not found in table")]
    #[diagnostic(
        code(saftq::domain::column_not_found),
        help("Available columns: [{available}]. Check the source file headers or the check configuration.")
    )]
    ColumnNotFound { column: String, available: String },

    #[error("Row {row} has {found} cells, expected {expected}")]
    #[diagnostic(code(saftq::domain::ragged_row))]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("No quality checks were executed, nothing to report")]
    #[diagnostic(
        code(saftq::domain::empty_report),
        help("Run at least one test_* method before generate_report().")
    )]
    EmptyReport,
}

// saftq-core/src/infrastructure/error.rs

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- SOURCE FILES ---
    #[error("Source file not found: '{0}'")]
    #[diagnostic(
        code(saftq::infra::source_not_found),
        help("Pass an explicit input path; saftq never scans directories.")
    )]
    SourceNotFound(PathBuf),

    #[error("Unparseable source '{path}': {reason}")]
    #[diagnostic(
        code(saftq::infra::source_format),
        help("The file exists but is not a readable spreadsheet or CSV.")
    )]
    SourceFormat { path: PathBuf, reason: String },

    #[error("Unsupported table format: '{0}'")]
    #[diagnostic(
        code(saftq::infra::unsupported_format),
        help("Supported extensions: .xlsx, .csv")
    )]
    UnsupportedFormat(String),

    // --- EXPORT ---
    #[error("Export failed for '{path}': {reason}")]
    #[diagnostic(code(saftq::infra::export))]
    Export { path: PathBuf, reason: String },

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(saftq::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(saftq::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON Serialization Error: {0}")]
    #[diagnostic(code(saftq::infra::json))]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),
}

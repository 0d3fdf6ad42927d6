// saftq-core/src/domain/quality/result.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Check family, using the SAF-T audit vocabulary of the source reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "completude")]
    Completude,
    #[serde(rename = "consistência")]
    Consistencia,
    #[serde(rename = "integridade")]
    Integridade,
    #[serde(rename = "conformidade")]
    Conformidade,
    #[serde(rename = "negócio")]
    Negocio,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Completude,
        Category::Consistencia,
        Category::Integridade,
        Category::Conformidade,
        Category::Negocio,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Completude => "completude",
            Category::Consistencia => "consistência",
            Category::Integridade => "integridade",
            Category::Conformidade => "conformidade",
            Category::Negocio => "negócio",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One executed check. Write-once: built by the checker, read by the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityResult {
    pub name: String,
    pub category: Category,
    pub passed: bool,
    pub message: String,
    /// Measured metric quantifying severity (null pct, violation count, ...).
    pub metric: f64,
}

impl QualityResult {
    pub fn pass(name: impl Into<String>, category: Category, message: impl Into<String>, metric: f64) -> Self {
        Self {
            name: name.into(),
            category,
            passed: true,
            message: message.into(),
            metric,
        }
    }

    pub fn fail(name: impl Into<String>, category: Category, message: impl Into<String>, metric: f64) -> Self {
        Self {
            name: name.into(),
            category,
            passed: false,
            message: message.into(),
            metric,
        }
    }
}

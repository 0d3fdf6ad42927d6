pub mod checker;
pub mod report;
pub mod result;

pub use checker::QualityChecker;
pub use report::{QualityReport, status_label};
pub use result::{Category, QualityResult};

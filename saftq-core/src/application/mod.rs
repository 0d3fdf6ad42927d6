// saftq-core/src/application/mod.rs

pub mod battery;
pub mod orchestrator;
pub mod pipeline;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Cela permet au CLI de faire :
// `use saftq_core::application::{run, EtlPipeline, run_standard_checks};`
// sans avoir à connaître la structure interne des fichiers.

pub use battery::run_standard_checks;
pub use orchestrator::{RunConfig, RunOutcome, run};
pub use pipeline::{EtlPipeline, PipelineSummary, StageCount};

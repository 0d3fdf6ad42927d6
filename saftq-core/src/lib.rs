// saftq-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)] // On autorise le manque de doc pour le moment

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Domain (Cœur du métier)
// Tabular store, SAF-T schema, quality checks, report.
// Ne dépend de RIEN d'autre (ni infra, ni app).
pub mod domain;

// 2. Infrastructure (Adapters)
// Implémentation technique (xlsx/csv readers & writers, config files)
// Dépend du Domain.
pub mod infrastructure;

// 3. Application (Use Cases)
// Orchestration (ETL pipeline, standard check battery, full run)
// Dépend du Domain et de l'Infra.
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// Permet d'importer l'erreur principale facilement : use saftq_core::SaftError;
pub use error::SaftError;

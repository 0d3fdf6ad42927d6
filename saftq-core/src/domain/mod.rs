pub mod error;
pub mod quality;
pub mod schema;
pub mod table;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;
pub use schema::{CoercePolicy, SemanticType};
pub use table::{Table, Value};

pub mod language;
pub mod tracing;

pub use language::culture_middleware;
pub use tracing::observability_middleware;

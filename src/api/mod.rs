pub mod middleware;
pub mod routes;
pub mod sse;

// Re-export for convenience
pub use crate::infrastructure::app_state::AppState;

// Public API - what other modules can use
pub use cleanup_task::{run_sweep, start_sweep_task};
pub use middleware::require_session;
pub use models::{Credential, NewSession, SessionModel};
pub use repository::{InMemorySessionRepository, SessionRepository};
pub use types::{SessionConfig, SessionStats};

// Internal modules
mod cleanup_task;
pub mod clock;
pub mod cookie;
pub mod generators;
mod middleware;
pub mod models;
pub mod repository;
pub mod types;

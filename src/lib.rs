// Library crate for the Tradovate proxy
// This file exposes the public API for integration tests

pub mod config;
pub mod proxy;
pub mod session;
pub mod shared;
pub mod tradovate;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use proxy::router;
pub use session::{
    InMemorySessionRepository, NewSession, SessionModel, SessionRepository, SessionStats,
};
pub use shared::{AppError, AppState};
pub use tradovate::{TradovateApi, TradovateClient};

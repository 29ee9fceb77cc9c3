pub mod assertions;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::{body_json, session_cookie_from};
#[allow(unused_imports)]
pub use mocks::{MockTradovateApi, SECRET_TOKEN_PREFIX};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};

// Library exports; the binary's CLI is built on these.

// Typed HTTP client for the registry admin API
pub mod api;

// Subscriber setup
pub mod logging;

// Text output for package listings and deletion plans
pub mod render;

// App state (configuration, paths)
pub mod state;

pub use api::{ApiClient, ApiError, Endpoints};
pub use state::{AppConfig, AppState, StateError};

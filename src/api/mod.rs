//! HTTP API module.
//!
//! Login/logout endpoints, session introspection and the demo pages, all
//! behind the access gate.

mod handlers;
mod pages;
mod routes;
mod state;

pub use handlers::{HealthResponse, LoginResponse, SessionInfo};
pub use routes::create_router;
pub use state::AppState;

//! Axum HTTP surface for the session security endpoints.
//!
//! Thin layer over the actions: handlers deserialize requests, run the
//! matching action, and translate `AuthError` to coarse status codes.
//! Authorization detail never reaches the response body.

mod error;
mod handlers;
mod middleware;
mod routes;
mod types;

pub use error::AppError;
pub use middleware::{extract_bearer_token, CurrentClaims};
pub use routes::{security_routes, AppState};
pub use types::*;

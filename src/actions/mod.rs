//! Action objects implementing the security operations.
//!
//! Each action owns the repositories it needs and exposes a single
//! `execute` method, instrumented for tracing. Handlers construct actions
//! from application state and translate errors to HTTP responses; the
//! actions themselves never see the transport.

mod force_logout;
mod heartbeat;
mod login;
mod refresh_context;
mod revoke_all;
mod rotate_token;

pub use force_logout::ForceLogoutAction;
pub use heartbeat::HeartbeatAction;
pub use login::{LoginAction, LoginOutput};
pub use refresh_context::{RefreshContextAction, RefreshContextOutput};
pub use revoke_all::RevokeAllTokensAction;
pub use rotate_token::RotateTokenAction;

//! Role-hierarchy access control.
//!
//! Each protected operation declares an [`AccessPolicy`] value and a single
//! [`evaluate`] function is invoked uniformly, instead of scattering checks
//! across handlers. Every denial is typed for audit logging; clients only
//! ever see coarse 401/403 responses.

mod evaluator;
mod policy;

pub use evaluator::{evaluate, evaluate_audited, AccessDenied, AccessGrant, DenyReason};
pub use policy::{AccessPolicy, TeamPolicy};

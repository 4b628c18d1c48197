//! Client liveness state machine.
//!
//! Models the idle-timeout and heartbeat tracking a browser client runs per
//! tab: warn before the idle timeout, log out when it elapses or when too
//! many heartbeats fail in a row, and fan the logout out to sibling tabs so
//! none keeps heartbeating with cleared credentials.
//!
//! Time is injected through [`Clock`], so every timing rule is testable
//! with virtual time instead of sleeps.

mod clock;
mod controller;
mod credentials;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::LivenessController;
pub use credentials::{CredentialStore, InMemoryCredentialStore};

use std::fmt;

/// Where the controller currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessState {
    /// Session is live; activity and heartbeats proceed normally.
    Active,
    /// Idle warning is showing. Only an explicit continue returns to
    /// `Active`; passive activity is ignored.
    Warning,
    /// Terminal for this client instance.
    LoggedOut(LogoutReason),
}

/// Why a client was logged out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    IdleTimeout,
    HeartbeatFailures,
    RevalidationFailed,
    ForcedLogout,
    SignedInElsewhere,
    UserInitiated,
}

impl LogoutReason {
    /// Short, generic string shown to the user. Security detail stays in
    /// the server-side audit trail.
    pub fn user_message(&self) -> &'static str {
        match self {
            LogoutReason::IdleTimeout => "You were signed out due to inactivity",
            LogoutReason::HeartbeatFailures => "Your session could not be verified",
            LogoutReason::RevalidationFailed => "Your session could not be verified",
            LogoutReason::ForcedLogout => "Your session was ended by an administrator",
            LogoutReason::SignedInElsewhere => "You signed in on another device",
            LogoutReason::UserInitiated => "You signed out",
        }
    }
}

impl fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

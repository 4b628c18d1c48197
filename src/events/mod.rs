//! Security event system.
//!
//! Events are fired whenever a session is opened, rejected, revoked, or
//! forcibly terminated, and whenever an audited policy evaluation denies a
//! caller. If no listeners are registered they are silently ignored. Denial
//! reasons live here for audit; they are never forwarded to clients.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use teamgate::register_event_listeners;
//! use teamgate::events::listeners::TracingListener;
//!
//! fn main() {
//!     register_event_listeners(|registry| {
//!         registry.listen(TracingListener);
//!     });
//!
//!     // start server...
//! }
//! ```

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::SecurityEvent;
pub use listener::Listener;
pub use registry::{dispatch, register_event_listeners, EventRegistry};

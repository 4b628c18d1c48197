//! Built-in event listeners.

mod logging;
mod tracing;

pub use logging::LoggingListener;
pub use tracing::TracingListener;

//! Configuration types for the teamgate security core.
//!
//! This module provides centralized configuration for token lifetimes,
//! session liveness, client idle handling, and tenant resolution caching.
//!
//! # Example
//!
//! ```rust
//! use teamgate::config::{TeamgateConfig, TokenConfig};
//! use chrono::Duration;
//!
//! // Use defaults
//! let config = TeamgateConfig::default();
//!
//! // Or customize
//! let config = TeamgateConfig {
//!     tokens: TokenConfig {
//!         access_token_expiry: Duration::minutes(30),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! ```

use chrono::Duration;

/// Main configuration struct for the teamgate security core.
///
/// Use `TeamgateConfig::default()` for sensible production defaults.
#[derive(Debug, Clone, Default)]
pub struct TeamgateConfig {
    /// Token lifetime settings.
    pub tokens: TokenConfig,

    /// Server-side session settings.
    pub session: SessionConfig,

    /// Client-side liveness settings.
    pub liveness: LivenessConfig,

    /// Tenant resolution settings.
    pub resolver: ResolverConfig,
}

impl TeamgateConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration with stricter security settings.
    ///
    /// Shorter token lifetimes, a tighter idle window, and fewer tolerated
    /// heartbeat misses.
    pub fn strict() -> Self {
        Self {
            tokens: TokenConfig {
                access_token_expiry: Duration::minutes(15),
                refresh_token_expiry: Duration::days(1),
            },
            session: SessionConfig {
                heartbeat_interval: Duration::seconds(60),
                max_missed_heartbeats: 3,
                ..Default::default()
            },
            liveness: LivenessConfig {
                idle_timeout: Duration::seconds(180),
                warning_window: Duration::seconds(30),
                ..Default::default()
            },
            resolver: ResolverConfig::default(),
        }
    }
}

/// Configuration for token lifetimes.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// How long access tokens remain valid after issuance.
    ///
    /// Default: 60 minutes
    pub access_token_expiry: Duration,

    /// How long refresh tokens remain valid.
    ///
    /// Default: 7 days
    pub refresh_token_expiry: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_token_expiry: Duration::minutes(60),
            refresh_token_expiry: Duration::days(7),
        }
    }
}

/// Configuration for server-side device sessions.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum stored length of a client fingerprint, in characters.
    ///
    /// Default: 2000
    pub max_fingerprint_length: usize,

    /// How often authenticated clients are expected to heartbeat.
    ///
    /// Default: 90 seconds
    pub heartbeat_interval: Duration,

    /// Consecutive heartbeat failures tolerated before the client must
    /// log itself out.
    ///
    /// Default: 5
    pub max_missed_heartbeats: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_fingerprint_length: 2000,
            heartbeat_interval: Duration::seconds(90),
            max_missed_heartbeats: 5,
        }
    }
}

/// Configuration for the client-side idle/warning state machine.
#[derive(Debug, Clone)]
pub struct LivenessConfig {
    /// Total idle time before the client is logged out.
    ///
    /// Default: 5 minutes
    pub idle_timeout: Duration,

    /// Portion of the idle timeout during which the warning is shown.
    /// The warning appears at `idle_timeout - warning_window`.
    ///
    /// Default: 60 seconds
    pub warning_window: Duration,

    /// Minimum interval between activity events that reset the idle timer.
    /// Bursts of mouse/keyboard events reset the timer at most once per
    /// throttle interval.
    ///
    /// Default: 1 second
    pub activity_throttle: Duration,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::minutes(5),
            warning_window: Duration::seconds(60),
            activity_throttle: Duration::seconds(1),
        }
    }
}

/// Configuration for hostname-to-tenant resolution.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Subdomain label reserved for the public marketing site.
    ///
    /// Default: `"www"`
    pub marketing_label: String,

    /// Subdomain label reserved for the platform-admin console.
    ///
    /// Default: `"admin"`
    pub admin_label: String,

    /// How long a positive subdomain lookup is cached.
    ///
    /// Default: 5 minutes
    pub cache_ttl: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            marketing_label: "www".to_owned(),
            admin_label: "admin".to_owned(),
            cache_ttl: Duration::minutes(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TeamgateConfig::default();

        assert_eq!(config.tokens.access_token_expiry, Duration::minutes(60));
        assert_eq!(config.tokens.refresh_token_expiry, Duration::days(7));
        assert_eq!(config.session.max_fingerprint_length, 2000);
        assert_eq!(config.session.heartbeat_interval, Duration::seconds(90));
        assert_eq!(config.session.max_missed_heartbeats, 5);
        assert_eq!(config.liveness.idle_timeout, Duration::minutes(5));
        assert_eq!(config.liveness.warning_window, Duration::seconds(60));
        assert_eq!(config.resolver.cache_ttl, Duration::minutes(5));
    }

    #[test]
    fn test_strict_config() {
        let config = TeamgateConfig::strict();

        assert_eq!(config.tokens.access_token_expiry, Duration::minutes(15));
        assert_eq!(config.session.max_missed_heartbeats, 3);
        assert_eq!(config.liveness.idle_timeout, Duration::seconds(180));
    }

    #[test]
    fn test_warning_precedes_timeout() {
        let config = LivenessConfig::default();
        assert!(config.warning_window < config.idle_timeout);
    }
}

use serde::{Deserialize, Serialize};

/// Length of the user-agent prefix kept in a fingerprint.
///
/// Full user agents are long and churn with every minor browser release;
/// the prefix identifies the browser family and major version.
const USER_AGENT_PREFIX_LEN: usize = 120;

/// Raw client-environment values a fingerprint is derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintParts {
    pub user_agent: String,
    pub language: String,
    pub timezone: String,
    pub screen_size: String,
}

/// A low-entropy descriptor of a client's environment, binding a session to
/// one device. Always truncated to the configured cap before storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Derives a fingerprint from client environment parts.
    pub fn derive(parts: &FingerprintParts, max_length: usize) -> Self {
        let ua_prefix: String = parts.user_agent.chars().take(USER_AGENT_PREFIX_LEN).collect();
        let raw = format!(
            "{}|{}|{}|{}",
            ua_prefix, parts.language, parts.timezone, parts.screen_size
        );
        Self::from_raw(&raw, max_length)
    }

    /// Wraps an already-derived fingerprint string, applying the length cap.
    pub fn from_raw(raw: &str, max_length: usize) -> Self {
        Self(raw.chars().take(max_length).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

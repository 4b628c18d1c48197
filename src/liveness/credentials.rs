use std::sync::{Arc, Mutex};

/// Where the client keeps its tokens between requests.
///
/// The controller only ever clears it; storing happens in the login flow.
pub trait CredentialStore: Send + Sync {
    fn clear(&self);
    fn is_empty(&self) -> bool;
}

/// Credential store backed by process memory.
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    tokens: Arc<Mutex<Option<(String, String)>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, access_token: &str, refresh_token: &str) {
        if let Ok(mut tokens) = self.tokens.lock() {
            *tokens = Some((access_token.to_owned(), refresh_token.to_owned()));
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens
            .lock()
            .ok()
            .and_then(|t| t.as_ref().map(|(a, _)| a.clone()))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn clear(&self) {
        if let Ok(mut tokens) = self.tokens.lock() {
            *tokens = None;
        }
    }

    fn is_empty(&self) -> bool {
        self.tokens.lock().map(|t| t.is_none()).unwrap_or(true)
    }
}

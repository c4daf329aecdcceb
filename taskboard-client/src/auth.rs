//! Bearer token supply for the API client
//!
//! The client never owns a global token. It asks a [`TokenProvider`] on every
//! request, so separate clients (for example in tests) stay isolated unless
//! they are handed the same provider.

use std::sync::{Arc, RwLock};

/// Supplies the bearer token attached to outgoing requests
pub trait TokenProvider: Send + Sync {
    /// The current token, or `None` when signed out
    fn token(&self) -> Option<String>;
}

/// Shared, mutable token slot driven by the login/logout flow.
///
/// Cloning shares the slot.
#[derive(Debug, Clone, Default)]
pub struct AuthToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl AuthToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing token (e.g. from configuration)
    pub fn with_token(token: impl Into<String>) -> Self {
        let auth = Self::new();
        auth.set_auth_token(token);
        auth
    }

    pub fn set_auth_token(&self, token: impl Into<String>) {
        let mut slot = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token.into());
    }

    pub fn clear_auth_token(&self) {
        let mut slot = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }

    pub fn auth_token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token().is_some_and(|t| !t.is_empty())
    }
}

impl TokenProvider for AuthToken {
    fn token(&self) -> Option<String> {
        self.auth_token().filter(|t| !t.is_empty())
    }
}

/// A provider that never yields a token
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl TokenProvider for Anonymous {
    fn token(&self) -> Option<String> {
        None
    }
}

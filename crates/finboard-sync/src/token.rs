//! Shared session token handle.

use std::sync::{Arc, RwLock};

/// A session credential shared between the pull client and push channel.
///
/// Token rotation (refresh) swaps the value in place so that neither
/// transport needs to be torn down; only sign-out ends the session.
#[derive(Debug, Clone)]
pub struct SessionToken {
    inner: Arc<RwLock<String>>,
}

impl SessionToken {
    /// Create a token handle from the initial credential.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(token.into())),
        }
    }

    /// Current credential value.
    pub fn get(&self) -> String {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the credential after a token refresh.
    pub fn rotate(&self, token: impl Into<String>) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = token.into();
    }
}

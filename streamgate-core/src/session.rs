//! Unlock credential held for the lifetime of the process.
//!
//! The gateway is single-tenant: one credential, set through the configure
//! form, shared by every later request. Requests never read the store while
//! resolving; they take a snapshot up front and pass it down explicitly.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Secret authorising use of the unlock service.
#[derive(Clone, PartialEq, Eq)]
pub struct UnlockCredential(String);

impl UnlockCredential {
    /// Wraps a credential, returning `None` for blank input.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Raw secret, for building authorization headers only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UnlockCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UnlockCredential(<redacted>)")
    }
}

/// Process-wide credential slot. Last write wins; nothing survives restart.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Option<UnlockCredential>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an initial credential (from configuration).
    pub fn with_credential(credential: Option<UnlockCredential>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(credential)),
        }
    }

    /// Replaces the stored credential; `None` clears it.
    pub fn set(&self, credential: Option<UnlockCredential>) {
        let configured = credential.is_some();
        *self.inner.write() = credential;
        tracing::info!(configured, "Unlock credential updated");
    }

    /// Read-only copy for one resolution.
    pub fn snapshot(&self) -> Option<UnlockCredential> {
        self.inner.read().clone()
    }

    pub fn is_configured(&self) -> bool {
        self.inner.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_credential_is_rejected() {
        assert!(UnlockCredential::new("").is_none());
        assert!(UnlockCredential::new("   ").is_none());
        assert_eq!(UnlockCredential::new(" key ").unwrap().expose(), "key");
    }

    #[test]
    fn test_debug_output_is_redacted() {
        let credential = UnlockCredential::new("super-secret").unwrap();
        assert!(!format!("{credential:?}").contains("super-secret"));
    }

    #[test]
    fn test_last_write_wins_across_clones() {
        let store = CredentialStore::new();
        let handle = store.clone();
        assert!(!store.is_configured());

        store.set(UnlockCredential::new("first"));
        handle.set(UnlockCredential::new("second"));
        assert_eq!(store.snapshot().unwrap().expose(), "second");

        handle.set(None);
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_writes() {
        let store = CredentialStore::with_credential(UnlockCredential::new("old"));
        let snapshot = store.snapshot();
        store.set(UnlockCredential::new("new"));
        assert_eq!(snapshot.unwrap().expose(), "old");
    }
}

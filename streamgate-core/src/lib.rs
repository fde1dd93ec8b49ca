//! Streamgate Core - stream resolution for the catalog gateway
//!
//! Domain types, the unlock-service seam with its Real-Debrid client, the
//! credential session store, candidate discovery, and the stream resolver
//! that ties them together.

pub mod config;
pub mod content;
pub mod discovery;
pub mod mode;
pub mod resolver;
pub mod session;
pub mod source;
pub mod stream;
pub mod tracing_setup;
pub mod unlock;

// Re-export main types for convenient access
pub use config::GatewayConfig;
pub use content::{ContentId, ContentIdError, ContentTitle, MediaKind};
pub use discovery::{CandidateDiscovery, NoDiscovery, StaticCandidates};
pub use mode::RuntimeMode;
pub use resolver::StreamResolver;
pub use session::{CredentialStore, UnlockCredential};
pub use source::{CandidateSource, FileEntry, InfoHash, SourceError};
pub use stream::StreamDescriptor;
pub use unlock::{RealDebridClient, UnlockError, UnlockService};

/// Errors that can bubble up to callers of the gateway.
///
/// Per-candidate unlock and source failures are absorbed by the resolver;
/// only request preconditions and setup problems surface here.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Invalid request: {0}")]
    Precondition(#[from] ContentIdError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Candidate discovery error: {reason}")]
    Discovery { reason: String },

    #[error("Unlock error: {0}")]
    Unlock(#[from] UnlockError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(self, GatewayError::Precondition(_))
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

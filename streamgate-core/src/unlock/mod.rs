//! Unlock service abstraction.
//!
//! An unlock service turns a peer-to-peer source reference into a directly
//! fetchable locator in three calls: submit, inspect, unrestrict.

pub mod real_debrid;
#[cfg(any(test, feature = "test-utils"))]
pub mod scripted;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

pub use real_debrid::RealDebridClient;
#[cfg(any(test, feature = "test-utils"))]
pub use scripted::{ScriptedUnlockService, UnlockScript};

use crate::session::UnlockCredential;
use crate::source::{CandidateSource, FileEntry};

/// Failures of a single unlock call.
///
/// None of these reach the caller of the resolver; each one degrades the
/// affected candidate to a peer-to-peer fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnlockError {
    #[error("Unlock service unreachable: {reason}")]
    Network { reason: String },

    #[error("Unlock call '{operation}' timed out")]
    Timeout { operation: &'static str },

    #[error("Unlock service rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected unlock service response: {reason}")]
    Parse { reason: String },

    #[error("Source not resolvable yet: {reason}")]
    NotYetResolvable { reason: String },

    #[error("Unlock service returned no locator")]
    EmptyLocator,
}

/// Opaque job identifier returned by submit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File listing and ready locators of a submitted job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobInspection {
    pub files: Vec<FileEntry>,
    /// Locators ready for unrestricting, in service order
    pub links: Vec<String>,
}

/// Remote service that converts source references into direct locators.
#[async_trait]
pub trait UnlockService: Send + Sync + fmt::Debug {
    /// Registers the candidate's source reference and returns a job id.
    ///
    /// # Errors
    /// - `UnlockError::Rejected` - Service refused the reference
    /// - `UnlockError::Network` - Transport failure
    async fn submit(
        &self,
        credential: &UnlockCredential,
        source: &CandidateSource,
    ) -> Result<JobId, UnlockError>;

    /// Fetches the job's file listing and ready locators.
    ///
    /// # Errors
    /// - `UnlockError::Rejected` - Unknown job or refused credential
    /// - `UnlockError::Network` - Transport failure
    async fn inspect(
        &self,
        credential: &UnlockCredential,
        job: &JobId,
    ) -> Result<JobInspection, UnlockError>;

    /// Exchanges a ready locator for the final direct locator.
    ///
    /// # Errors
    /// - `UnlockError::EmptyLocator` - Service answered without a locator
    /// - `UnlockError::Network` - Transport failure
    async fn unrestrict(
        &self,
        credential: &UnlockCredential,
        link: &str,
    ) -> Result<String, UnlockError>;
}

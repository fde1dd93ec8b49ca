//! Per-candidate decision between direct, peer-to-peer and dropped.

use crate::content::ContentTitle;
use crate::source::{CandidateSource, InfoHash, SourceError};
use crate::stream::StreamDescriptor;
use crate::unlock::UnlockError;

/// File unlocked through the unlock service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockedFile {
    /// Selected file name, path stripped
    pub file_name: String,
    pub url: String,
}

/// Result of the unlock step for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockAttempt {
    /// No credential; unlock was not attempted
    Skipped,
    Unlocked(UnlockedFile),
    Failed(UnlockError),
}

/// Why a candidate contributes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    MalformedSource(SourceError),
}

/// What a single candidate contributes to the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    Direct(UnlockedFile),
    PeerToPeer(InfoHash),
    Dropped(DropReason),
}

impl CandidateOutcome {
    /// Short name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Direct(_) => "direct",
            Self::PeerToPeer(_) => "peer_to_peer",
            Self::Dropped(_) => "dropped",
        }
    }

    /// Renders the outcome as a stream, if it contributes one.
    pub fn into_descriptor(
        self,
        content: &ContentTitle,
        candidate: &CandidateSource,
    ) -> Option<StreamDescriptor> {
        match self {
            Self::Direct(file) => Some(StreamDescriptor::direct(
                &content.display,
                &file.file_name,
                file.url,
            )),
            Self::PeerToPeer(info_hash) => Some(StreamDescriptor::peer_to_peer(
                &content.display,
                &candidate.label,
                info_hash,
                candidate.reference.clone(),
            )),
            Self::Dropped(_) => None,
        }
    }
}

/// Decides a candidate's outcome from its unlock attempt.
///
/// A successful unlock always wins. Anything else falls back to the
/// candidate's hash, which must match the fixed hex pattern to be played
/// peer-to-peer.
pub fn decide(candidate: &CandidateSource, attempt: UnlockAttempt) -> CandidateOutcome {
    if let UnlockAttempt::Unlocked(file) = attempt {
        return CandidateOutcome::Direct(file);
    }

    match candidate.info_hash() {
        Ok(info_hash) => CandidateOutcome::PeerToPeer(info_hash),
        Err(e) => CandidateOutcome::Dropped(DropReason::MalformedSource(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "0123456789abcdef0123456789abcdef01234567";

    fn unlocked() -> UnlockAttempt {
        UnlockAttempt::Unlocked(UnlockedFile {
            file_name: "movie.mkv".to_string(),
            url: "https://cdn/movie.mkv".to_string(),
        })
    }

    #[test]
    fn test_skipped_unlock_with_valid_hash_is_peer_to_peer() {
        let candidate = CandidateSource::new(HASH, "label", "magnet:?xt=urn:btih:x");
        assert!(matches!(
            decide(&candidate, UnlockAttempt::Skipped),
            CandidateOutcome::PeerToPeer(_)
        ));
    }

    #[test]
    fn test_malformed_hash_is_dropped() {
        let candidate = CandidateSource::new("nope", "label", "magnet:?xt=urn:btih:nope");
        let outcome = decide(&candidate, UnlockAttempt::Skipped);
        assert_eq!(outcome.kind(), "dropped");
        assert!(
            outcome
                .into_descriptor(
                    &ContentTitle::fallback(crate::ContentId::parse("tt1").unwrap()),
                    &candidate
                )
                .is_none()
        );
    }

    #[test]
    fn test_failed_unlock_falls_back_to_peer_to_peer() {
        let candidate = CandidateSource::new(HASH, "label", "magnet:?xt=urn:btih:x");
        let outcome = decide(&candidate, UnlockAttempt::Failed(UnlockError::EmptyLocator));
        assert_eq!(outcome.kind(), "peer_to_peer");
    }

    #[test]
    fn test_unlock_success_wins_even_with_malformed_hash() {
        let candidate = CandidateSource::new("nope", "label", "magnet:?xt=urn:btih:nope");
        assert_eq!(decide(&candidate, unlocked()).kind(), "direct");
    }
}

//! Stream resolution: candidate sources in, playable streams out.
//!
//! Each candidate is resolved independently. With a credential the unlock
//! service is tried first; any failure there degrades the candidate to a
//! peer-to-peer stream, or drops it when its hash is malformed. Per-candidate
//! failures never reach the caller.

pub mod decision;
pub mod selection;

use std::future::Future;
use std::sync::Arc;

use futures::StreamExt;
use futures::stream;

pub use decision::{CandidateOutcome, DropReason, UnlockAttempt, UnlockedFile, decide};
pub use selection::{VIDEO_SUFFIXES, base_name, is_video_file, select_largest_video};

use crate::config::ResolverConfig;
use crate::content::ContentTitle;
use crate::session::UnlockCredential;
use crate::source::CandidateSource;
use crate::stream::StreamDescriptor;
use crate::unlock::{UnlockError, UnlockService};

/// Turns candidate sources into ordered stream descriptors.
#[derive(Debug, Clone)]
pub struct StreamResolver {
    unlock: Arc<dyn UnlockService>,
    config: ResolverConfig,
}

impl StreamResolver {
    pub fn new(unlock: Arc<dyn UnlockService>, config: ResolverConfig) -> Self {
        Self { unlock, config }
    }

    /// Resolves every candidate, preserving input order in the output.
    ///
    /// Up to `max_concurrent_candidates` candidates are in flight at once;
    /// results are merged back in input position, not completion order.
    /// Dropping the returned future cancels all pending remote calls.
    pub async fn resolve(
        &self,
        content: &ContentTitle,
        candidates: &[CandidateSource],
        credential: Option<&UnlockCredential>,
    ) -> Vec<StreamDescriptor> {
        if candidates.is_empty() {
            tracing::debug!(content_id = %content.id, "No candidate sources to resolve");
            return Vec::new();
        }

        let concurrency = self.config.max_concurrent_candidates.max(1);
        // Futures are built up front so the merged stream stays `Send`
        let pending: Vec<_> = candidates
            .iter()
            .enumerate()
            .map(|(position, candidate)| self.resolve_candidate(position, candidate, credential))
            .collect();
        let outcomes: Vec<CandidateOutcome> = stream::iter(pending)
            .buffered(concurrency)
            .collect()
            .await;

        let streams: Vec<StreamDescriptor> = candidates
            .iter()
            .zip(outcomes)
            .filter_map(|(candidate, outcome)| outcome.into_descriptor(content, candidate))
            .collect();

        tracing::info!(
            content_id = %content.id,
            candidates = candidates.len(),
            streams = streams.len(),
            unlocked = credential.is_some(),
            "Resolved streams"
        );
        streams
    }

    async fn resolve_candidate(
        &self,
        position: usize,
        candidate: &CandidateSource,
        credential: Option<&UnlockCredential>,
    ) -> CandidateOutcome {
        let attempt = match credential {
            None => UnlockAttempt::Skipped,
            Some(credential) => match self.unlock(credential, candidate).await {
                Ok(file) => UnlockAttempt::Unlocked(file),
                Err(e) => {
                    tracing::warn!(
                        position,
                        hash = %candidate.hash,
                        error = %e,
                        "Unlock failed, falling back to peer-to-peer"
                    );
                    UnlockAttempt::Failed(e)
                }
            },
        };

        let outcome = decide(candidate, attempt);
        match &outcome {
            CandidateOutcome::Dropped(reason) => {
                tracing::debug!(position, hash = %candidate.hash, ?reason, "Candidate dropped");
            }
            _ => {
                tracing::debug!(position, hash = %candidate.hash, outcome = outcome.kind(), "Candidate resolved");
            }
        }
        outcome
    }

    /// Runs submit, inspect and unrestrict for one candidate.
    ///
    /// # Errors
    ///
    /// - `UnlockError::NotYetResolvable` - No video file or no ready locator
    /// - `UnlockError::Timeout` - A call exceeded the configured call timeout
    /// - any error reported by the unlock service
    pub async fn unlock(
        &self,
        credential: &UnlockCredential,
        candidate: &CandidateSource,
    ) -> Result<UnlockedFile, UnlockError> {
        let job = self
            .call("submit", self.unlock.submit(credential, candidate))
            .await?;
        let inspection = self
            .call("inspect", self.unlock.inspect(credential, &job))
            .await?;

        let file = select_largest_video(&inspection.files).ok_or_else(|| {
            UnlockError::NotYetResolvable {
                reason: format!("job {job} lists no video file"),
            }
        })?;
        let link = inspection
            .links
            .first()
            .ok_or_else(|| UnlockError::NotYetResolvable {
                reason: format!("job {job} has no ready locator"),
            })?;

        let url = self
            .call("unrestrict", self.unlock.unrestrict(credential, link))
            .await?;
        if url.is_empty() {
            return Err(UnlockError::EmptyLocator);
        }

        Ok(UnlockedFile {
            file_name: base_name(&file.name).to_string(),
            url,
        })
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        request: impl Future<Output = Result<T, UnlockError>>,
    ) -> Result<T, UnlockError> {
        tokio::time::timeout(self.config.call_timeout, request)
            .await
            .map_err(|_| UnlockError::Timeout { operation })?
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::content::ContentId;
    use crate::source::FileEntry;
    use crate::stream::PEER_STREAM_TAG;
    use crate::unlock::{JobId, JobInspection, ScriptedUnlockService, UnlockScript};

    const HASH_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const HASH_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
    const HASH_C: &str = "cccccccccccccccccccccccccccccccccccccccc";

    fn candidate(hash: &str, label: &str) -> CandidateSource {
        CandidateSource::new(hash, label, format!("magnet:?xt=urn:btih:{hash}"))
    }

    fn content() -> ContentTitle {
        ContentTitle::from_metadata(ContentId::parse("tt0133093").unwrap(), "The Matrix", Some(1999))
    }

    fn resolver(unlock: ScriptedUnlockService, concurrency: usize) -> StreamResolver {
        StreamResolver::new(
            Arc::new(unlock),
            ResolverConfig {
                call_timeout: Duration::from_millis(200),
                max_concurrent_candidates: concurrency,
            },
        )
    }

    fn credential() -> UnlockCredential {
        UnlockCredential::new("token").unwrap()
    }

    fn assert_send<T: Send>(_: &T) {}

    #[tokio::test]
    async fn test_resolve_future_is_send() {
        let resolver = Arc::new(resolver(ScriptedUnlockService::new(), 2));
        let candidates = vec![candidate(HASH_A, "a"), candidate(HASH_B, "b")];

        let task = {
            let resolver = resolver.clone();
            async move {
                let credential = credential();
                resolver
                    .resolve(&content(), &candidates, Some(&credential))
                    .await
            }
        };
        assert_send(&task);

        let streams = tokio::spawn(task).await.unwrap();
        assert_eq!(streams.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_candidates_resolve_to_empty_result() {
        let resolver = resolver(ScriptedUnlockService::new(), 1);
        assert!(resolver.resolve(&content(), &[], None).await.is_empty());
        assert!(
            resolver
                .resolve(&content(), &[], Some(&credential()))
                .await
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_valid_hash_without_credential_is_peer_to_peer() {
        let unlock = ScriptedUnlockService::new();
        let source = candidate(HASH_A, "Matrix.1999.1080p");
        let resolver = resolver(unlock, 1);

        let streams = resolver.resolve(&content(), &[source.clone()], None).await;

        assert_eq!(streams.len(), 1);
        match &streams[0] {
            StreamDescriptor::PeerToPeer {
                name,
                info_hash,
                sources,
                title,
            } => {
                assert_eq!(name, PEER_STREAM_TAG);
                assert_eq!(info_hash.to_string(), HASH_A);
                assert_eq!(sources, &vec![source.reference.clone()]);
                assert_eq!(title, "The Matrix (1999)\nMatrix.1999.1080p");
            }
            other => panic!("expected peer-to-peer stream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_credential_never_touches_unlock_service() {
        let unlock = Arc::new(ScriptedUnlockService::new());
        let resolver = StreamResolver::new(unlock.clone(), ResolverConfig::default());

        resolver
            .resolve(&content(), &[candidate(HASH_A, "a")], None)
            .await;

        assert!(unlock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_hashes_without_credential_contribute_nothing() {
        let resolver = resolver(ScriptedUnlockService::new(), 1);
        let candidates = vec![candidate("xyz", "bad"), candidate(&HASH_A[..39], "short")];

        assert!(resolver.resolve(&content(), &candidates, None).await.is_empty());
    }

    #[tokio::test]
    async fn test_unlock_success_selects_largest_video() {
        let source = candidate(HASH_A, "Matrix");
        let unlock = ScriptedUnlockService::new().with_script(
            &source.reference,
            UnlockScript::success(
                "JOB1",
                vec![
                    FileEntry::new("Matrix/a.txt", 100),
                    FileEntry::new("Matrix/b.mkv", 50),
                    FileEntry::new("Matrix/c.mp4", 200),
                ],
                "https://cdn.test/c.mp4",
            ),
        );
        let resolver = resolver(unlock, 1);

        let streams = resolver
            .resolve(&content(), &[source], Some(&credential()))
            .await;

        assert_eq!(
            streams,
            vec![StreamDescriptor::direct(
                "The Matrix (1999)",
                "c.mp4",
                "https://cdn.test/c.mp4"
            )]
        );
    }

    #[tokio::test]
    async fn test_unlock_calls_run_in_protocol_order() {
        let source = candidate(HASH_A, "Matrix");
        let unlock = Arc::new(ScriptedUnlockService::new().with_script(
            &source.reference,
            UnlockScript::success("JOB1", vec![FileEntry::new("m.mkv", 1)], "https://cdn/m"),
        ));
        let resolver = StreamResolver::new(unlock.clone(), ResolverConfig::default());

        resolver
            .resolve(&content(), &[source.clone()], Some(&credential()))
            .await;

        assert_eq!(
            unlock.calls(),
            vec![
                format!("submit:{}", source.reference),
                "inspect:JOB1".to_string(),
                "unrestrict:https://unlock.test/d/JOB1".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_video_files_falls_back_to_peer_to_peer() {
        let source = candidate(HASH_A, "Docs");
        let unlock = ScriptedUnlockService::new().with_script(
            &source.reference,
            UnlockScript::success(
                "JOB1",
                vec![FileEntry::new("readme.txt", 10), FileEntry::new("cover.jpg", 20)],
                "https://cdn.test/x",
            ),
        );
        let resolver = resolver(unlock, 1);

        let streams = resolver
            .resolve(&content(), &[source], Some(&credential()))
            .await;

        assert_eq!(streams.len(), 1);
        assert!(!streams[0].is_direct());
    }

    #[tokio::test]
    async fn test_missing_ready_locator_falls_back_to_peer_to_peer() {
        let source = candidate(HASH_A, "Pending");
        let mut script = UnlockScript::success("JOB1", vec![FileEntry::new("m.mkv", 5)], "u");
        script.inspect = Ok(JobInspection {
            files: vec![FileEntry::new("m.mkv", 5)],
            links: Vec::new(),
        });
        let unlock = ScriptedUnlockService::new().with_script(&source.reference, script);

        let streams = resolver(unlock, 1)
            .resolve(&content(), &[source], Some(&credential()))
            .await;

        assert_eq!(streams.len(), 1);
        assert!(!streams[0].is_direct());
    }

    #[tokio::test]
    async fn test_empty_unrestrict_locator_falls_back() {
        let source = candidate(HASH_A, "Empty");
        let mut script = UnlockScript::success("JOB1", vec![FileEntry::new("m.mkv", 5)], "");
        script.unrestrict = Ok(String::new());
        let unlock = ScriptedUnlockService::new().with_script(&source.reference, script);

        let streams = resolver(unlock, 1)
            .resolve(&content(), &[source], Some(&credential()))
            .await;

        assert_eq!(streams.len(), 1);
        assert!(!streams[0].is_direct());
    }

    #[tokio::test]
    async fn test_rejected_submit_with_malformed_hash_is_dropped() {
        let source = candidate("not-a-hash", "Broken");
        let unlock =
            ScriptedUnlockService::new().with_script(&source.reference, UnlockScript::rejected());

        let streams = resolver(unlock, 1)
            .resolve(&content(), &[source], Some(&credential()))
            .await;

        assert!(streams.is_empty());
    }

    #[tokio::test]
    async fn test_slow_call_times_out_and_falls_back() {
        let source = candidate(HASH_A, "Slow");
        let script = UnlockScript::success("JOB1", vec![FileEntry::new("m.mkv", 5)], "https://x")
            .with_delay(Duration::from_secs(5));
        let unlock = ScriptedUnlockService::new().with_script(&source.reference, script);
        let resolver = resolver(unlock, 1);

        let err = resolver.unlock(&credential(), &source).await.unwrap_err();
        assert_eq!(err, UnlockError::Timeout { operation: "submit" });

        let streams = resolver
            .resolve(&content(), &[source], Some(&credential()))
            .await;
        assert_eq!(streams.len(), 1);
        assert!(!streams[0].is_direct());
    }

    #[tokio::test]
    async fn test_output_order_matches_input_order_across_outcomes() {
        let direct = candidate(HASH_A, "direct");
        let fallback = candidate(HASH_B, "fallback");
        let dropped = candidate("zz", "dropped");
        let late_direct = candidate(HASH_C, "late");

        let scripted = || {
            ScriptedUnlockService::new()
                .with_script(
                    &direct.reference,
                    UnlockScript::success("J1", vec![FileEntry::new("one.mkv", 1)], "https://cdn/1")
                        .with_delay(Duration::from_millis(60)),
                )
                .with_script(&fallback.reference, UnlockScript::rejected())
                .with_script(&dropped.reference, UnlockScript::rejected())
                .with_script(
                    &late_direct.reference,
                    UnlockScript::success("J4", vec![FileEntry::new("four.mp4", 1)], "https://cdn/4"),
                )
        };

        let services = [scripted(), scripted()];
        let candidates = vec![direct.clone(), fallback.clone(), dropped.clone(), late_direct.clone()];

        for (unlock, concurrency) in services.into_iter().zip([1, 4]) {
            let resolver = resolver(unlock, concurrency);
            let streams = resolver
                .resolve(&content(), &candidates, Some(&credential()))
                .await;

            let titles: Vec<&str> = streams.iter().map(StreamDescriptor::title).collect();
            assert_eq!(
                titles,
                vec![
                    "The Matrix (1999)\none.mkv",
                    "The Matrix (1999)\nfallback",
                    "The Matrix (1999)\nfour.mp4",
                ],
                "concurrency {concurrency}"
            );
            assert!(streams[0].is_direct());
            assert!(!streams[1].is_direct());
            assert!(streams[2].is_direct());
        }
    }

    #[tokio::test]
    async fn test_end_to_end_malformed_then_valid_without_credential() {
        let resolver = resolver(ScriptedUnlockService::new(), 1);
        let candidates = vec![candidate("12345", "malformed"), candidate(HASH_B, "valid")];

        let streams = resolver.resolve(&content(), &candidates, None).await;

        assert_eq!(streams.len(), 1);
        match &streams[0] {
            StreamDescriptor::PeerToPeer { info_hash, .. } => {
                assert_eq!(info_hash.to_string(), HASH_B);
            }
            other => panic!("expected peer-to-peer stream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_job_ids_are_threaded_through() {
        let source = candidate(HASH_A, "x");
        let mut script = UnlockScript::success("ignored", vec![FileEntry::new("m.mkv", 1)], "https://u");
        script.submit = Ok(JobId("CUSTOM".to_string()));
        let unlock = Arc::new(ScriptedUnlockService::new().with_script(&source.reference, script));
        let resolver = StreamResolver::new(unlock.clone(), ResolverConfig::default());

        let file = resolver.unlock(&credential(), &source).await.unwrap();
        assert_eq!(file.file_name, "m.mkv");
        assert!(unlock.calls().contains(&"inspect:CUSTOM".to_string()));
    }
}

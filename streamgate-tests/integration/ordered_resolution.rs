//! Output order under concurrent resolution with out-of-order completion.

use std::sync::Arc;
use std::time::Duration;

use streamgate_core::config::ResolverConfig;
use streamgate_core::unlock::{ScriptedUnlockService, UnlockScript};
use streamgate_core::{
    CandidateSource, ContentId, ContentTitle, FileEntry, StreamResolver, UnlockCredential,
};

fn hash(n: usize) -> String {
    format!("{n:040x}")
}

fn reference(n: usize) -> String {
    format!("magnet:?xt=urn:btih:{}", hash(n))
}

/// Candidate `n` sleeps longer the earlier it is, so completion order is reversed.
/// Every third candidate is refused by the unlock service.
fn scripted(count: usize) -> ScriptedUnlockService {
    (0..count).fold(ScriptedUnlockService::new(), |service, n| {
        let delay = Duration::from_millis(((count - n) * 15) as u64);
        let script = if n % 3 == 2 {
            UnlockScript::rejected().with_delay(delay)
        } else {
            UnlockScript::success(
                &format!("JOB{n}"),
                vec![FileEntry::new(format!("release-{n}/video-{n}.mkv"), 1_000 + n as u64)],
                &format!("https://cdn.unlock.test/{n}.mkv"),
            )
            .with_delay(delay)
        };
        service.with_script(&reference(n), script)
    })
}

#[tokio::test]
async fn test_mixed_outcomes_keep_input_order() {
    let count = 9;
    let candidates: Vec<_> = (0..count)
        .map(|n| CandidateSource::new(&hash(n), &format!("Release {n}"), &reference(n)))
        .collect();
    let title = ContentTitle::fallback(ContentId::parse("tt0133093").unwrap());
    let credential = UnlockCredential::new("key");

    for concurrency in [1, 4, 9] {
        let resolver = StreamResolver::new(
            Arc::new(scripted(count)),
            ResolverConfig {
                call_timeout: Duration::from_secs(2),
                max_concurrent_candidates: concurrency,
            },
        );

        let streams = resolver
            .resolve(&title, &candidates, credential.as_ref())
            .await;

        assert_eq!(streams.len(), count, "concurrency {concurrency}");
        for (n, stream) in streams.iter().enumerate() {
            assert_eq!(stream.is_direct(), n % 3 != 2, "position {n}");
            let expected_tail = if n % 3 == 2 {
                format!("Release {n}")
            } else {
                format!("video-{n}.mkv")
            };
            assert_eq!(stream.title(), format!("tt0133093\n{expected_tail}"));
        }
    }
}

#[tokio::test]
async fn test_sequential_and_concurrent_results_match() {
    let count = 6;
    let candidates: Vec<_> = (0..count)
        .map(|n| CandidateSource::new(&hash(n), &format!("Release {n}"), &reference(n)))
        .collect();
    let title = ContentTitle::fallback(ContentId::parse("tt0944947:1:1").unwrap());
    let credential = UnlockCredential::new("key");

    let mut results = Vec::new();
    for concurrency in [1, 6] {
        let resolver = StreamResolver::new(
            Arc::new(scripted(count)),
            ResolverConfig {
                call_timeout: Duration::from_secs(2),
                max_concurrent_candidates: concurrency,
            },
        );
        results.push(
            resolver
                .resolve(&title, &candidates, credential.as_ref())
                .await,
        );
    }

    assert_eq!(results[0], results[1]);
}

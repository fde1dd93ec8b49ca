//! Resolver driving the Real-Debrid client against a mocked REST API.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use streamgate_core::config::{ResolverConfig, UnlockConfig};
use streamgate_core::stream::{DIRECT_STREAM_TAG, PEER_STREAM_TAG};
use streamgate_core::{
    CandidateSource, ContentId, ContentTitle, RealDebridClient, StreamDescriptor, StreamResolver,
    UnlockCredential,
};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GOOD_HASH: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const BUSY_HASH: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

fn resolver_for(server: &MockServer, max_concurrent_candidates: usize) -> StreamResolver {
    let unlock = RealDebridClient::new(&UnlockConfig {
        base_url: server.uri(),
        request_timeout: Duration::from_secs(5),
        ..Default::default()
    })
    .unwrap();

    StreamResolver::new(
        Arc::new(unlock),
        ResolverConfig {
            call_timeout: Duration::from_secs(2),
            max_concurrent_candidates,
        },
    )
}

fn candidate(hash: &str, label: &str) -> CandidateSource {
    CandidateSource::new(hash, label, &format!("magnet:?xt=urn:btih:{hash}"))
}

fn matrix() -> ContentTitle {
    ContentTitle::from_metadata(ContentId::parse("tt0133093").unwrap(), "The Matrix", Some(1999))
}

async fn mount_successful_job(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/torrents/addMagnet"))
        .and(header("authorization", "Bearer rd-key"))
        .and(body_string_contains(GOOD_HASH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "JOB42",
            "uri": "https://api.real-debrid.com/rest/1.0/torrents/info/JOB42"
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/torrents/info/JOB42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "JOB42",
            "status": "downloaded",
            "files": [
                {"id": 1, "path": "/The.Matrix.1999/sample.mkv", "bytes": 20_000},
                {"id": 2, "path": "/The.Matrix.1999/The.Matrix.1999.1080p.mkv", "bytes": 9_000_000},
                {"id": 3, "path": "/The.Matrix.1999/info.nfo", "bytes": 99_000_000}
            ],
            "links": ["https://real-debrid.com/d/LINK42"]
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/unrestrict/link"))
        .and(body_string_contains("LINK42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "download": "https://cdn.real-debrid.test/The.Matrix.1999.1080p.mkv"
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_unlocked_candidate_becomes_direct_stream() {
    let server = MockServer::start().await;
    mount_successful_job(&server).await;

    let credential = UnlockCredential::new("rd-key");
    let streams = resolver_for(&server, 1)
        .resolve(&matrix(), &[candidate(GOOD_HASH, "The Matrix 1080p")], credential.as_ref())
        .await;

    assert_eq!(
        streams,
        vec![StreamDescriptor::Direct {
            name: DIRECT_STREAM_TAG.to_string(),
            title: "The Matrix (1999)\nThe.Matrix.1999.1080p.mkv".to_string(),
            url: "https://cdn.real-debrid.test/The.Matrix.1999.1080p.mkv".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_rejected_candidate_falls_back_in_place() {
    let server = MockServer::start().await;
    mount_successful_job(&server).await;
    Mock::given(method("POST"))
        .and(path("/torrents/addMagnet"))
        .and(body_string_contains(BUSY_HASH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": "service_unavailable",
            "error_code": 25
        })))
        .mount(&server)
        .await;

    let credential = UnlockCredential::new("rd-key");
    let candidates = [
        candidate(BUSY_HASH, "Busy release"),
        candidate("zz-not-a-hash", "Broken release"),
        candidate(GOOD_HASH, "The Matrix 1080p"),
    ];
    let streams = resolver_for(&server, 3)
        .resolve(&matrix(), &candidates, credential.as_ref())
        .await;

    assert_eq!(streams.len(), 2);
    match &streams[0] {
        StreamDescriptor::PeerToPeer {
            name,
            info_hash,
            sources,
            ..
        } => {
            assert_eq!(name, PEER_STREAM_TAG);
            assert_eq!(info_hash.to_string(), BUSY_HASH);
            assert_eq!(sources, &vec![format!("magnet:?xt=urn:btih:{BUSY_HASH}")]);
        }
        other => panic!("expected peer-to-peer fallback, got {other:?}"),
    }
    assert!(streams[1].is_direct());
}

#[tokio::test]
async fn test_without_credential_no_request_reaches_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let streams = resolver_for(&server, 2)
        .resolve(&matrix(), &[candidate(GOOD_HASH, "The Matrix 1080p")], None)
        .await;

    assert_eq!(streams.len(), 1);
    assert!(!streams[0].is_direct());
}

#[tokio::test]
async fn test_job_without_links_is_not_yet_resolvable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/torrents/addMagnet"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "QUEUED"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/torrents/info/QUEUED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "magnet_conversion",
            "files": [],
            "links": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/unrestrict/link"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let credential = UnlockCredential::new("rd-key");
    let streams = resolver_for(&server, 1)
        .resolve(&matrix(), &[candidate(GOOD_HASH, "Queued")], credential.as_ref())
        .await;

    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].title(), "The Matrix (1999)\nQueued");
}

#[tokio::test]
async fn test_slow_service_times_out_to_peer_to_peer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/torrents/addMagnet"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": "SLOW"}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let unlock = RealDebridClient::new(&UnlockConfig {
        base_url: server.uri(),
        ..Default::default()
    })
    .unwrap();
    let resolver = StreamResolver::new(
        Arc::new(unlock),
        ResolverConfig {
            call_timeout: Duration::from_millis(200),
            max_concurrent_candidates: 1,
        },
    );

    let credential = UnlockCredential::new("rd-key");
    let streams = resolver
        .resolve(&matrix(), &[candidate(GOOD_HASH, "Slow")], credential.as_ref())
        .await;

    assert_eq!(streams.len(), 1);
    assert!(!streams[0].is_direct());
}

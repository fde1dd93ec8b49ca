//! Static candidates file feeding the resolver through discovery.

use std::sync::Arc;

use streamgate_catalog::{CatalogService, DemoProvider};
use streamgate_core::config::ResolverConfig;
use streamgate_core::unlock::ScriptedUnlockService;
use streamgate_core::{
    CandidateDiscovery, ContentId, MediaKind, StaticCandidates, StreamDescriptor, StreamResolver,
};

const HASH: &str = "c9e15763f722f23e98a29decdfae341b98d53056";

#[tokio::test]
async fn test_candidates_file_to_streams() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("candidates.json");
    std::fs::write(
        &path,
        format!(
            r#"{{
                "tt1727587": [
                    "magnet:?xt=urn:btih:{HASH}&dn=Sintel%20(2010)%201080p",
                    "magnet:?xt=urn:btih:not-valid",
                    "definitely not a magnet"
                ]
            }}"#
        ),
    )
    .unwrap();

    let discovery = StaticCandidates::from_file(&path).await.unwrap();
    let content = ContentId::parse("tt1727587").unwrap();
    let candidates = discovery.discover(&content, MediaKind::Movie).await;

    let demo = Arc::new(DemoProvider::new());
    let catalog = CatalogService::new(demo.clone(), demo);
    let title = catalog.content_title(content, MediaKind::Movie).await;

    let resolver = StreamResolver::new(
        Arc::new(ScriptedUnlockService::new()),
        ResolverConfig::default(),
    );
    let streams = resolver.resolve(&title, &candidates, None).await;

    assert_eq!(streams.len(), 1);
    match &streams[0] {
        StreamDescriptor::PeerToPeer { title, info_hash, .. } => {
            assert_eq!(title, "Sintel (2010)\nSintel (2010) 1080p");
            assert_eq!(info_hash.to_string(), HASH);
        }
        other => panic!("expected peer-to-peer stream, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_candidates_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = StaticCandidates::from_file(&dir.path().join("absent.json")).await;
    assert!(result.is_err());
}

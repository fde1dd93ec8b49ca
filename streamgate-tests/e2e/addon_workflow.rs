//! Full addon workflow over HTTP with a mocked Real-Debrid API.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use streamgate_catalog::CatalogService;
use streamgate_core::config::{ResolverConfig, UnlockConfig};
use streamgate_core::{
    CandidateSource, CredentialStore, RealDebridClient, StaticCandidates, StreamResolver,
};
use streamgate_web::{AppState, build_router};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HASH: &str = "08ada5a7a6183aae1e09d831df6748d566095a10";

async fn mock_real_debrid() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/torrents/addMagnet"))
        .and(header("authorization", "Bearer user-key"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "E2E"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/torrents/info/E2E"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "downloaded",
            "files": [{"path": "/Sintel/Sintel.2010.mp4", "bytes": 1_200_000}],
            "links": ["https://real-debrid.com/d/E2E"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/unrestrict/link"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "download": "https://cdn.real-debrid.test/Sintel.2010.mp4"
        })))
        .mount(&server)
        .await;
    server
}

async fn start_addon(debrid: &MockServer) -> String {
    let unlock = RealDebridClient::new(&UnlockConfig {
        base_url: debrid.uri(),
        ..Default::default()
    })
    .unwrap();

    let state = AppState {
        catalog: CatalogService::from_config(
            streamgate_core::RuntimeMode::Development,
            &Default::default(),
        )
        .unwrap(),
        resolver: Arc::new(StreamResolver::new(
            Arc::new(unlock),
            ResolverConfig {
                call_timeout: Duration::from_secs(2),
                max_concurrent_candidates: 2,
            },
        )),
        discovery: Arc::new(StaticCandidates::new().with_candidates(
            "tt1727587",
            vec![CandidateSource::new(
                HASH,
                "Sintel 1080p",
                format!("magnet:?xt=urn:btih:{HASH}"),
            )],
        )),
        credentials: CredentialStore::new(),
        addon_name: "Streamgate".to_string(),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    format!("http://{address}")
}

#[tokio::test]
async fn test_player_workflow() {
    let debrid = mock_real_debrid().await;
    let base = start_addon(&debrid).await;
    let client = reqwest::Client::new();

    let manifest: Value = client
        .get(format!("{base}/manifest.json"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(manifest["behaviorHints"]["configurable"], true);

    let catalog: Value = client
        .get(format!("{base}/catalog/movie/popular.json"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(
        catalog["metas"]
            .as_array()
            .unwrap()
            .iter()
            .any(|m| m["id"] == "tt1727587")
    );

    // Before configuration only the peer-to-peer stream is offered
    let streams: Value = client
        .get(format!("{base}/stream/movie/tt1727587.json"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(streams["streams"][0]["infoHash"], HASH);
    assert!(streams["streams"][0].get("url").is_none());

    let page = client
        .post(format!("{base}/configure"))
        .form(&[("api_key", "user-key")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!page.contains("user-key"));

    let streams: Value = client
        .get(format!("{base}/stream/movie/tt1727587.json"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        streams["streams"],
        json!([{
            "name": "[RD+] streamgate",
            "title": "Sintel (2010)\nSintel.2010.mp4",
            "url": "https://cdn.real-debrid.test/Sintel.2010.mp4"
        }])
    );

    let response = client
        .get(format!("{base}/stream/movie/not-an-id.json"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

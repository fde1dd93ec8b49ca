//! Addon HTTP server for Streamgate
//!
//! Serves the addon protocol endpoints (manifest, catalogs, streams) and the
//! credential configuration page.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use streamgate_catalog::CatalogService;
use streamgate_core::{
    CandidateDiscovery, CredentialStore, GatewayConfig, GatewayError, NoDiscovery,
    RealDebridClient, RuntimeMode, StaticCandidates, StreamResolver,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    catalog, catalog_with_extra, configure_page, configure_submit, manifest, root, stream,
};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub resolver: Arc<StreamResolver>,
    pub discovery: Arc<dyn CandidateDiscovery>,
    pub credentials: CredentialStore,
    pub addon_name: String,
}

impl AppState {
    /// Wires production components from configuration.
    ///
    /// # Errors
    ///
    /// - `GatewayError::Configuration` - Metadata or unlock clients could not be built
    /// - `GatewayError::Io` / `GatewayError::Discovery` - Candidates file unreadable or invalid
    pub async fn from_config(config: &GatewayConfig, mode: RuntimeMode) -> Result<Self, GatewayError> {
        let catalog = CatalogService::from_config(mode, &config.metadata).map_err(|e| {
            GatewayError::Configuration {
                reason: e.to_string(),
            }
        })?;

        let unlock = Arc::new(RealDebridClient::new(&config.unlock)?);
        let resolver = Arc::new(StreamResolver::new(unlock, config.resolver.clone()));

        let discovery: Arc<dyn CandidateDiscovery> = match &config.discovery.candidates_file {
            Some(path) => Arc::new(StaticCandidates::from_file(path).await?),
            None => {
                tracing::warn!("No candidates file configured, streams will always be empty");
                Arc::new(NoDiscovery)
            }
        };

        Ok(Self {
            catalog,
            resolver,
            discovery,
            credentials: CredentialStore::with_credential(config.unlock.initial_credential.clone()),
            addon_name: config.server.addon_name.clone(),
        })
    }
}

/// Builds the addon router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/manifest.json", get(manifest))
        .route("/configure", get(configure_page).post(configure_submit))
        // Path captures include the `.json` suffix; handlers strip it
        .route("/catalog/{kind}/{file}", get(catalog))
        .route("/catalog/{kind}/{id}/{file}", get(catalog_with_extra))
        .route("/stream/{kind}/{file}", get(stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the addon server until the listener fails.
///
/// # Errors
///
/// - `GatewayError::Configuration` - Components could not be built
/// - `GatewayError::Io` - Address could not be bound or serving failed
pub async fn run_server(config: GatewayConfig, mode: RuntimeMode) -> Result<(), GatewayError> {
    let state = AppState::from_config(&config, mode).await?;
    let app = build_router(state);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        address = %address,
        mode = %mode,
        "Streamgate addon running, install from http://{address}/manifest.json"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use streamgate_core::config::ResolverConfig;
    use streamgate_core::unlock::{ScriptedUnlockService, UnlockScript};
    use streamgate_core::{CandidateSource, FileEntry, RuntimeMode};
    use tower::ServiceExt;

    use super::*;

    const HASH: &str = "0123456789abcdef0123456789abcdef01234567";
    const REFERENCE: &str = "magnet:?xt=urn:btih:0123456789abcdef0123456789abcdef01234567";

    fn test_state(unlock: ScriptedUnlockService) -> AppState {
        let catalog = CatalogService::from_config(
            RuntimeMode::Development,
            &GatewayConfig::default().metadata,
        )
        .unwrap();
        let discovery = StaticCandidates::new().with_candidates(
            "tt1254207",
            vec![
                CandidateSource::new("not-a-hash", "Broken", "magnet:?xt=urn:btih:broken"),
                CandidateSource::new(HASH, "Big.Buck.Bunny.1080p", REFERENCE),
            ],
        );

        AppState {
            catalog,
            resolver: Arc::new(StreamResolver::new(
                Arc::new(unlock),
                ResolverConfig::default(),
            )),
            discovery: Arc::new(discovery),
            credentials: CredentialStore::new(),
            addon_name: "Streamgate".to_string(),
        }
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = get(app, uri).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    async fn post_form(app: Router, body: &'static str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri("/configure")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_root_redirects_to_configure() {
        let app = build_router(test_state(ScriptedUnlockService::new()));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/configure");
    }

    #[tokio::test]
    async fn test_manifest_endpoint() {
        let app = build_router(test_state(ScriptedUnlockService::new()));
        let (status, json) = get_json(app, "/manifest.json").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "Streamgate");
        assert_eq!(json["catalogs"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_catalog_endpoints() {
        let state = test_state(ScriptedUnlockService::new());

        let (status, json) = get_json(build_router(state.clone()), "/catalog/movie/popular.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["metas"].as_array().unwrap().len(), 3);
        assert_eq!(json["metas"][0]["type"], "movie");
        assert_eq!(json["metas"][0]["releaseInfo"], "2008");

        let (status, json) = get_json(
            build_router(state.clone()),
            "/catalog/movie/popular/genre=Science%20Fiction&skip=0.json",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["metas"][0]["name"], "Tears of Steel");

        let (status, _) = get(build_router(state.clone()), "/catalog/channel/popular.json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(build_router(state), "/catalog/movie/top.json").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_catalog_genre_with_encoded_ampersand() {
        let state = test_state(ScriptedUnlockService::new());

        let (status, json) = get_json(
            build_router(state.clone()),
            "/catalog/series/popular/genre=Sci-Fi%20%26%20Fantasy.json",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let metas = json["metas"].as_array().unwrap();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0]["name"], "Game of Thrones");

        let (_, json) = get_json(
            build_router(state),
            "/catalog/series/popular/genre=War%20%26%20Politics&skip=0.json",
        )
        .await;
        assert!(json["metas"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stream_rejects_malformed_requests() {
        let state = test_state(ScriptedUnlockService::new());

        let (status, json) = get_json(build_router(state.clone()), "/stream/movie/nonsense.json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("nonsense"));

        let (status, _) = get(build_router(state.clone()), "/stream/tv/tt1254207.json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(build_router(state), "/stream/movie/tt1254207").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stream_without_credential_is_peer_to_peer() {
        let app = build_router(test_state(ScriptedUnlockService::new()));
        let (status, json) = get_json(app, "/stream/movie/tt1254207.json").await;

        assert_eq!(status, StatusCode::OK);
        let streams = json["streams"].as_array().unwrap();
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0]["infoHash"], HASH);
        assert_eq!(streams[0]["sources"], serde_json::json!([REFERENCE]));
        assert_eq!(
            streams[0]["title"],
            "Big Buck Bunny (2008)\nBig.Buck.Bunny.1080p"
        );
    }

    #[tokio::test]
    async fn test_unknown_title_has_no_streams() {
        let app = build_router(test_state(ScriptedUnlockService::new()));
        let (status, json) = get_json(app, "/stream/movie/tt0000001.json").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["streams"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_configure_then_stream_is_direct() {
        let unlock = ScriptedUnlockService::new().with_script(
            REFERENCE,
            UnlockScript::success(
                "JOB1",
                vec![
                    FileEntry::new("Big.Buck.Bunny/sample.mkv", 10),
                    FileEntry::new("Big.Buck.Bunny/movie.mp4", 700),
                ],
                "https://cdn.unlock.test/movie.mp4",
            ),
        );
        let state = test_state(unlock);

        let (status, page) = post_form(build_router(state.clone()), "api_key=secret-key").await;
        assert_eq!(status, StatusCode::OK);
        assert!(page.contains("saved"));
        assert!(!page.contains("secret-key"));
        assert!(state.credentials.is_configured());

        let (_, json) = get_json(build_router(state.clone()), "/stream/movie/tt1254207.json").await;
        let streams = json["streams"].as_array().unwrap();
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0]["url"], "https://cdn.unlock.test/movie.mp4");
        assert_eq!(streams[0]["title"], "Big Buck Bunny (2008)\nmovie.mp4");

        let (_, page) = post_form(build_router(state.clone()), "api_key=").await;
        assert!(page.contains("cleared"));
        assert!(!state.credentials.is_configured());
    }

    #[tokio::test]
    async fn test_configure_page_never_shows_key() {
        let state = test_state(ScriptedUnlockService::new());
        state
            .credentials
            .set(streamgate_core::UnlockCredential::new("hidden-value"));

        let (status, page) = get(build_router(state), "/configure").await;
        assert_eq!(status, StatusCode::OK);
        assert!(page.contains("Real-Debrid key configured"));
        assert!(!page.contains("hidden-value"));
    }
}

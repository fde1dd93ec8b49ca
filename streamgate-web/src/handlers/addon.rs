//! Addon protocol handlers: manifest, catalogs and streams

use axum::Json;
use axum::extract::{Path, RawPathParams, State};
use serde::Serialize;
use streamgate_catalog::{CatalogError, CatalogExtra, MetaPreview};
use streamgate_core::{ContentId, StreamDescriptor};

use super::utils::{parse_kind, strip_json_suffix};
use crate::errors::ApiError;
use crate::manifest::Manifest;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub metas: Vec<MetaPreview>,
}

#[derive(Debug, Serialize)]
pub struct StreamResponse {
    pub streams: Vec<StreamDescriptor>,
}

pub async fn manifest(State(state): State<AppState>) -> Json<Manifest> {
    Json(Manifest::new(&state.addon_name))
}

/// `GET /catalog/{kind}/{id}.json`
pub async fn catalog(
    State(state): State<AppState>,
    Path((kind, file)): Path<(String, String)>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let catalog_id = strip_json_suffix(&file)?;
    list_catalog(&state, &kind, catalog_id, CatalogExtra::default()).await
}

/// `GET /catalog/{kind}/{id}/{extra}.json`
///
/// The extra segment is split while still percent-encoded so an encoded `&`
/// inside a genre name stays part of its value.
pub async fn catalog_with_extra(
    State(state): State<AppState>,
    Path((kind, catalog_id, _)): Path<(String, String, String)>,
    raw: RawPathParams,
) -> Result<Json<CatalogResponse>, ApiError> {
    let file = raw
        .iter()
        .find_map(|(key, value)| (key == "file").then_some(value))
        .ok_or_else(|| ApiError::BadRequest {
            reason: "missing catalog extra segment".to_string(),
        })?;
    let extra = CatalogExtra::parse(strip_json_suffix(file)?);
    list_catalog(&state, &kind, &catalog_id, extra).await
}

async fn list_catalog(
    state: &AppState,
    kind: &str,
    catalog_id: &str,
    extra: CatalogExtra,
) -> Result<Json<CatalogResponse>, ApiError> {
    let kind = parse_kind(kind)?;

    let metas = match state.catalog.list_catalog(kind, catalog_id, &extra).await {
        Ok(metas) => metas,
        Err(CatalogError::UnknownCatalog { catalog_id }) => {
            return Err(ApiError::NotFound {
                what: format!("catalog {catalog_id}"),
            });
        }
        Err(e) => {
            tracing::warn!(kind = %kind, error = %e, "Catalog provider failed, serving empty catalog");
            Vec::new()
        }
    };

    Ok(Json(CatalogResponse { metas }))
}

/// `GET /stream/{kind}/{id}.json`
///
/// Discovers candidates, labels them with the looked-up title and resolves
/// them with one snapshot of the stored credential.
pub async fn stream(
    State(state): State<AppState>,
    Path((kind, file)): Path<(String, String)>,
) -> Result<Json<StreamResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let content = ContentId::parse(strip_json_suffix(&file)?)?;

    let candidates = state.discovery.discover(&content, kind).await;
    if candidates.is_empty() {
        tracing::debug!(content_id = %content, "No candidates discovered");
        return Ok(Json(StreamResponse {
            streams: Vec::new(),
        }));
    }

    let title = state.catalog.content_title(content, kind).await;
    let credential = state.credentials.snapshot();
    let streams = state
        .resolver
        .resolve(&title, &candidates, credential.as_ref())
        .await;

    tracing::debug!(
        content_id = %title.id,
        direct = streams.iter().filter(|s| s.is_direct()).count(),
        "Serving streams"
    );

    Ok(Json(StreamResponse { streams }))
}

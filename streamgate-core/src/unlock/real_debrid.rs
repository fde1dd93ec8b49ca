//! Real-Debrid REST client implementing the unlock protocol.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{JobId, JobInspection, UnlockError, UnlockService};
use crate::config::UnlockConfig;
use crate::session::UnlockCredential;
use crate::source::{CandidateSource, FileEntry};
use crate::{GatewayError, Result};

/// Unlock service backed by the Real-Debrid REST API.
#[derive(Debug, Clone)]
pub struct RealDebridClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct AddMagnetResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TorrentInfoResponse {
    #[serde(default)]
    files: Vec<TorrentFile>,
    #[serde(default)]
    links: Vec<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TorrentFile {
    path: String,
    bytes: u64,
}

#[derive(Debug, Deserialize)]
struct UnrestrictResponse {
    #[serde(default)]
    download: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

impl RealDebridClient {
    /// Creates a client against the configured API base URL.
    ///
    /// # Errors
    ///
    /// - `GatewayError::Configuration` - HTTP client could not be built
    pub fn new(config: &UnlockConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| GatewayError::Configuration {
                reason: format!("Failed to build unlock HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Decodes a successful body or converts the service's error payload.
    async fn decode<T: DeserializeOwned>(response: Response) -> std::result::Result<T, UnlockError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::rejection(status, response).await);
        }

        response.json::<T>().await.map_err(|e| UnlockError::Parse {
            reason: e.to_string(),
        })
    }

    async fn rejection(status: StatusCode, response: Response) -> UnlockError {
        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        UnlockError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

fn network_error(e: reqwest::Error) -> UnlockError {
    UnlockError::Network {
        reason: e.to_string(),
    }
}

#[async_trait]
impl UnlockService for RealDebridClient {
    async fn submit(
        &self,
        credential: &UnlockCredential,
        source: &CandidateSource,
    ) -> std::result::Result<JobId, UnlockError> {
        let response = self
            .client
            .post(self.url("/torrents/addMagnet"))
            .bearer_auth(credential.expose())
            .form(&[("magnet", source.reference.as_str())])
            .send()
            .await
            .map_err(network_error)?;

        let body: AddMagnetResponse = Self::decode(response).await?;
        tracing::debug!(job_id = %body.id, "Source submitted to Real-Debrid");
        Ok(JobId(body.id))
    }

    async fn inspect(
        &self,
        credential: &UnlockCredential,
        job: &JobId,
    ) -> std::result::Result<JobInspection, UnlockError> {
        let response = self
            .client
            .get(self.url(&format!("/torrents/info/{}", urlencoding::encode(&job.0))))
            .bearer_auth(credential.expose())
            .send()
            .await
            .map_err(network_error)?;

        let body: TorrentInfoResponse = Self::decode(response).await?;
        tracing::debug!(
            job_id = %job,
            status = body.status.as_deref().unwrap_or("unknown"),
            files = body.files.len(),
            links = body.links.len(),
            "Inspected Real-Debrid job"
        );

        Ok(JobInspection {
            files: body
                .files
                .into_iter()
                .map(|file| FileEntry::new(file.path, file.bytes))
                .collect(),
            links: body.links,
        })
    }

    async fn unrestrict(
        &self,
        credential: &UnlockCredential,
        link: &str,
    ) -> std::result::Result<String, UnlockError> {
        let response = self
            .client
            .post(self.url("/unrestrict/link"))
            .bearer_auth(credential.expose())
            .form(&[("link", link)])
            .send()
            .await
            .map_err(network_error)?;

        let body: UnrestrictResponse = Self::decode(response).await?;
        body.download
            .filter(|url| !url.is_empty())
            .ok_or(UnlockError::EmptyLocator)
    }
}

//! Centralized configuration for Streamgate.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::path::PathBuf;
use std::time::Duration;

use crate::session::UnlockCredential;

/// Central configuration for all Streamgate components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub metadata: MetadataConfig,
    pub unlock: UnlockConfig,
    pub resolver: ResolverConfig,
    pub discovery: DiscoveryConfig,
}

/// HTTP listener and addon identity.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Addon name shown by the player
    pub addon_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7000,
            addon_name: "Streamgate".to_string(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Metadata provider endpoints and keys.
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    /// TMDB API base URL
    pub tmdb_base_url: String,
    pub tmdb_api_key: Option<String>,
    /// OMDb API base URL
    pub omdb_base_url: String,
    pub omdb_api_key: Option<String>,
    /// HTTP request timeout for metadata calls
    pub request_timeout: Duration,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            tmdb_base_url: "https://api.themoviedb.org/3".to_string(),
            tmdb_api_key: None,
            omdb_base_url: "https://www.omdbapi.com".to_string(),
            omdb_api_key: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Unlock service endpoint and initial credential.
#[derive(Debug, Clone)]
pub struct UnlockConfig {
    /// Real-Debrid REST base URL
    pub base_url: String,
    /// Transport-level timeout for every unlock request
    pub request_timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
    /// Credential installed at startup, replaced by the configure form
    pub initial_credential: Option<UnlockCredential>,
}

impl Default for UnlockConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.real-debrid.com/rest/1.0".to_string(),
            request_timeout: Duration::from_secs(15),
            user_agent: "streamgate/0.1.0",
            initial_credential: None,
        }
    }
}

/// Stream resolver tuning.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Upper bound on each submit/inspect/unrestrict call
    pub call_timeout: Duration,
    /// Candidates resolved at once; 1 resolves strictly in sequence
    pub max_concurrent_candidates: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(10),
            max_concurrent_candidates: 4,
        }
    }
}

/// Candidate discovery input.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// JSON file mapping content ids to magnet links
    pub candidates_file: Option<PathBuf>,
}

impl GatewayConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("STREAMGATE_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("STREAMGATE_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.server.port = port;
            }
        }

        if let Ok(url) = std::env::var("STREAMGATE_TMDB_URL") {
            config.metadata.tmdb_base_url = url;
        }

        config.metadata.tmdb_api_key = non_empty_var("TMDB_API_KEY");
        config.metadata.omdb_api_key = non_empty_var("OMDB_API_KEY");

        if let Ok(url) = std::env::var("STREAMGATE_DEBRID_URL") {
            config.unlock.base_url = url;
        }

        if let Ok(key) = std::env::var("STREAMGATE_DEBRID_API_KEY") {
            config.unlock.initial_credential = UnlockCredential::new(key);
        }

        if let Ok(timeout) = std::env::var("STREAMGATE_CALL_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.resolver.call_timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(max) = std::env::var("STREAMGATE_MAX_CONCURRENT") {
            if let Ok(count) = max.parse::<usize>() {
                config.resolver.max_concurrent_candidates = count.max(1);
            }
        }

        if let Some(path) = non_empty_var("STREAMGATE_CANDIDATES_FILE") {
            config.discovery.candidates_file = Some(PathBuf::from(path));
        }

        config
    }

    /// Creates a configuration for tests: short timeouts, sequential resolution.
    pub fn for_testing() -> Self {
        Self {
            resolver: ResolverConfig {
                call_timeout: Duration::from_millis(500),
                max_concurrent_candidates: 1,
            },
            ..Default::default()
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

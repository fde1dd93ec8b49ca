//! CLI command implementations

use anyhow::Context;
use clap::Subcommand;
use streamgate_catalog::{CatalogExtra, CatalogService, POPULAR_CATALOG_ID};
use streamgate_core::{
    CandidateDiscovery, CandidateSource, ContentId, GatewayConfig, MediaKind, NoDiscovery,
    RealDebridClient, RuntimeMode, StaticCandidates, StreamResolver, UnlockCredential,
};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the addon server
    Serve {
        /// Host to bind to (overrides STREAMGATE_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (overrides STREAMGATE_PORT)
        #[arg(short, long)]
        port: Option<u16>,
        /// Runtime mode (production or development)
        #[arg(long, default_value = "development")]
        mode: RuntimeMode,
    },
    /// Resolve streams for one content id and print them as JSON
    Resolve {
        /// Content id, e.g. tt0133093 or tt0944947:1:2
        content_id: String,
        /// Media kind of the content id
        #[arg(short, long, default_value = "movie")]
        kind: String,
        /// Candidate magnet link; repeat for several, tried in order
        #[arg(long = "magnet")]
        magnets: Vec<String>,
        /// Real-Debrid API key (overrides STREAMGATE_DEBRID_API_KEY)
        #[arg(long)]
        credential: Option<String>,
        /// Runtime mode used for the title lookup
        #[arg(long, default_value = "development")]
        mode: RuntimeMode,
    },
    /// Print one page of the popular catalog as JSON
    Catalog {
        /// Media kind to list
        #[arg(short, long, default_value = "movie")]
        kind: String,
        /// Genre filter
        #[arg(short, long)]
        genre: Option<String>,
        /// Number of items to skip
        #[arg(long, default_value = "0")]
        skip: u32,
        /// Runtime mode (production or development)
        #[arg(long, default_value = "development")]
        mode: RuntimeMode,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve { host, port, mode } => serve(host, port, mode).await,
        Commands::Resolve {
            content_id,
            kind,
            magnets,
            credential,
            mode,
        } => resolve(&content_id, &kind, magnets, credential, mode).await,
        Commands::Catalog {
            kind,
            genre,
            skip,
            mode,
        } => catalog(&kind, genre, skip, mode).await,
    }
}

/// Start the addon server
///
/// # Errors
/// - Server components could not be built or the address could not be bound
pub async fn serve(host: Option<String>, port: Option<u16>, mode: RuntimeMode) -> anyhow::Result<()> {
    let mut config = GatewayConfig::from_env();
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!(mode = %mode, address = %config.server.bind_address(), "Starting addon server");
    streamgate_web::run_server(config, mode)
        .await
        .context("Addon server stopped")
}

/// Resolve streams for a content id
///
/// Candidates come from `--magnet` flags followed by the configured
/// candidates file.
///
/// # Errors
/// - Content id or kind is malformed
/// - A `--magnet` value is not a magnet link
/// - Unlock client or candidates file could not be set up
pub async fn resolve(
    content_id: &str,
    kind: &str,
    magnets: Vec<String>,
    credential: Option<String>,
    mode: RuntimeMode,
) -> anyhow::Result<()> {
    let config = GatewayConfig::from_env();
    let kind: MediaKind = kind.parse()?;
    let content = ContentId::parse(content_id)?;

    let mut candidates = magnets
        .iter()
        .map(|magnet| {
            CandidateSource::from_magnet(magnet).with_context(|| format!("Invalid magnet {magnet}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let discovery: Box<dyn CandidateDiscovery> = match &config.discovery.candidates_file {
        Some(path) => Box::new(StaticCandidates::from_file(path).await?),
        None => Box::new(NoDiscovery),
    };
    candidates.extend(discovery.discover(&content, kind).await);

    let credential = credential
        .and_then(UnlockCredential::new)
        .or_else(|| config.unlock.initial_credential.clone());

    let catalog = CatalogService::from_config(mode, &config.metadata)?;
    let title = catalog.content_title(content, kind).await;

    let unlock = RealDebridClient::new(&config.unlock)?;
    let resolver = StreamResolver::new(std::sync::Arc::new(unlock), config.resolver.clone());
    let streams = resolver
        .resolve(&title, &candidates, credential.as_ref())
        .await;

    println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "streams": streams }))?);
    Ok(())
}

/// Print one catalog page
///
/// # Errors
/// - Kind is malformed
/// - Metadata provider failed
pub async fn catalog(
    kind: &str,
    genre: Option<String>,
    skip: u32,
    mode: RuntimeMode,
) -> anyhow::Result<()> {
    let config = GatewayConfig::from_env();
    let kind: MediaKind = kind.parse()?;

    let catalog = CatalogService::from_config(mode, &config.metadata)?;
    let metas = catalog
        .list_catalog(kind, POPULAR_CATALOG_ID, &CatalogExtra { genre, skip })
        .await?;

    println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "metas": metas }))?);
    Ok(())
}

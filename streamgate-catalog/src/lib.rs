//! Streamgate Catalog - catalog listings and title metadata
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Lists popular titles from TMDB for the player's catalog screens and looks
//! up display titles used to label resolved streams. Development mode serves
//! a small offline demo catalog instead.

pub mod errors;
pub mod genres;
pub mod metadata;
pub mod providers;
pub mod service;
pub mod tmdb;
pub mod types;

// Re-export main types
pub use errors::CatalogError;
pub use metadata::OmdbMetadata;
pub use providers::{CatalogProvider, DemoProvider, TitleLookup};
pub use service::{CatalogService, POPULAR_CATALOG_ID};
pub use tmdb::TmdbClient;
pub use types::{CatalogExtra, MetaPreview, PAGE_SIZE, TitleInfo};

/// Convenience type alias for Results with CatalogError.
pub type Result<T> = std::result::Result<T, CatalogError>;

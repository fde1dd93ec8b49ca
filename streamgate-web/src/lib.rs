//! Streamgate Web - Addon HTTP server

#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Serves the player-facing addon protocol: manifest, catalogs and streams,
//! plus the HTML page where users store their Real-Debrid key.

pub mod components;
pub mod errors;
pub mod handlers;
pub mod manifest;
pub mod server;

// Re-export main types
pub use errors::ApiError;
pub use manifest::Manifest;
pub use server::{AppState, build_router, run_server};

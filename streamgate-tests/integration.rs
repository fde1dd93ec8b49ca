//! Integration tests for Streamgate
//!
//! These tests verify the interaction between the resolver, the Real-Debrid
//! client, candidate discovery and the metadata layer.

#[path = "integration/real_debrid_resolution.rs"]
mod real_debrid_resolution;

#[path = "integration/ordered_resolution.rs"]
mod ordered_resolution;

#[path = "integration/candidates_file.rs"]
mod candidates_file;

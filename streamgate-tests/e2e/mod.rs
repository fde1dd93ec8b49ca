//! End-to-end tests for Streamgate
//!
//! These tests run the addon router on a real socket and drive it the way a
//! player does: manifest, catalog, configure, streams.

mod addon_workflow;

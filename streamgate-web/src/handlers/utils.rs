//! Utility functions for addon path parsing

use streamgate_core::MediaKind;

use crate::errors::ApiError;

/// Strips the `.json` suffix the player appends to resource paths.
pub fn strip_json_suffix(segment: &str) -> Result<&str, ApiError> {
    segment
        .strip_suffix(".json")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest {
            reason: format!("Expected a .json resource, got {segment:?}"),
        })
}

/// Parses the media kind path segment.
pub fn parse_kind(segment: &str) -> Result<MediaKind, ApiError> {
    segment.parse::<MediaKind>().map_err(ApiError::from)
}

//! Data types for catalog responses and title metadata.

use serde::{Deserialize, Serialize};
use streamgate_core::MediaKind;

/// Number of items one catalog page holds upstream.
pub const PAGE_SIZE: u32 = 20;

/// Catalog entry in the player's `metas` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaPreview {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
}

/// Title and year used to label streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleInfo {
    pub title: String,
    pub year: Option<u16>,
}

/// Optional catalog filters carried in the request's extra path segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogExtra {
    pub genre: Option<String>,
    pub skip: u32,
}

impl CatalogExtra {
    /// Parses a still percent-encoded `genre=Action&skip=40`.
    ///
    /// Values are decoded after splitting. Unknown keys and bad numbers are ignored.
    pub fn parse(segment: &str) -> Self {
        let mut extra = Self::default();
        for pair in segment.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            match key {
                "genre" if !value.is_empty() => extra.genre = Some(value),
                "skip" => extra.skip = value.parse().unwrap_or(0),
                _ => {}
            }
        }
        extra
    }

    /// Upstream page number (1-based) for this offset.
    pub fn page(&self) -> u32 {
        self.skip / PAGE_SIZE + 1
    }
}

/// Parses the leading year of a `YYYY-MM-DD` date, or a bare `YYYY`.
pub fn year_from_date(date: &str) -> Option<u16> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| u16::try_from(chrono::Datelike::year(&d)).ok())
        .or_else(|| date.get(..4).and_then(|y| y.parse().ok()))
}

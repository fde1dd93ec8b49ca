//! Magnet link parsing utilities

use super::SourceError;

/// Fields of a magnet link that candidate construction needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMagnet {
    /// Hash from the `xt=urn:btih:` topic, as written in the link
    pub hash: String,
    pub display_name: Option<String>,
}

/// Magnet link parsing utilities.
pub struct MagnetParser;

impl MagnetParser {
    /// Parses a magnet link into its hash and display name.
    ///
    /// The hash is not validated here; malformed hashes are rejected later,
    /// when a peer-to-peer stream would be built from them.
    ///
    /// # Errors
    /// - `SourceError::InvalidMagnet` - Malformed magnet URI or missing btih topic
    pub fn parse(uri: &str) -> Result<ParsedMagnet, SourceError> {
        let magnet = magnet_url::Magnet::new(uri).map_err(|e| SourceError::InvalidMagnet {
            reason: format!("{e}"),
        })?;

        let hash = Self::extract_btih(uri).ok_or_else(|| SourceError::InvalidMagnet {
            reason: format!("missing xt=urn:btih topic in {uri}"),
        })?;

        Ok(ParsedMagnet {
            hash,
            display_name: magnet.display_name().map(|name| {
                urlencoding::decode(name).map_or_else(|_| name.to_string(), |d| d.into_owned())
            }),
        })
    }

    /// Finds the btih topic among the query parameters.
    fn extract_btih(uri: &str) -> Option<String> {
        let query = uri.split_once('?').map(|(_, query)| query)?;
        query
            .split('&')
            .find_map(|param| param.strip_prefix("xt=urn:btih:"))
            .filter(|hash| !hash.is_empty())
            .map(str::to_string)
    }
}

//! Playable stream descriptors in the player's JSON contract.

use serde::Serialize;

use crate::source::InfoHash;

/// Provider tag on streams served through the unlock service.
pub const DIRECT_STREAM_TAG: &str = "[RD+] streamgate";

/// Provider tag on streams the player resolves from the swarm itself.
pub const PEER_STREAM_TAG: &str = "[P2P] streamgate";

/// Output unit of stream resolution.
///
/// Serialized untagged so the player sees either `{name, title, url}` or
/// `{name, title, infoHash, sources}`, never a mix of both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StreamDescriptor {
    Direct {
        name: String,
        title: String,
        url: String,
    },
    #[serde(rename_all = "camelCase")]
    PeerToPeer {
        name: String,
        title: String,
        info_hash: InfoHash,
        sources: Vec<String>,
    },
}

impl StreamDescriptor {
    /// Direct-URL stream for an unlocked file.
    pub fn direct(display: &str, file_name: &str, url: impl Into<String>) -> Self {
        Self::Direct {
            name: DIRECT_STREAM_TAG.to_string(),
            title: format!("{display}\n{file_name}"),
            url: url.into(),
        }
    }

    /// Peer-to-peer stream referencing the original source.
    pub fn peer_to_peer(
        display: &str,
        label: &str,
        info_hash: InfoHash,
        reference: impl Into<String>,
    ) -> Self {
        Self::PeerToPeer {
            name: PEER_STREAM_TAG.to_string(),
            title: format!("{display}\n{label}"),
            info_hash,
            sources: vec![reference.into()],
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Direct { .. })
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Direct { title, .. } | Self::PeerToPeer { title, .. } => title,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_direct_stream_json_shape() {
        let stream = StreamDescriptor::direct("The Matrix (1999)", "c.mp4", "https://cdn/c.mp4");
        assert_eq!(
            serde_json::to_value(&stream).unwrap(),
            json!({
                "name": "[RD+] streamgate",
                "title": "The Matrix (1999)\nc.mp4",
                "url": "https://cdn/c.mp4"
            })
        );
    }

    #[test]
    fn test_peer_stream_json_shape() {
        let hash = InfoHash::new([0x11; 20]);
        let stream =
            StreamDescriptor::peer_to_peer("tt0133093", "Matrix.1080p", hash, "magnet:?xt=urn:btih:x");
        let value = serde_json::to_value(&stream).unwrap();
        assert_eq!(value["infoHash"], json!("11".repeat(20)));
        assert_eq!(value["sources"], json!(["magnet:?xt=urn:btih:x"]));
        assert_eq!(value["name"], json!("[P2P] streamgate"));
        assert!(value.get("url").is_none());
        assert!(!stream.is_direct());
    }
}

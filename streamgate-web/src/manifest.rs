//! Addon manifest advertised to the player.

use serde::Serialize;
use streamgate_catalog::POPULAR_CATALOG_ID;
use streamgate_catalog::genres::genre_names;
use streamgate_core::MediaKind;

/// Stable addon identifier.
pub const ADDON_ID: &str = "org.streamgate.addon";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: &'static str,
    pub version: &'static str,
    pub name: String,
    pub description: &'static str,
    pub resources: Vec<&'static str>,
    pub types: Vec<MediaKind>,
    pub id_prefixes: Vec<&'static str>,
    pub catalogs: Vec<ManifestCatalog>,
    pub behavior_hints: BehaviorHints,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestCatalog {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub id: &'static str,
    pub name: String,
    pub extra: Vec<ExtraProp>,
    pub extra_supported: Vec<&'static str>,
}

/// Catalog filter the player may send in the extra path segment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraProp {
    pub name: &'static str,
    pub is_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<&'static str>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorHints {
    pub configurable: bool,
}

impl Manifest {
    /// Builds the manifest for an addon display name.
    pub fn new(addon_name: &str) -> Self {
        Self {
            id: ADDON_ID,
            version: env!("CARGO_PKG_VERSION"),
            name: addon_name.to_string(),
            description: "Catalogs from TMDB with Real-Debrid and peer-to-peer streams",
            resources: vec!["catalog", "stream"],
            types: vec![MediaKind::Movie, MediaKind::Series],
            id_prefixes: vec!["tt", "tmdb:"],
            catalogs: [MediaKind::Movie, MediaKind::Series]
                .into_iter()
                .map(|kind| popular_catalog(addon_name, kind))
                .collect(),
            behavior_hints: BehaviorHints { configurable: true },
        }
    }
}

fn popular_catalog(addon_name: &str, kind: MediaKind) -> ManifestCatalog {
    let label = match kind {
        MediaKind::Movie => "Popular Movies",
        MediaKind::Series => "Popular Series",
    };

    ManifestCatalog {
        kind,
        id: POPULAR_CATALOG_ID,
        name: format!("{addon_name} {label}"),
        extra: vec![
            ExtraProp {
                name: "genre",
                is_required: false,
                options: Some(genre_names(kind)),
            },
            ExtraProp {
                name: "skip",
                is_required: false,
                options: None,
            },
        ],
        extra_supported: vec!["genre", "skip"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_shape() {
        let json = serde_json::to_value(Manifest::new("Streamgate")).unwrap();

        assert_eq!(json["id"], ADDON_ID);
        assert_eq!(json["resources"], serde_json::json!(["catalog", "stream"]));
        assert_eq!(json["types"], serde_json::json!(["movie", "series"]));
        assert_eq!(json["idPrefixes"], serde_json::json!(["tt", "tmdb:"]));
        assert_eq!(json["behaviorHints"]["configurable"], true);

        let catalogs = json["catalogs"].as_array().unwrap();
        assert_eq!(catalogs.len(), 2);
        assert_eq!(catalogs[0]["type"], "movie");
        assert_eq!(catalogs[0]["id"], "popular");
        assert_eq!(catalogs[1]["type"], "series");

        let genre = &catalogs[0]["extra"][0];
        assert_eq!(genre["name"], "genre");
        assert!(
            genre["options"]
                .as_array()
                .unwrap()
                .contains(&serde_json::json!("Science Fiction"))
        );
        assert!(catalogs[0]["extra"][1].get("options").is_none());
    }
}

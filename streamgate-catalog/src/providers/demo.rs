//! Demo provider implementation for development and testing.

use async_trait::async_trait;
use streamgate_core::{ContentId, MediaKind};

use super::{CatalogProvider, TitleLookup};
use crate::errors::CatalogError;
use crate::genres;
use crate::types::{CatalogExtra, MetaPreview, PAGE_SIZE, TitleInfo};

struct DemoTitle {
    imdb_id: &'static str,
    kind: MediaKind,
    name: &'static str,
    year: u16,
    genre_ids: &'static [u32],
    description: &'static str,
}

const DEMO_TITLES: &[DemoTitle] = &[
    DemoTitle {
        imdb_id: "tt1254207",
        kind: MediaKind::Movie,
        name: "Big Buck Bunny",
        year: 2008,
        genre_ids: &[16, 35],
        description: "A giant rabbit takes revenge on three bullying rodents.",
    },
    DemoTitle {
        imdb_id: "tt1727587",
        kind: MediaKind::Movie,
        name: "Sintel",
        year: 2010,
        genre_ids: &[16, 14, 12],
        description: "A lonely girl searches for the baby dragon she once befriended.",
    },
    DemoTitle {
        imdb_id: "tt2285752",
        kind: MediaKind::Movie,
        name: "Tears of Steel",
        year: 2012,
        genre_ids: &[878, 28],
        description: "Warriors and scientists gather in Amsterdam to save the world from robots.",
    },
    DemoTitle {
        imdb_id: "tt0944947",
        kind: MediaKind::Series,
        name: "Game of Thrones",
        year: 2011,
        genre_ids: &[10765, 18],
        description: "Noble families fight for control of the Iron Throne.",
    },
];

/// Demo provider for development.
///
/// Serves a handful of openly licensed titles without external API calls,
/// so the addon works offline with no API keys.
#[derive(Debug, Default)]
pub struct DemoProvider;

impl DemoProvider {
    pub fn new() -> Self {
        Self
    }

    fn preview(title: &DemoTitle) -> MetaPreview {
        MetaPreview {
            id: title.imdb_id.to_string(),
            kind: title.kind,
            name: title.name.to_string(),
            poster: None,
            release_info: Some(title.year.to_string()),
            description: Some(title.description.to_string()),
            genres: genres::genre_labels(title.genre_ids),
        }
    }
}

#[async_trait]
impl CatalogProvider for DemoProvider {
    async fn list(
        &self,
        kind: MediaKind,
        extra: &CatalogExtra,
    ) -> Result<Vec<MetaPreview>, CatalogError> {
        let genre_code = match &extra.genre {
            Some(name) => match genres::genre_code(kind, name) {
                Some(code) => Some(code),
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        Ok(DEMO_TITLES
            .iter()
            .filter(|title| title.kind == kind)
            .filter(|title| genre_code.is_none_or(|code| title.genre_ids.contains(&code)))
            .skip(extra.skip as usize)
            .take(PAGE_SIZE as usize)
            .map(Self::preview)
            .collect())
    }
}

#[async_trait]
impl TitleLookup for DemoProvider {
    async fn lookup_title(
        &self,
        content: &ContentId,
        _kind: MediaKind,
    ) -> Result<TitleInfo, CatalogError> {
        DEMO_TITLES
            .iter()
            .find(|title| title.imdb_id == content.base_id())
            .map(|title| TitleInfo {
                title: title.name.to_string(),
                year: Some(title.year),
            })
            .ok_or_else(|| CatalogError::NotFound {
                content_id: content.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lists_only_requested_kind() {
        let provider = DemoProvider::new();
        let movies = provider
            .list(MediaKind::Movie, &CatalogExtra::default())
            .await
            .unwrap();
        assert_eq!(movies.len(), 3);
        assert!(movies.iter().all(|m| m.kind == MediaKind::Movie));

        let series = provider
            .list(MediaKind::Series, &CatalogExtra::default())
            .await
            .unwrap();
        assert_eq!(series[0].name, "Game of Thrones");
        assert_eq!(series[0].genres, vec!["Sci-Fi & Fantasy", "Drama"]);
    }

    #[tokio::test]
    async fn test_genre_filter_and_unknown_genre() {
        let provider = DemoProvider::new();
        let extra = CatalogExtra {
            genre: Some("Science Fiction".to_string()),
            skip: 0,
        };
        let found = provider.list(MediaKind::Movie, &extra).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "tt2285752");

        let extra = CatalogExtra {
            genre: Some("Polka".to_string()),
            skip: 0,
        };
        assert!(provider.list(MediaKind::Movie, &extra).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_title_by_episode_id() {
        let provider = DemoProvider::new();
        let id = ContentId::parse("tt0944947:1:1").unwrap();
        let info = provider.lookup_title(&id, MediaKind::Series).await.unwrap();
        assert_eq!(info.title, "Game of Thrones");

        let unknown = ContentId::parse("tt0000001").unwrap();
        assert!(matches!(
            provider.lookup_title(&unknown, MediaKind::Movie).await,
            Err(CatalogError::NotFound { .. })
        ));
    }
}

//! Content identifiers and media kinds as they arrive on request paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a request names content in a form we cannot accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentIdError {
    #[error("Content id is empty")]
    Empty,

    #[error("Malformed content id '{raw}': {reason}")]
    Malformed { raw: String, reason: String },

    #[error("Unsupported media kind: {kind}")]
    UnsupportedKind { kind: String },
}

/// Kind of media addressed by a catalog or stream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    /// Path segment used by the player protocol.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = ContentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            _ => Err(ContentIdError::UnsupportedKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// Namespace of the identifier the player sent us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdNamespace {
    /// `tt0133093`
    Imdb,
    /// `tmdb:603`
    Tmdb,
}

/// Season/episode pair carried by series stream requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpisodeRef {
    pub season: u32,
    pub episode: u32,
}

/// External identifier naming a movie or a series episode.
///
/// Accepted forms are `tt<digits>` and `tmdb:<digits>`, each optionally
/// followed by `:<season>:<episode>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentId {
    raw: String,
    namespace: IdNamespace,
    base: String,
    episode: Option<EpisodeRef>,
}

impl ContentId {
    /// Parses a content id from a request path segment.
    ///
    /// # Errors
    ///
    /// - `ContentIdError::Empty` - Input is blank
    /// - `ContentIdError::Malformed` - Input does not match any accepted form
    pub fn parse(raw: &str) -> Result<Self, ContentIdError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ContentIdError::Empty);
        }

        let malformed = |reason: &str| ContentIdError::Malformed {
            raw: raw.to_string(),
            reason: reason.to_string(),
        };

        let (namespace, rest) = match raw.strip_prefix("tmdb:") {
            Some(rest) => (IdNamespace::Tmdb, rest),
            None => (IdNamespace::Imdb, raw),
        };

        let parts: Vec<&str> = rest.split(':').collect();
        let base = parts[0];

        let base_is_valid = match namespace {
            IdNamespace::Imdb => base
                .strip_prefix("tt")
                .is_some_and(|digits| is_all_digits(digits)),
            IdNamespace::Tmdb => is_all_digits(base),
        };
        if !base_is_valid {
            return Err(malformed("expected tt<digits> or tmdb:<digits>"));
        }

        let episode = match parts.as_slice() {
            [_] => None,
            [_, season, episode] => Some(EpisodeRef {
                season: season
                    .parse()
                    .map_err(|_| malformed("season is not a number"))?,
                episode: episode
                    .parse()
                    .map_err(|_| malformed("episode is not a number"))?,
            }),
            _ => return Err(malformed("expected <id> or <id>:<season>:<episode>")),
        };

        let base = match namespace {
            IdNamespace::Imdb => base.to_string(),
            IdNamespace::Tmdb => format!("tmdb:{base}"),
        };

        Ok(Self {
            raw: raw.to_string(),
            namespace,
            base,
            episode,
        })
    }

    /// Full identifier as received.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn namespace(&self) -> IdNamespace {
        self.namespace
    }

    /// Identifier of the title without the episode suffix (`tt0944947`, `tmdb:1399`).
    pub fn base_id(&self) -> &str {
        &self.base
    }

    /// Numeric part of the title identifier, without `tt` or `tmdb:` prefix.
    pub fn numeric_id(&self) -> &str {
        match self.namespace {
            IdNamespace::Imdb => self.base.trim_start_matches("tt"),
            IdNamespace::Tmdb => self.base.trim_start_matches("tmdb:"),
        }
    }

    pub fn episode(&self) -> Option<EpisodeRef> {
        self.episode
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ContentId {
    type Err = ContentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Content id paired with the human-readable line shown on every stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTitle {
    pub id: ContentId,
    pub display: String,
}

impl ContentTitle {
    /// Builds the display line from looked-up metadata.
    pub fn from_metadata(id: ContentId, title: &str, year: Option<u16>) -> Self {
        let mut display = match year {
            Some(year) => format!("{title} ({year})"),
            None => title.to_string(),
        };
        if let Some(EpisodeRef { season, episode }) = id.episode() {
            display.push_str(&format!(" S{season:02}E{episode:02}"));
        }
        Self { id, display }
    }

    /// Label used when metadata lookup failed: the raw content id.
    pub fn fallback(id: ContentId) -> Self {
        let display = id.to_string();
        Self { id, display }
    }
}

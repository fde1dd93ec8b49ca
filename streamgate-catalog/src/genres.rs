//! Fixed lookup table from TMDB genre codes to labels.

use streamgate_core::MediaKind;

/// Movie genre codes.
pub const MOVIE_GENRES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// Series genre codes. Several codes are shared with movies.
pub const SERIES_GENRES: &[(u32, &str)] = &[
    (10759, "Action & Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (10762, "Kids"),
    (9648, "Mystery"),
    (10763, "News"),
    (10764, "Reality"),
    (10765, "Sci-Fi & Fantasy"),
    (10766, "Soap"),
    (10767, "Talk"),
    (10768, "War & Politics"),
    (37, "Western"),
];

fn table(kind: MediaKind) -> &'static [(u32, &'static str)] {
    match kind {
        MediaKind::Movie => MOVIE_GENRES,
        MediaKind::Series => SERIES_GENRES,
    }
}

/// Label for a genre code, searching movie codes first, then series codes.
pub fn genre_name(code: u32) -> Option<&'static str> {
    MOVIE_GENRES
        .iter()
        .chain(SERIES_GENRES)
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Code for a genre label within one media kind, case-insensitive.
pub fn genre_code(kind: MediaKind, name: &str) -> Option<u32> {
    table(kind)
        .iter()
        .find(|(_, label)| label.eq_ignore_ascii_case(name.trim()))
        .map(|(code, _)| *code)
}

/// Labels offered as catalog filter options.
pub fn genre_names(kind: MediaKind) -> Vec<&'static str> {
    table(kind).iter().map(|(_, name)| *name).collect()
}

/// Maps codes to labels, skipping codes the table does not know.
pub fn genre_labels(codes: &[u32]) -> Vec<String> {
    codes
        .iter()
        .filter_map(|code| genre_name(*code))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_map_to_labels() {
        assert_eq!(genre_name(28), Some("Action"));
        assert_eq!(genre_name(878), Some("Science Fiction"));
        assert_eq!(genre_name(10765), Some("Sci-Fi & Fantasy"));
        assert_eq!(genre_name(1), None);
    }

    #[test]
    fn test_reverse_lookup_is_per_kind_and_case_insensitive() {
        assert_eq!(genre_code(MediaKind::Movie, "science fiction"), Some(878));
        assert_eq!(genre_code(MediaKind::Series, "Kids"), Some(10762));
        assert_eq!(genre_code(MediaKind::Movie, "Kids"), None);
    }

    #[test]
    fn test_labels_skip_unknown_codes() {
        assert_eq!(genre_labels(&[28, 999_999, 53]), vec!["Action", "Thriller"]);
    }

    #[test]
    fn test_codes_are_unique_per_table() {
        for table in [MOVIE_GENRES, SERIES_GENRES] {
            let mut codes: Vec<u32> = table.iter().map(|(c, _)| *c).collect();
            codes.sort_unstable();
            codes.dedup();
            assert_eq!(codes.len(), table.len());
        }
        assert_eq!(genre_names(MediaKind::Movie).len(), MOVIE_GENRES.len());
    }
}

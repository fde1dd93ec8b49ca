//! File selection inside an unlocked job.

use crate::source::FileEntry;

/// Recognised video file suffixes, compared case-insensitively.
pub const VIDEO_SUFFIXES: &[&str] = &[
    "mkv", "mp4", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "ts", "m2ts",
];

/// Checks whether a file name ends with a recognised video suffix.
pub fn is_video_file(name: &str) -> bool {
    let Some((_, extension)) = name.rsplit_once('.') else {
        return false;
    };
    VIDEO_SUFFIXES
        .iter()
        .any(|suffix| extension.eq_ignore_ascii_case(suffix))
}

/// Picks the largest video file.
///
/// A file replaces the current best only when strictly larger, so ties keep
/// the earliest entry and zero-byte files are never picked.
pub fn select_largest_video(files: &[FileEntry]) -> Option<&FileEntry> {
    let mut best: Option<&FileEntry> = None;
    let mut best_size = 0;

    for file in files.iter().filter(|file| is_video_file(&file.name)) {
        if file.size > best_size {
            best = Some(file);
            best_size = file.size;
        }
    }

    best
}

/// File name with any directory components stripped.
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(entries: &[(&str, u64)]) -> Vec<FileEntry> {
        entries
            .iter()
            .map(|(name, size)| FileEntry::new(*name, *size))
            .collect()
    }

    #[test]
    fn test_largest_matching_suffix_wins() {
        let files = files(&[("a.txt", 100), ("b.mkv", 50), ("c.mp4", 200)]);
        assert_eq!(select_largest_video(&files).unwrap().name, "c.mp4");
    }

    #[test]
    fn test_non_video_files_are_ignored_even_when_larger() {
        let files = files(&[("movie.mkv", 10), ("bonus.iso", 5_000), ("subs.srt", 900)]);
        assert_eq!(select_largest_video(&files).unwrap().name, "movie.mkv");
    }

    #[test]
    fn test_tie_keeps_earliest_entry() {
        let files = files(&[("first.mkv", 300), ("second.mp4", 300)]);
        assert_eq!(select_largest_video(&files).unwrap().name, "first.mkv");
    }

    #[test]
    fn test_suffix_match_is_case_insensitive() {
        let files = files(&[("MOVIE.MKV", 1), ("Clip.Mp4", 2)]);
        assert_eq!(select_largest_video(&files).unwrap().name, "Clip.Mp4");
    }

    #[test]
    fn test_no_match_returns_none() {
        assert!(select_largest_video(&files(&[("readme.txt", 1), ("mkv", 5)])).is_none());
        assert!(select_largest_video(&files(&[("empty.mkv", 0)])).is_none());
        assert!(select_largest_video(&[]).is_none());
    }

    #[test]
    fn test_base_name_strips_directories() {
        assert_eq!(base_name("/Movie.2020/Movie.2020.1080p.mkv"), "Movie.2020.1080p.mkv");
        assert_eq!(base_name("Season 1\\e01.mkv"), "e01.mkv");
        assert_eq!(base_name("plain.mp4"), "plain.mp4");
    }
}

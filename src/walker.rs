use std::path::{Path, PathBuf};

use crate::error::Result;

/// Suffixes that mark a path as a video.
const VIDEO_SUFFIXES: &[&str] = &["mp4", "mkv", "avi", "m4v"];

/// Whether `path` names a video file.
///
/// This compares the last three characters of the whole path, not the
/// extension: `clip.mp4` and `clipmp4` both qualify.
pub fn is_video(path: &Path) -> bool {
    let raw = path.to_string_lossy();
    raw.len() >= 3
        && VIDEO_SUFFIXES.iter().any(|suffix| raw.ends_with(suffix))
}

/// Recursively walk `root` and return every video file, in lexical order
/// within each directory.
///
/// Directories are descended, everything else is a candidate. Symlinks are
/// not followed into directories. Any read error aborts the walk.
pub fn discover_videos(root: &Path) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();
    walk_dir(root, &mut results)?;
    Ok(results)
}

fn walk_dir(current: &Path, results: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = std::fs::read_dir(current)?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            walk_dir(&path, results)?;
        } else if is_video(&path) {
            results.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root).unwrap().to_string_lossy().to_string()
            })
            .collect()
    }

    #[test]
    fn suffix_rule() {
        assert!(is_video(Path::new("a/b.mp4")));
        assert!(is_video(Path::new("a/b.mkv")));
        assert!(is_video(Path::new("a/b.avi")));
        assert!(is_video(Path::new("a/b.m4v")));
        assert!(!is_video(Path::new("a/b.en.srt")));
        assert!(!is_video(Path::new("a/b.MP4")));
        assert!(!is_video(Path::new("mp")));
    }

    #[test]
    fn suffix_without_dot_counts_as_video() {
        assert!(is_video(Path::new("library/xmp4")));
        assert!(is_video(Path::new("library/clipmkv")));
    }

    #[test]
    fn discovers_only_videos() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("ep1.mkv"), "").unwrap();
        std::fs::write(tmp.path().join("ep1.en.srt"), "").unwrap();
        std::fs::write(tmp.path().join("cover.jpg"), "").unwrap();

        let files = discover_videos(tmp.path()).unwrap();
        assert_eq!(names(tmp.path(), &files), vec!["ep1.mkv"]);
    }

    #[test]
    fn recurses_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        let season = tmp.path().join("Season 1");
        std::fs::create_dir(&season).unwrap();
        std::fs::write(season.join("s01e01.mp4"), "").unwrap();
        std::fs::write(tmp.path().join("special.avi"), "").unwrap();

        let files = discover_videos(tmp.path()).unwrap();
        assert_eq!(
            names(tmp.path(), &files),
            vec!["Season 1/s01e01.mp4", "special.avi"]
        );
    }

    #[test]
    fn directory_named_like_a_video_is_descended_not_indexed() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("extras.mp4");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("inner.m4v"), "").unwrap();

        let files = discover_videos(tmp.path()).unwrap();
        assert_eq!(names(tmp.path(), &files), vec!["extras.mp4/inner.m4v"]);
    }

    #[test]
    fn hidden_files_are_included() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(".pilot.mp4"), "").unwrap();

        let files = discover_videos(tmp.path()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn results_are_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("z.mp4"), "").unwrap();
        std::fs::write(tmp.path().join("a.mp4"), "").unwrap();
        std::fs::write(tmp.path().join("m.mp4"), "").unwrap();

        let files = discover_videos(tmp.path()).unwrap();
        assert_eq!(names(tmp.path(), &files), vec!["a.mp4", "m.mp4", "z.mp4"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(discover_videos(&tmp.path().join("nope")).is_err());
    }

    #[test]
    fn empty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(discover_videos(tmp.path()).unwrap().is_empty());
    }
}

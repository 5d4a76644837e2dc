//! Sidecar detection for a single media file
//!
//! Ties the scanner, conflict resolver and sorter together:
//! entries -> classify + score -> threshold -> resolve conflicts -> sort.

use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use super::candidate::Candidate;
use super::conflict_resolver::{partition, resolve_conflicts};
use super::scanner::{collect, scan_entries, DirectoryReader, SearchRequest, UnreadableDir};
use super::sorting::{sort_candidates, AsciiCollator, Collator};
use crate::error::Result;

/// Outcome of one detection call
#[derive(Debug, Clone, Default, Serialize)]
pub struct Detection {
    pub media_path: PathBuf,
    /// Accepted companions, best first
    pub candidates: Vec<Candidate>,
    /// Companions dropped by the conflict resolver, with reasons
    pub rejected: Vec<Candidate>,
    pub unreadable_dirs: Vec<UnreadableDir>,
}

impl Detection {
    fn empty(request: &SearchRequest) -> Self {
        Self {
            media_path: request.media_path.clone(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Detect companions for `request` using ASCII collation for ordering.
pub fn detect<R>(request: &SearchRequest, reader: &R) -> Result<Detection>
where
    R: DirectoryReader + ?Sized,
{
    detect_with_collator(request, reader, &AsciiCollator)
}

/// Detect companions for `request`, ordering equal priorities with `collator`.
///
/// A disabled threshold returns an empty result without reading any
/// directory. Invalid media paths are reported before any directory is read.
pub fn detect_with_collator<R>(
    request: &SearchRequest,
    reader: &R,
    collator: &dyn Collator,
) -> Result<Detection>
where
    R: DirectoryReader + ?Sized,
{
    if request.threshold.is_disabled() {
        debug!(media = %request.media_path.display(), "Companion detection disabled");
        return Ok(Detection::empty(request));
    }

    let dirs = request.search_dirs()?;
    let mut unreadable_dirs = Vec::new();
    let mut candidates = collect(request, scan_entries(reader, &dirs, &mut unreadable_dirs))?;

    resolve_conflicts(&mut candidates);
    let (mut accepted, mut rejected) = partition(candidates);
    sort_candidates(&mut accepted, collator);
    sort_candidates(&mut rejected, collator);

    debug!(
        media = %request.media_path.display(),
        accepted = accepted.len(),
        rejected = rejected.len(),
        unreadable = unreadable_dirs.len(),
        "Companion detection finished"
    );

    Ok(Detection {
        media_path: request.media_path.clone(),
        candidates: accepted,
        rejected,
        unreadable_dirs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io;
    use std::path::Path;

    use crate::error::CompanionError;
    use crate::services::match_scorer::{EntryLocation, MatchThreshold, Priority};
    use crate::services::scanner::{DirEntry, EntryType};

    /// In-memory directory tree that records every read
    #[derive(Default)]
    struct FakeReader {
        dirs: HashMap<PathBuf, Vec<&'static str>>,
        reads: RefCell<Vec<PathBuf>>,
    }

    impl FakeReader {
        fn with_dir(mut self, dir: &str, names: Vec<&'static str>) -> Self {
            self.dirs.insert(PathBuf::from(dir), names);
            self
        }
    }

    impl DirectoryReader for FakeReader {
        fn read_dir(&self, dir: &Path, location: EntryLocation) -> io::Result<Vec<DirEntry>> {
            self.reads.borrow_mut().push(dir.to_path_buf());
            let names = self
                .dirs
                .iter()
                .find(|(known, _)| known.as_path() == dir)
                .map(|(_, names)| names)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such directory"))?;
            Ok(names
                .iter()
                .map(|name| DirEntry {
                    name: name.to_string(),
                    dir: dir.to_path_buf(),
                    location,
                    file_type: EntryType::File,
                })
                .collect())
        }
    }

    fn request(level: i64) -> SearchRequest {
        SearchRequest::new("/movies/Movie.mkv")
            .with_search_paths("./Subs")
            .with_threshold(MatchThreshold::from_level(level).unwrap())
    }

    fn paths(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.path.as_str()).collect()
    }

    #[test]
    fn test_detect_orders_by_priority_then_path() {
        let reader = FakeReader::default()
            .with_dir(
                "/movies",
                vec!["Movie.mkv", "b.srt", "Movie.en.srt", "a.srt", "Movie.srt"],
            )
            .with_dir("/movies/Subs", vec!["Movie.ac3", "Other.srt"]);

        let detection = detect(&request(1), &reader).unwrap();
        assert_eq!(
            paths(&detection.candidates),
            vec![
                "/movies/Movie.srt",
                "/movies/Subs/Movie.ac3",
                "/movies/Movie.en.srt",
                "/movies/a.srt",
                "/movies/b.srt",
            ]
        );
        assert_eq!(detection.candidates[0].priority, Priority::MatchAll);
    }

    #[test]
    fn test_detect_rejects_paired_sub_and_weak_cdg() {
        let reader = FakeReader::default()
            .with_dir("/movies", vec!["Movie.sub", "Movie.idx", "Movie.karaoke.cdg"]);

        let detection = detect(&request(1), &reader).unwrap();
        assert_eq!(paths(&detection.candidates), vec!["/movies/Movie.idx"]);
        assert_eq!(
            paths(&detection.rejected),
            vec!["/movies/Movie.sub", "/movies/Movie.karaoke.cdg"]
        );
    }

    #[test]
    fn test_detect_reads_each_directory_once() {
        let reader = FakeReader::default()
            .with_dir("/movies", vec!["Movie.mkv", "Movie.srt"])
            .with_dir("/movies/Subs", vec!["Movie.en.srt"]);
        let request = request(1).with_search_paths("../movies, ./Subs, ./Subs/../Subs");

        let detection = detect(&request, &reader).unwrap();
        assert_eq!(
            paths(&detection.candidates),
            vec!["/movies/Movie.srt", "/movies/Subs/Movie.en.srt"]
        );
        assert_eq!(
            *reader.reads.borrow(),
            vec![PathBuf::from("/movies"), PathBuf::from("/movies/Subs")]
        );
    }

    #[test]
    fn test_detect_disabled_reads_nothing() {
        let reader = FakeReader::default().with_dir("/movies", vec!["Movie.srt"]);
        let detection = detect(&request(0), &reader).unwrap();
        assert!(detection.is_empty());
        assert!(reader.reads.borrow().is_empty());
    }

    #[test]
    fn test_detect_invalid_path_reads_nothing() {
        let reader = FakeReader::default();
        let err = detect(&SearchRequest::new(""), &reader).unwrap_err();
        assert!(matches!(err, CompanionError::EmptyPath));
        assert!(reader.reads.borrow().is_empty());
    }

    #[test]
    fn test_detect_skips_unreadable_dirs() {
        let reader = FakeReader::default().with_dir("/movies/Subs", vec!["Movie.srt"]);
        let detection = detect(&request(1), &reader).unwrap();

        assert_eq!(paths(&detection.candidates), vec!["/movies/Subs/Movie.srt"]);
        assert_eq!(detection.unreadable_dirs.len(), 1);
        assert_eq!(detection.unreadable_dirs[0].dir, PathBuf::from("/movies"));
        assert_eq!(reader.reads.borrow().len(), 2);
    }

    #[test]
    fn test_detect_is_independent_of_read_order() {
        let names = vec!["b.srt", "Movie.srt", "a.srt", "Movie.en.srt"];
        let mut reversed = names.clone();
        reversed.reverse();

        let forward =
            detect(&request(1), &FakeReader::default().with_dir("/movies", names)).unwrap();
        let backward =
            detect(&request(1), &FakeReader::default().with_dir("/movies", reversed)).unwrap();
        assert_eq!(forward.candidates, backward.candidates);
    }

    #[test]
    fn test_detect_custom_collator() {
        let reader = FakeReader::default().with_dir("/movies", vec!["a.srt", "b.srt"]);
        let reverse = |a: &str, b: &str| b.cmp(a);
        let detection = detect_with_collator(&request(1), &reader, &reverse).unwrap();
        assert_eq!(paths(&detection.candidates), vec!["/movies/b.srt", "/movies/a.srt"]);
    }
}

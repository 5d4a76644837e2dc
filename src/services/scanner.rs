//! Companion scanner
//!
//! Walks the media file's directory and any extra search directories,
//! classifies and scores every entry, and keeps the ones that clear the
//! configured threshold. Directory reading is behind [`DirectoryReader`] so
//! the scanning logic never touches the filesystem directly.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::candidate::Candidate;
use super::file_utils::{classify, normalize_path, resolve_path, same_path};
use super::match_scorer::{score_entry, EntryLocation, MatchThreshold};
use super::text_utils::normalize_name;
use crate::error::{CompanionError, Result};

/// Default extra directories searched for companions
pub const DEFAULT_SEARCH_PATHS: &str = "./Subtitles, ./subtitles, ./Subs, ./subs";

/// What a directory entry points at (after following symlinks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Directory,
    Other,
}

/// One entry produced by a [`DirectoryReader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub dir: PathBuf,
    pub location: EntryLocation,
    pub file_type: EntryType,
}

impl DirEntry {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }

    pub fn is_file(&self) -> bool {
        self.file_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.file_type == EntryType::Directory
    }

    /// `.`, `..`, empty names, and (unless shown) dot-files
    pub fn is_skipped(&self, show_hidden: bool) -> bool {
        self.name.is_empty()
            || self.name == "."
            || self.name == ".."
            || (!show_hidden && self.name.starts_with('.'))
    }
}

/// Source of directory listings.
///
/// Implementations must be reentrant if detection runs on several threads.
pub trait DirectoryReader {
    /// List the immediate children of `dir`, tagging each with `location`.
    fn read_dir(&self, dir: &Path, location: EntryLocation) -> io::Result<Vec<DirEntry>>;

    /// True if `read_dir` already returns entries in display order.
    fn is_sorted(&self) -> bool {
        false
    }
}

/// Reads real directories with `walkdir`, one level deep.
#[derive(Debug, Clone, Default)]
pub struct WalkDirReader {
    /// Report entry order sorted by file name instead of OS order
    pub sorted: bool,
}

impl DirectoryReader for WalkDirReader {
    fn read_dir(&self, dir: &Path, location: EntryLocation) -> io::Result<Vec<DirEntry>> {
        let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true);
        if self.sorted {
            walker = walker.sort_by_file_name();
        }

        let mut entries = Vec::new();
        for result in walker {
            match result {
                Ok(entry) => {
                    let Some(name) = entry.file_name().to_str() else {
                        debug!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                        continue;
                    };
                    let file_type = entry.file_type();
                    let file_type = if file_type.is_file() {
                        EntryType::File
                    } else if file_type.is_dir() {
                        EntryType::Directory
                    } else {
                        EntryType::Other
                    };
                    entries.push(DirEntry {
                        name: name.to_string(),
                        dir: dir.to_path_buf(),
                        location,
                        file_type,
                    });
                }
                // Failing to open the directory itself
                Err(err) if err.depth() == 0 => return Err(err.into()),
                Err(err) => {
                    debug!(dir = %dir.display(), error = %err, "Skipping unreadable entry");
                }
            }
        }
        Ok(entries)
    }

    fn is_sorted(&self) -> bool {
        self.sorted
    }
}

/// Which caller is asking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Single media file: extra directories only yield name matches
    #[default]
    Sidecar,
    /// Directory listing: every companion sits next to the items
    Listing,
}

impl SearchMode {
    /// Location used for the no-overlap fallback. Listing mode treats every
    /// entry as being in the primary directory.
    fn fallback_location(self, location: EntryLocation) -> EntryLocation {
        match self {
            SearchMode::Sidecar => location,
            SearchMode::Listing => EntryLocation::Primary,
        }
    }
}

/// A directory that could not be listed during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreadableDir {
    pub dir: PathBuf,
    pub reason: String,
}

/// Input to a companion search
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub media_path: PathBuf,
    /// Extra search directories; entries starting with `.` are relative to
    /// the media file's directory
    pub search_paths: Vec<String>,
    pub threshold: MatchThreshold,
    pub show_hidden: bool,
    pub mode: SearchMode,
}

impl SearchRequest {
    pub fn new(media_path: impl Into<PathBuf>) -> Self {
        Self {
            media_path: media_path.into(),
            search_paths: parse_search_paths(DEFAULT_SEARCH_PATHS),
            threshold: MatchThreshold::default(),
            show_hidden: false,
            mode: SearchMode::Sidecar,
        }
    }

    pub fn with_search_paths(mut self, paths: &str) -> Self {
        self.search_paths = parse_search_paths(paths);
        self
    }

    pub fn with_threshold(mut self, threshold: MatchThreshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_show_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Split the media path into its directory and file name.
    pub fn media_parts(&self) -> Result<(&Path, &str)> {
        if self.media_path.as_os_str().is_empty() {
            return Err(CompanionError::EmptyPath);
        }
        let no_base_name = || CompanionError::NoBaseName(self.media_path.display().to_string());
        let name = self
            .media_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(no_base_name)?;
        let dir = match self.media_path.parent().ok_or_else(no_base_name)? {
            // Bare file name: the current directory
            dir if dir.as_os_str().is_empty() => Path::new("."),
            dir => dir,
        };
        Ok((dir, name))
    }

    /// Directories to scan: the media directory first, then each extra
    /// directory in configured order, without repeats.
    ///
    /// Returned paths are lexically normalized. Repeats are detected on the
    /// resolved path, so `../<media dir>` or a link to it is not rescanned.
    pub fn search_dirs(&self) -> Result<Vec<(PathBuf, EntryLocation)>> {
        let (media_dir, _) = self.media_parts()?;
        let media_dir = normalize_path(media_dir);
        let mut seen = vec![resolve_path(&media_dir)];
        let mut dirs = vec![(media_dir, EntryLocation::Primary)];

        for entry in &self.search_paths {
            let dir = if entry.starts_with('.') {
                normalize_path(&dirs[0].0.join(entry))
            } else {
                normalize_path(Path::new(entry))
            };
            let resolved = resolve_path(&dir);
            if seen.contains(&resolved) {
                continue;
            }
            seen.push(resolved);
            dirs.push((dir, EntryLocation::Extra));
        }
        Ok(dirs)
    }
}

/// Split a comma-separated search path list, dropping blank entries.
pub fn parse_search_paths(paths: &str) -> Vec<String> {
    paths
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lazily read every search directory of `request` through `reader`.
///
/// Unreadable directories are logged, recorded in `failures`, and skipped.
/// Missing extra directories are skipped silently.
/// Nothing is read until the returned iterator is advanced.
pub fn scan_entries<'a, R>(
    reader: &'a R,
    dirs: &'a [(PathBuf, EntryLocation)],
    failures: &'a mut Vec<UnreadableDir>,
) -> impl Iterator<Item = DirEntry> + 'a
where
    R: DirectoryReader + ?Sized,
{
    dirs.iter().flat_map(move |(dir, location)| {
        debug!(dir = %dir.display(), "Looking for companion files");
        match reader.read_dir(dir, *location) {
            Ok(entries) => entries,
            // Extra directories are optional
            Err(source)
                if *location == EntryLocation::Extra && source.kind() == io::ErrorKind::NotFound =>
            {
                debug!(dir = %dir.display(), "Extra search directory does not exist");
                Vec::new()
            }
            Err(source) => {
                let err = CompanionError::ReadDir {
                    dir: dir.clone(),
                    source,
                };
                warn!(error = %err, "Skipping unreadable search directory");
                failures.push(UnreadableDir {
                    dir: dir.clone(),
                    reason: err.to_string(),
                });
                Vec::new()
            }
        }
    })
}

/// Classify, score and filter directory entries for one media file.
///
/// Entries are consumed lazily; a disabled threshold returns before the
/// first entry is pulled.
pub fn collect<I>(request: &SearchRequest, entries: I) -> Result<Vec<Candidate>>
where
    I: IntoIterator<Item = DirEntry>,
{
    if request.threshold.is_disabled() {
        return Ok(Vec::new());
    }
    let (_, media_name) = request.media_parts()?;
    let media_norm = normalize_name(media_name);

    let mut candidates = Vec::new();
    for entry in entries {
        if entry.is_skipped(request.show_hidden) {
            continue;
        }
        let Some(kind) = classify(&entry.name) else {
            continue;
        };

        let priority = score_entry(
            &normalize_name(&entry.name),
            &media_norm,
            request.mode.fallback_location(entry.location),
        );
        if !request.threshold.accepts(priority) || !entry.is_file() {
            continue;
        }

        let path = entry.path();
        // The media file itself, however its directory was spelled
        if entry.name == media_name && same_path(&path, &request.media_path) {
            continue;
        }
        let Some(path) = path.to_str().map(str::to_string) else {
            warn!(path = %path.display(), "Skipping companion with non UTF-8 path");
            continue;
        };

        debug!(path = %path, priority = %priority, "Autodetected companion");
        candidates.push(Candidate::new(path, kind, priority));
    }

    Ok(candidates)
}

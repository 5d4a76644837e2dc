//! Shared file extension utilities
//!
//! Centralizes the companion extension tables and the extension checks used
//! by both the sidecar scanner and the directory listing, plus the path
//! resolution used to tell directories and files apart.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Subtitle file extensions (lowercase, without the dot)
pub const SUBTITLE_EXTENSIONS: &[&str] = &[
    "idx", "sub", "srt", "ssa", "ass", "smi", "utf", "utf8", "utf-8", "rt", "aqt", "txt", "usf",
    "jss", "cdg", "psb", "mpsub", "mpl2", "pjs", "dks", "stl", "vtt", "sbv",
];

/// Secondary audio track extensions (lowercase, without the dot)
pub const AUDIO_EXTENSIONS: &[&str] = &["ac3"];

/// What kind of companion track a file provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanionKind {
    Subtitle,
    Audio,
}

/// Lookup tables in priority order. The first table containing the
/// extension decides the kind.
const COMPANION_TABLES: &[(CompanionKind, &[&str])] = &[
    (CompanionKind::Subtitle, SUBTITLE_EXTENSIONS),
    (CompanionKind::Audio, AUDIO_EXTENSIONS),
];

/// Get the text after the last `.` of a filename or path.
///
/// Returns `None` when there is no dot or nothing follows it.
///
/// # Example
/// ```
/// use librarian_companions::services::file_utils::get_extension;
/// assert_eq!(get_extension("movie.SRT"), Some("SRT"));
/// assert_eq!(get_extension("no_extension"), None);
/// assert_eq!(get_extension("trailing."), None);
/// ```
pub fn get_extension(name: &str) -> Option<&str> {
    let ext = &name[name.rfind('.')? + 1..];
    if ext.is_empty() { None } else { Some(ext) }
}

/// Classify a filename as a companion track by its extension.
///
/// # Arguments
/// * `filename` - File name (or path) to check
///
/// # Returns
/// The companion kind, or `None` for ordinary files
///
/// # Example
/// ```
/// use librarian_companions::services::file_utils::{classify, CompanionKind};
/// assert_eq!(classify("Movie.en.SRT"), Some(CompanionKind::Subtitle));
/// assert_eq!(classify("Movie.ac3"), Some(CompanionKind::Audio));
/// assert_eq!(classify("Movie.mkv"), None);
/// ```
pub fn classify(filename: &str) -> Option<CompanionKind> {
    let ext = get_extension(filename)?;
    COMPANION_TABLES
        .iter()
        .find(|(_, exts)| exts.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .map(|(kind, _)| *kind)
}

/// Check a filename against a comma-separated extension list.
///
/// Extensions in `exts` carry no dot and are compared case-insensitively
/// with the text after the last `.` of `name`. Surrounding whitespace in
/// list entries is ignored.
pub fn has_extension_in(exts: &str, name: &str) -> bool {
    let Some(ext) = get_extension(name) else {
        return false;
    };
    exts.split(',')
        .map(str::trim)
        .any(|candidate| !candidate.is_empty() && candidate.eq_ignore_ascii_case(ext))
}

/// Lexically normalize a path: drop `.` segments and fold `..` into the
/// preceding component. Symlinks are not consulted.
///
/// # Example
/// ```
/// use std::path::{Path, PathBuf};
/// use librarian_companions::services::file_utils::normalize_path;
/// assert_eq!(normalize_path(Path::new("/m/lib/../lib/./Subs")), PathBuf::from("/m/lib/Subs"));
/// assert_eq!(normalize_path(Path::new("./Song.ac3")), PathBuf::from("Song.ac3"));
/// ```
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

/// Resolve a path for identity checks: the canonical path when it exists,
/// the lexical normalization otherwise.
pub fn resolve_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| normalize_path(path))
}

/// True if both paths name the same file, lexically or after following links.
pub fn same_path(a: &Path, b: &Path) -> bool {
    if normalize_path(a) == normalize_path(b) {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

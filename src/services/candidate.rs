//! Companion candidate types shared by the scanner, resolver and listing.

use std::fmt;

use serde::Serialize;

use super::file_utils::{get_extension, CompanionKind};
use super::match_scorer::Priority;

/// Why a collected candidate was dropped from the result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// The candidate had no path at all
    EmptyPath,
    /// A `.sub` file whose `.idx` index is also present
    PairedWithIndex { index_path: String },
    /// A `.cdg` file that did not match the media name exactly
    WeakKaraokeMatch,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::EmptyPath => write!(f, "empty path"),
            RejectReason::PairedWithIndex { index_path } => {
                write!(f, "superseded by index file {}", index_path)
            }
            RejectReason::WeakKaraokeMatch => write!(f, "cdg without exact name match"),
        }
    }
}

/// A discovered companion file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub path: String,
    pub kind: CompanionKind,
    pub priority: Priority,
    /// Set by the conflict resolver; rejected candidates are kept for diagnostics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RejectReason>,
}

impl Candidate {
    /// Create a candidate. An empty path is rejected immediately.
    pub fn new(path: impl Into<String>, kind: CompanionKind, priority: Priority) -> Self {
        let path = path.into();
        let rejection = path.is_empty().then_some(RejectReason::EmptyPath);
        Self {
            path,
            kind,
            priority,
            rejection,
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }

    pub fn reject(&mut self, reason: RejectReason) {
        if self.rejection.is_none() {
            self.rejection = Some(reason);
        }
    }

    /// Extension of the candidate's path, without the dot
    pub fn extension(&self) -> Option<&str> {
        get_extension(self.file_name())
    }

    /// Final path component
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit(['/', std::path::MAIN_SEPARATOR])
            .next()
            .unwrap_or(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path_is_rejected() {
        let candidate = Candidate::new("", CompanionKind::Subtitle, Priority::MatchAll);
        assert_eq!(candidate.rejection, Some(RejectReason::EmptyPath));
        assert!(candidate.is_rejected());
    }

    #[test]
    fn test_first_rejection_wins() {
        let mut candidate =
            Candidate::new("/m/song.cdg", CompanionKind::Subtitle, Priority::MatchLeft);
        candidate.reject(RejectReason::WeakKaraokeMatch);
        candidate.reject(RejectReason::EmptyPath);
        assert_eq!(candidate.rejection, Some(RejectReason::WeakKaraokeMatch));
    }

    #[test]
    fn test_file_name_and_extension() {
        let candidate = Candidate::new(
            "/movies/sub.dir/Movie.EN.SRT",
            CompanionKind::Subtitle,
            Priority::MatchLeft,
        );
        assert_eq!(candidate.file_name(), "Movie.EN.SRT");
        assert_eq!(candidate.extension(), Some("SRT"));

        let bare = Candidate::new("/movies/noext", CompanionKind::Subtitle, Priority::MatchLeft);
        assert_eq!(bare.extension(), None);
    }
}

//! Name-overlap scorer for companion files
//!
//! Decides how strongly a companion file's name suggests it belongs to a
//! media file. Both inputs must already be normalized with
//! [`normalize_name`](super::text_utils::normalize_name).
//!
//! ## Priorities
//! ```text
//! candidate == media            -> MatchAll
//! media found, nothing after    -> MatchRight  ("English - Movie")
//! media found, text after       -> MatchLeft   ("Movie.en", "CD1 - Movie - Part2")
//! media not found, same dir     -> MatchNone
//! media not found, extra dir    -> None        (never emitted)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::text_utils::has_alphanumeric;
use crate::error::{CompanionError, Result};

/// Confidence that a companion belongs to a media file.
///
/// The discriminants are the values used by the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    None = 0,
    MatchNone = 1,
    MatchRight = 2,
    MatchLeft = 3,
    MatchAll = 4,
}

impl Priority {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Priority::None),
            1 => Some(Priority::MatchNone),
            2 => Some(Priority::MatchRight),
            3 => Some(Priority::MatchLeft),
            4 => Some(Priority::MatchAll),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::None => write!(f, "none"),
            Priority::MatchNone => write!(f, "match_none"),
            Priority::MatchRight => write!(f, "match_right"),
            Priority::MatchLeft => write!(f, "match_left"),
            Priority::MatchAll => write!(f, "match_all"),
        }
    }
}

/// Minimum priority a companion needs to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchThreshold {
    /// Companion discovery is turned off
    Disabled,
    AtLeast(Priority),
}

impl MatchThreshold {
    /// Parse the integer form used in configuration (`0` disables).
    pub fn from_level(level: i64) -> Result<Self> {
        match u8::try_from(level).ok().and_then(Priority::from_u8) {
            Some(Priority::None) => Ok(MatchThreshold::Disabled),
            Some(priority) => Ok(MatchThreshold::AtLeast(priority)),
            None => Err(CompanionError::InvalidThreshold(level)),
        }
    }

    pub fn is_disabled(self) -> bool {
        self == MatchThreshold::Disabled
    }

    /// True if `priority` clears this threshold.
    pub fn accepts(self, priority: Priority) -> bool {
        match self {
            MatchThreshold::Disabled => false,
            MatchThreshold::AtLeast(min) => priority != Priority::None && priority >= min,
        }
    }
}

impl Default for MatchThreshold {
    fn default() -> Self {
        MatchThreshold::AtLeast(Priority::MatchLeft)
    }
}

/// Where a scanned entry lives relative to the media file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryLocation {
    /// The media file's own directory
    Primary,
    /// A configured extra search directory
    Extra,
}

/// Score a normalized candidate name against a normalized media name.
///
/// Returns [`Priority::None`] when the media name does not occur in the
/// candidate; see [`score_in_directory`] for the location fallback.
pub fn score(candidate: &str, media: &str) -> Priority {
    if candidate == media {
        return Priority::MatchAll;
    }

    // A blank media name is a substring of everything
    if media.is_empty() {
        return Priority::None;
    }

    match candidate.find(media) {
        Some(pos) => {
            let tail = &candidate[pos + media.len()..];
            if has_alphanumeric(tail) {
                Priority::MatchLeft
            } else {
                Priority::MatchRight
            }
        }
        None => Priority::None,
    }
}

/// Apply the location fallback to a name-overlap score.
///
/// Files sharing no name with the media only count when they sit in the
/// media's own directory.
pub fn score_in_directory(priority: Priority, location: EntryLocation) -> Priority {
    match (priority, location) {
        (Priority::None, EntryLocation::Primary) => Priority::MatchNone,
        (priority, _) => priority,
    }
}

/// Score and apply the location fallback in one step.
pub fn score_entry(candidate: &str, media: &str, location: EntryLocation) -> Priority {
    score_in_directory(score(candidate, media), location)
}

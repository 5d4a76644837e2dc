//! Deterministic ordering for candidates and directory listings
//!
//! Locale collation is pluggable through [`Collator`]; the built-in
//! [`AsciiCollator`] is used when the host supplies nothing better.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::candidate::Candidate;
use crate::error::CompanionError;

/// How directory listings are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Keep the order the directory was read in
    None,
    /// Numeric runs compare by value ("file2" < "file10")
    Version,
    /// Locale collation through a [`Collator`]
    #[default]
    Collate,
}

impl SortMode {
    /// Lenient parse used for configuration: anything unknown collates.
    pub fn from_config(value: &str) -> Self {
        value.parse().unwrap_or(SortMode::Collate)
    }
}

impl FromStr for SortMode {
    type Err = CompanionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(SortMode::None),
            "version" => Ok(SortMode::Version),
            "collate" => Ok(SortMode::Collate),
            _ => Err(CompanionError::InvalidSortMode(s.to_string())),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::None => write!(f, "none"),
            SortMode::Version => write!(f, "version"),
            SortMode::Collate => write!(f, "collate"),
        }
    }
}

/// String collation backend
pub trait Collator: Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// ASCII case-insensitive collation with a byte-order tie-break
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiCollator;

impl Collator for AsciiCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        let folded = a
            .bytes()
            .map(|c| c.to_ascii_lowercase())
            .cmp(b.bytes().map(|c| c.to_ascii_lowercase()));
        folded.then_with(|| a.cmp(b))
    }
}

impl<F> Collator for F
where
    F: Fn(&str, &str) -> Ordering + Send + Sync,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self(a, b)
    }
}

/// Compare two names treating digit runs as numbers.
///
/// Numeric runs compare by value, ignoring leading zeros; equal values with
/// more leading zeros sort first. Other text compares byte-wise. Names that
/// compare equal under these rules fall back to plain byte order.
pub fn version_compare(a: &str, b: &str) -> Ordering {
    let (ab, bb) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    while i < ab.len() && j < bb.len() {
        if ab[i].is_ascii_digit() && bb[j].is_ascii_digit() {
            let (a_end, b_end) = (digit_run_end(ab, i), digit_run_end(bb, j));
            let ord = compare_digit_runs(&ab[i..a_end], &bb[j..b_end]);
            if ord != Ordering::Equal {
                return ord;
            }
            i = a_end;
            j = b_end;
        } else {
            match ab[i].cmp(&bb[j]) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                ord => return ord,
            }
        }
    }

    (ab.len() - i).cmp(&(bb.len() - j)).then_with(|| a.cmp(b))
}

fn digit_run_end(s: &[u8], start: usize) -> usize {
    s[start..]
        .iter()
        .position(|c| !c.is_ascii_digit())
        .map_or(s.len(), |n| start + n)
}

fn compare_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
    let a_trim = trim_leading_zeros(a);
    let b_trim = trim_leading_zeros(b);
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
        // More leading zeros first: "01" < "1"
        .then_with(|| b.len().cmp(&a.len()))
}

fn trim_leading_zeros(digits: &[u8]) -> &[u8] {
    let zeros = digits.iter().take_while(|&&c| c == b'0').count();
    &digits[zeros..]
}

/// Order candidates by priority (highest first), then path.
pub fn sort_candidates(candidates: &mut [Candidate], collator: &dyn Collator) {
    candidates.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| collator.compare(&a.path, &b.path))
    });
}

/// Compare two listing entries: directories first, then by name.
pub fn compare_entries(
    mode: SortMode,
    collator: &dyn Collator,
    (a_name, a_is_dir): (&str, bool),
    (b_name, b_is_dir): (&str, bool),
) -> Ordering {
    // `true` sorts first
    let by_type = b_is_dir.cmp(&a_is_dir);
    by_type.then_with(|| match mode {
        SortMode::None => Ordering::Equal,
        SortMode::Version => version_compare(a_name, b_name),
        SortMode::Collate => collator.compare(a_name, b_name),
    })
}

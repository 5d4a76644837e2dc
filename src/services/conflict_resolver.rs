//! Conflict resolution between collected companions
//!
//! Runs once over a full candidate set and marks redundant or untrustworthy
//! entries as rejected. Nothing is removed here; callers filter on
//! [`Candidate::is_rejected`].

use tracing::debug;

use super::candidate::{Candidate, RejectReason};
use super::match_scorer::Priority;

/// Mark redundant `.sub` files and weak `.cdg` matches as rejected.
pub fn resolve_conflicts(candidates: &mut [Candidate]) {
    for i in 0..candidates.len() {
        if candidates[i].is_rejected() {
            continue;
        }

        let reason = match candidates[i].extension() {
            Some(ext) if ext.eq_ignore_ascii_case("sub") => {
                find_index_pair(candidates, i).map(|index_path| RejectReason::PairedWithIndex {
                    index_path: index_path.to_string(),
                })
            }
            Some(ext) if ext.eq_ignore_ascii_case("cdg") => {
                (candidates[i].priority < Priority::MatchAll)
                    .then_some(RejectReason::WeakKaraokeMatch)
            }
            _ => None,
        };

        if let Some(reason) = reason {
            debug!(path = %candidates[i].path, reason = %reason, "Rejected companion");
            candidates[i].reject(reason);
        }
    }
}

/// Find an `.idx` candidate sharing the `.sub` candidate's path stem.
fn find_index_pair(candidates: &[Candidate], sub_idx: usize) -> Option<&str> {
    let stem = path_stem(&candidates[sub_idx].path)?;
    candidates
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != sub_idx)
        .map(|(_, other)| other)
        .filter(|other| {
            other
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("idx"))
        })
        .find(|other| path_stem(&other.path).is_some_and(|s| s.eq_ignore_ascii_case(stem)))
        .map(|other| other.path.as_str())
}

/// Path with its final extension (and the dot) removed
fn path_stem(path: &str) -> Option<&str> {
    path.rfind('.').map(|dot| &path[..dot])
}

/// Split resolved candidates into accepted and rejected, preserving order.
pub fn partition(candidates: Vec<Candidate>) -> (Vec<Candidate>, Vec<Candidate>) {
    candidates.into_iter().partition(|c| !c.is_rejected())
}

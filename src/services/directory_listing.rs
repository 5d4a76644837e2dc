//! Directory listing as a playlist
//!
//! Splits a directory's entries into playable items and companion files,
//! attaches matching companions to each item, and orders the items.
//! Scoring goes through the same collector as sidecar detection, in
//! [`SearchMode::Listing`].

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::candidate::Candidate;
use super::conflict_resolver::{partition, resolve_conflicts};
use super::file_utils::{classify, has_extension_in};
use super::match_scorer::{EntryLocation, MatchThreshold};
use super::scanner::{collect, DirEntry, DirectoryReader, SearchMode, SearchRequest};
use super::sorting::{compare_entries, sort_candidates, Collator, SortMode};
use crate::error::{CompanionError, Result};

/// Extensions hidden from listings by default
pub const DEFAULT_IGNORED_EXTENSIONS: &str = concat!(
    "m3u,db,nfo,ini,jpg,jpeg,ljpg,gif,png,pgm,pgmyuv,pbm,pam,tga,bmp,",
    "pnm,xpm,xcf,pcx,tif,tiff,lbm,sfv,txt,sub,idx,srt,cue,ssa",
);

/// Listing behaviour
#[derive(Debug, Clone)]
pub struct ListingOptions {
    pub threshold: MatchThreshold,
    pub show_hidden: bool,
    /// Comma-separated extensions skipped for non-companion entries
    pub ignored_extensions: String,
    pub sort: SortMode,
    /// The entry source already yields a sorted order
    pub already_sorted: bool,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            threshold: MatchThreshold::default(),
            show_hidden: false,
            ignored_extensions: DEFAULT_IGNORED_EXTENSIONS.to_string(),
            sort: SortMode::default(),
            already_sorted: false,
        }
    }
}

/// One playable entry of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistItem {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub companions: Vec<Candidate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<Candidate>,
}

/// A directory turned into playlist items
#[derive(Debug, Clone, Default, Serialize)]
pub struct Playlist {
    pub dir: PathBuf,
    pub items: Vec<PlaylistItem>,
}

/// Read `dir` through `reader` and build its playlist.
///
/// A reader that returns entries already sorted keeps its order.
pub fn list_directory<R>(
    dir: &Path,
    reader: &R,
    options: &ListingOptions,
    collator: &dyn Collator,
) -> Result<Playlist>
where
    R: DirectoryReader + ?Sized,
{
    let entries = reader
        .read_dir(dir, EntryLocation::Primary)
        .map_err(|source| CompanionError::ReadDir {
            dir: dir.to_path_buf(),
            source,
        })?;
    let options = ListingOptions {
        already_sorted: options.already_sorted || reader.is_sorted(),
        ..options.clone()
    };
    Ok(build_playlist(dir, entries, &options, collator))
}

/// Build a playlist from already-read directory entries.
pub fn build_playlist<I>(
    dir: &Path,
    entries: I,
    options: &ListingOptions,
    collator: &dyn Collator,
) -> Playlist
where
    I: IntoIterator<Item = DirEntry>,
{
    let mut items = Vec::new();
    let mut companions = Vec::new();

    for entry in entries {
        if entry.is_skipped(options.show_hidden) {
            continue;
        }
        if !entry.is_dir() && classify(&entry.name).is_some() {
            companions.push(entry);
            continue;
        }
        if has_extension_in(&options.ignored_extensions, &entry.name) {
            continue;
        }
        let is_dir = entry.is_dir();
        items.push(PlaylistItem {
            path: entry.path(),
            name: entry.name,
            is_dir,
            companions: Vec::new(),
            rejected: Vec::new(),
        });
    }

    if !options.threshold.is_disabled() {
        for item in items.iter_mut().filter(|item| !item.is_dir) {
            attach_companions(item, &companions, options, collator);
        }
    }

    if !options.already_sorted && options.sort != SortMode::None {
        items.sort_by(|a, b| {
            compare_entries(
                options.sort,
                collator,
                (&a.name, a.is_dir),
                (&b.name, b.is_dir),
            )
        });
    }

    debug!(
        dir = %dir.display(),
        items = items.len(),
        companions = companions.len(),
        sort = %options.sort,
        "Directory listed"
    );

    Playlist {
        dir: dir.to_path_buf(),
        items,
    }
}

fn attach_companions(
    item: &mut PlaylistItem,
    companions: &[DirEntry],
    options: &ListingOptions,
    collator: &dyn Collator,
) {
    let request = SearchRequest {
        media_path: item.path.clone(),
        search_paths: Vec::new(),
        threshold: options.threshold,
        show_hidden: options.show_hidden,
        mode: SearchMode::Listing,
    };

    let mut candidates = match collect(&request, companions.iter().cloned()) {
        Ok(candidates) => candidates,
        Err(err) => {
            debug!(item = %item.name, error = %err, "Skipping companion attachment");
            return;
        }
    };

    resolve_conflicts(&mut candidates);
    let (mut accepted, mut rejected) = partition(candidates);
    sort_candidates(&mut accepted, collator);
    sort_candidates(&mut rejected, collator);
    item.companions = accepted;
    item.rejected = rejected;
}

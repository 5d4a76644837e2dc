//! Companion discovery services

pub mod candidate;
pub mod conflict_resolver;
pub mod directory_listing;
pub mod file_utils;
pub mod logging;
pub mod match_scorer;
pub mod scanner;
pub mod sidecar;
pub mod sorting;
pub mod text_utils;

pub use candidate::{Candidate, RejectReason};
pub use directory_listing::{
    build_playlist, list_directory, ListingOptions, Playlist, PlaylistItem,
    DEFAULT_IGNORED_EXTENSIONS,
};
pub use file_utils::{classify, CompanionKind};
pub use match_scorer::{EntryLocation, MatchThreshold, Priority};
pub use scanner::{
    DirEntry, DirectoryReader, EntryType, SearchMode, SearchRequest, UnreadableDir,
    WalkDirReader, DEFAULT_SEARCH_PATHS,
};
pub use sidecar::{detect, detect_with_collator, Detection};
pub use sorting::{AsciiCollator, Collator, SortMode};

//! Application configuration management

use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::services::directory_listing::{ListingOptions, DEFAULT_IGNORED_EXTENSIONS};
use crate::services::match_scorer::MatchThreshold;
use crate::services::scanner::{parse_search_paths, SearchMode, SearchRequest, DEFAULT_SEARCH_PATHS};
use crate::services::sorting::SortMode;

/// Companion discovery configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Minimum match priority (SUB_AUTODETECT_FUZZY, 0 disables)
    pub threshold: MatchThreshold,

    /// Extra companion directories (SUB_AUTODETECT_PATH)
    pub search_paths: Vec<String>,

    /// List dot-files (SHOW_HIDDEN_FILES)
    pub show_hidden_files: bool,

    /// Extensions left out of directory listings (IGNORE_FILETYPES)
    pub ignored_extensions: String,

    /// Directory listing order (DIRECTORY_SORT)
    pub directory_sort: SortMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: MatchThreshold::default(),
            search_paths: parse_search_paths(DEFAULT_SEARCH_PATHS),
            show_hidden_files: false,
            ignored_extensions: DEFAULT_IGNORED_EXTENSIONS.to_string(),
            directory_sort: SortMode::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup. Invalid values fall back to
    /// their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let threshold = match lookup("SUB_AUTODETECT_FUZZY") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(level) => MatchThreshold::from_level(level).unwrap_or_else(|e| {
                    warn!(value = %raw, error = %e, "Invalid SUB_AUTODETECT_FUZZY, using default");
                    defaults.threshold
                }),
                Err(_) => {
                    warn!(value = %raw, "SUB_AUTODETECT_FUZZY is not a number, using default");
                    defaults.threshold
                }
            },
            None => defaults.threshold,
        };

        Self {
            threshold,

            search_paths: lookup("SUB_AUTODETECT_PATH")
                .map(|v| parse_search_paths(&v))
                .unwrap_or(defaults.search_paths),

            show_hidden_files: lookup("SHOW_HIDDEN_FILES")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.show_hidden_files),

            ignored_extensions: lookup("IGNORE_FILETYPES").unwrap_or(defaults.ignored_extensions),

            directory_sort: lookup("DIRECTORY_SORT")
                .map(|v| SortMode::from_config(&v))
                .unwrap_or(defaults.directory_sort),
        }
    }

    /// Build a sidecar search request for one media file
    pub fn search_request(&self, media_path: impl Into<PathBuf>) -> SearchRequest {
        SearchRequest {
            media_path: media_path.into(),
            search_paths: self.search_paths.clone(),
            threshold: self.threshold,
            show_hidden: self.show_hidden_files,
            mode: SearchMode::Sidecar,
        }
    }

    /// Build directory listing options
    pub fn listing_options(&self) -> ListingOptions {
        ListingOptions {
            threshold: self.threshold,
            show_hidden: self.show_hidden_files,
            ignored_extensions: self.ignored_extensions.clone(),
            sort: self.directory_sort,
            already_sorted: false,
        }
    }
}

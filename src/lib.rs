//! Librarian companions - subtitle and audio track discovery
//!
//! Finds the files sitting next to a media file that are probably its
//! subtitles or secondary audio, scores how confident the match is, and
//! returns them in a deterministic order. Also turns a directory listing
//! into playlist items with their companions attached.

pub mod config;
pub mod error;
pub mod services;

pub use error::{CompanionError, Result};

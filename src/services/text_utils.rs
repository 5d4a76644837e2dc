//! Shared filename normalization utilities
//!
//! Every comparison between a media file and a potential companion goes
//! through [`normalize_name`], so sidecar detection and directory listings
//! agree on what "the same name" means.

/// Strip the extension from a filename (text after the last `.`).
///
/// A name without a dot is returned unchanged. Only the final dot counts, so
/// `"movie.en.srt"` becomes `"movie.en"`.
pub fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) => &filename[..idx],
        None => filename,
    }
}

/// Normalize a filename for companion matching.
///
/// Strips the extension, then keeps ASCII alphanumeric runs lower-cased and
/// joins them with exactly one space. Leading and trailing separators are
/// dropped, so a name with no alphanumerics normalizes to `""`.
///
/// # Example
/// ```
/// use librarian_companions::services::text_utils::normalize_name;
/// assert_eq!(normalize_name("The.Movie_(2009).srt"), "the movie 2009");
/// assert_eq!(normalize_name("--.srt"), "");
/// ```
pub fn normalize_name(filename: &str) -> String {
    normalize_stem(strip_extension(filename))
}

/// Normalize text that already has its extension removed.
///
/// Applying this to an already-normalized string returns it unchanged.
pub fn normalize_stem(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len() + 1);
    let mut pending_space = false;

    for c in stem.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_space = true;
        }
    }

    out
}

/// True if `s` contains at least one ASCII alphanumeric character.
pub fn has_alphanumeric(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_alphanumeric())
}

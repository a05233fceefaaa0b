use std::collections::HashSet;

use crate::modules::gallery::model::{ImageKind, ValidationError};
use crate::modules::gallery::validator::has_allowed_extension;

/// Suffix inserted before the extension of every thumbnail
pub const THUMB_SUFFIX: &str = "-thumb";

/// Highest numeric suffix tried before giving up on a name
pub const MAX_NAME_COUNTER: u32 = 999;

/// Longest filename most filesystems accept, in bytes
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Bytes taken by the widest counter suffix, `-999`
const COUNTER_SUFFIX_LENGTH: usize = 4;

const WINDOWS_DEVICE_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("Too many files named {0}, please rename it")]
    Exhausted(String),
}

/// Split at the final dot. `None` when the name has no dot at all.
pub fn split_extension(filename: &str) -> (&str, Option<&str>) {
    match filename.rsplit_once('.') {
        Some((base, extension)) => (base, Some(extension)),
        None => (filename, None),
    }
}

/// Reduce a client-supplied filename to a flat, ASCII-only name that cannot escape
/// the upload directory.
///
/// The stem is shortened so that the name still fits in [`MAX_FILENAME_LENGTH`] after
/// [`resolve`] adds its widest counter and [`add_thumb`] adds the thumbnail suffix.
pub fn sanitize_filename(filename: &str, allowed: &[ImageKind]) -> Result<String, ValidationError> {
    let flattened = filename.replace(['/', '\\'], " ");
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    let ascii: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let mut sanitized = truncate_stem(ascii.trim_matches(|c| c == '.' || c == '_'));

    let (stem, _) = split_extension(&sanitized);
    if WINDOWS_DEVICE_NAMES.iter().any(|device| device.eq_ignore_ascii_case(stem)) {
        sanitized.insert(0, '_');
    }

    if sanitized.is_empty() || !has_allowed_extension(&sanitized, allowed) {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(sanitized)
}

/// Only ever called on ASCII, so byte slicing stays on char boundaries
fn truncate_stem(name: &str) -> String {
    let (stem, extension) = split_extension(name);
    let reserved = COUNTER_SUFFIX_LENGTH
        + THUMB_SUFFIX.len()
        + extension.map_or(0, |extension| extension.len() + 1);
    let limit = MAX_FILENAME_LENGTH.saturating_sub(reserved);

    if stem.len() <= limit {
        return name.to_string();
    }
    match extension {
        Some(extension) => format!("{}.{extension}", &stem[..limit]),
        None => stem[..limit].to_string(),
    }
}

/// Pick a name not present in `existing`, appending `-001`, `-002`, ... before the
/// extension when `desired` is taken.
pub fn resolve(desired: &str, existing: &HashSet<String>) -> Result<String, NameError> {
    if !existing.contains(desired) {
        return Ok(desired.to_string());
    }

    let (base, extension) = split_extension(desired);
    (1..=MAX_NAME_COUNTER)
        .map(|counter| match extension {
            Some(extension) => format!("{base}-{counter:03}.{extension}"),
            None => format!("{base}-{counter:03}"),
        })
        .find(|candidate| !existing.contains(candidate))
        .ok_or_else(|| NameError::Exhausted(desired.to_string()))
}

/// Thumbnail filename for a stored original: `a.jpg` -> `a-thumb.jpg`
pub fn add_thumb(filename: &str) -> String {
    match split_extension(filename) {
        (base, Some(extension)) => format!("{base}{THUMB_SUFFIX}.{extension}"),
        (base, None) => format!("{base}{THUMB_SUFFIX}"),
    }
}

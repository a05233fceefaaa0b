use crate::modules::gallery::model::{ImageKind, ValidationError};
use crate::modules::gallery::naming::split_extension;

/// Detect the format from the leading magic bytes only
pub fn sniff(bytes: &[u8]) -> Option<ImageKind> {
    image::guess_format(bytes).ok().and_then(ImageKind::from_image_format)
}

/// Accept an upload only if its extension and its content are both allowed images.
///
/// Returns the sniffed format, which is what the thumbnail is encoded as.
pub fn validate(
    bytes: &[u8],
    claimed_filename: &str,
    allowed: &[ImageKind],
) -> Result<ImageKind, ValidationError> {
    let (_, extension) = split_extension(claimed_filename);
    let declared = extension
        .and_then(ImageKind::from_extension)
        .filter(|kind| allowed.contains(kind))
        .ok_or(ValidationError::InvalidExtension)?;

    let sniffed = sniff(bytes)
        .filter(|kind| allowed.contains(kind))
        .ok_or(ValidationError::NotAnImage)?;

    if declared != sniffed {
        tracing::debug!(%declared, %sniffed, "extension and content disagree, both allowed");
    }

    Ok(sniffed)
}

/// Whether a stored filename has an allowed extension
pub fn has_allowed_extension(filename: &str, allowed: &[ImageKind]) -> bool {
    split_extension(filename)
        .1
        .and_then(ImageKind::from_extension)
        .is_some_and(|kind| allowed.contains(&kind))
}

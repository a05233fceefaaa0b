use std::io::Cursor;

use image::{imageops::FilterType, DynamicImage};

use crate::modules::gallery::model::{Dimensions, ImageKind};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Failed to decode {kind} image: {source}")]
    Decode { kind: ImageKind, source: image::ImageError },
    #[error("Failed to encode {kind} image: {source}")]
    Encode { kind: ImageKind, source: image::ImageError },
    #[error("Thumbnail dimensions must be non-zero, got {0}x{1}")]
    EmptyTarget(u32, u32),
}

/// Decode, cover-resize and encode, for any [`ImageKind`]
pub trait ImageCodec: Send + Sync {
    fn decode(&self, bytes: &[u8], kind: ImageKind) -> Result<DynamicImage, CodecError>;

    /// Scale and centre-crop so the result exactly fills `target`
    fn resize_cover(&self, image: &DynamicImage, target: Dimensions) -> DynamicImage;

    fn encode(&self, image: &DynamicImage, kind: ImageKind) -> Result<Vec<u8>, CodecError>;
}

/// Codec backed by the `image` crate
#[derive(Debug, Clone, Copy)]
pub struct RasterCodec {
    filter: FilterType,
}

impl RasterCodec {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for RasterCodec {
    fn default() -> Self {
        Self::new(FilterType::Lanczos3)
    }
}

impl ImageCodec for RasterCodec {
    fn decode(&self, bytes: &[u8], kind: ImageKind) -> Result<DynamicImage, CodecError> {
        image::load_from_memory_with_format(bytes, kind.image_format())
            .map_err(|source| CodecError::Decode { kind, source })
    }

    fn resize_cover(&self, image: &DynamicImage, target: Dimensions) -> DynamicImage {
        image.resize_to_fill(target.width, target.height, self.filter)
    }

    fn encode(&self, image: &DynamicImage, kind: ImageKind) -> Result<Vec<u8>, CodecError> {
        let prepared = encodable(image, kind);
        let mut bytes = Vec::new();
        prepared
            .write_to(&mut Cursor::new(&mut bytes), kind.image_format())
            .map_err(|source| CodecError::Encode { kind, source })?;
        Ok(bytes)
    }
}

/// Convert to a colour type the target encoder supports
fn encodable(image: &DynamicImage, kind: ImageKind) -> DynamicImage {
    match (kind, image) {
        (ImageKind::Jpeg, DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_)) => {
            image.clone()
        }
        (ImageKind::Jpeg, _) => DynamicImage::ImageRgb8(image.to_rgb8()),
        (ImageKind::Gif, DynamicImage::ImageRgba8(_)) => image.clone(),
        (ImageKind::Gif, _) => DynamicImage::ImageRgba8(image.to_rgba8()),
        (
            ImageKind::Bmp,
            DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgba8(_)
            | DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_),
        ) => image.clone(),
        (ImageKind::Bmp, _) => DynamicImage::ImageRgba8(image.to_rgba8()),
        (ImageKind::Png, _) => image.clone(),
    }
}

/// Produce a thumbnail of `target` size, encoded in the same format as the source
pub fn generate_thumbnail(
    codec: &dyn ImageCodec,
    bytes: &[u8],
    kind: ImageKind,
    target: Dimensions,
) -> Result<Vec<u8>, CodecError> {
    if target.width == 0 || target.height == 0 {
        return Err(CodecError::EmptyTarget(target.width, target.height));
    }

    let source = codec.decode(bytes, kind)?;
    let thumbnail = codec.resize_cover(&source, target);
    codec.encode(&thumbnail, kind)
}

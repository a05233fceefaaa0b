use std::fmt;

/// Image formats the gallery accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Bmp,
    Gif,
    Png,
    Jpeg,
}

impl ImageKind {
    pub const ALL: [ImageKind; 4] =
        [ImageKind::Bmp, ImageKind::Gif, ImageKind::Png, ImageKind::Jpeg];

    /// Map a file extension (case-insensitive, without the dot) to a format
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "bmp" => Some(ImageKind::Bmp),
            "gif" => Some(ImageKind::Gif),
            "png" => Some(ImageKind::Png),
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            _ => None,
        }
    }

    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Bmp => Some(ImageKind::Bmp),
            image::ImageFormat::Gif => Some(ImageKind::Gif),
            image::ImageFormat::Png => Some(ImageKind::Png),
            image::ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            _ => None,
        }
    }

    pub fn image_format(self) -> image::ImageFormat {
        match self {
            ImageKind::Bmp => image::ImageFormat::Bmp,
            ImageKind::Gif => image::ImageFormat::Gif,
            ImageKind::Png => image::ImageFormat::Png,
            ImageKind::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageKind::Bmp => "bmp",
            ImageKind::Gif => "gif",
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpeg",
        };
        f.write_str(name)
    }
}

/// Pixel dimensions of a thumbnail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(300, 300)
    }
}

/// Reasons an upload is turned away before anything is written
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File required")]
    FileRequired,
    #[error("File must have a valid image extension")]
    InvalidExtension,
    #[error("File must be an image")]
    NotAnImage,
    #[error("Filename is not usable")]
    InvalidFilename,
}

/// File received from the upload form, before validation
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub filename: String,
    pub thumbnail: String,
    pub kind: ImageKind,
}

use std::path::PathBuf;

use crate::{
    api::error,
    constants::{self, Env},
    modules::gallery::model::{Dimensions, ImageKind},
};

/// Process-wide gallery settings, fixed at startup
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub max_upload_size: usize,
    pub allowed_formats: Vec<ImageKind>,
    pub upload_dir: PathBuf,
    pub thumbnail_dir: PathBuf,
    pub thumbnail_size: Dimensions,
}

impl GalleryConfig {
    /// Defaults for everything except the two storage directories
    pub fn for_dirs(upload_dir: impl Into<PathBuf>, thumbnail_dir: impl Into<PathBuf>) -> Self {
        Self {
            max_upload_size: constants::DEFAULT_MAX_UPLOAD_SIZE,
            allowed_formats: ImageKind::ALL.to_vec(),
            upload_dir: upload_dir.into(),
            thumbnail_dir: thumbnail_dir.into(),
            thumbnail_size: Dimensions::default(),
        }
    }

    pub fn from_env(env: &Env) -> Self {
        Self {
            max_upload_size: env.max_upload_size,
            thumbnail_size: Dimensions::new(env.thumbnail_width, env.thumbnail_height),
            ..Self::for_dirs(&env.upload_dir, &env.thumbnail_dir)
        }
    }
}

/// Create the upload and thumbnail directories if they are missing
pub async fn prepare_directories(config: &GalleryConfig) -> Result<(), error::SystemError> {
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tokio::fs::create_dir_all(&config.thumbnail_dir).await?;
    log::info!(
        "Storing uploads in {} and thumbnails in {}",
        config.upload_dir.display(),
        config.thumbnail_dir.display()
    );
    Ok(())
}

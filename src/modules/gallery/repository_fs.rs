use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::{
    api::error,
    configs::GalleryConfig,
    modules::gallery::{
        model::ImageKind,
        repository::{CreateOutcome, ImageStore, ListedImage},
        validator::{has_allowed_extension, sniff},
    },
};

/// Enough leading bytes for every supported magic number
const SNIFF_LEN: u64 = 32;

/// Two flat directories on the local filesystem
#[derive(Debug, Clone)]
pub struct FsImageStore {
    upload_dir: PathBuf,
    thumbnail_dir: PathBuf,
    allowed: Vec<ImageKind>,
}

impl FsImageStore {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            upload_dir: config.upload_dir.clone(),
            thumbnail_dir: config.thumbnail_dir.clone(),
            allowed: config.allowed_formats.clone(),
        }
    }

    async fn is_listable_image(&self, path: &Path) -> std::io::Result<bool> {
        let file = tokio::fs::File::open(path).await?;
        let mut head = Vec::with_capacity(SNIFF_LEN as usize);
        file.take(SNIFF_LEN).read_to_end(&mut head).await?;
        Ok(sniff(&head).is_some_and(|kind| self.allowed.contains(&kind)))
    }
}

/// A bare name that stays inside its directory
fn is_flat_name(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\', '\0'])
}

async fn read_optional(dir: &Path, filename: &str) -> Result<Option<Vec<u8>>, error::SystemError> {
    if !is_flat_name(filename) {
        return Ok(None);
    }
    match tokio::fs::read(dir.join(filename)).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[async_trait::async_trait]
impl ImageStore for FsImageStore {
    async fn list_images(&self) -> Result<Vec<ListedImage>, error::SystemError> {
        let mut entries = tokio::fs::read_dir(&self.upload_dir).await?;
        let mut images = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let Ok(filename) = entry.file_name().into_string() else {
                continue;
            };
            if !has_allowed_extension(&filename, &self.allowed) {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    log::warn!("Skipping unreadable upload {}: {}", filename, e);
                    continue;
                }
            };

            match self.is_listable_image(&entry.path()).await {
                Ok(true) => images.push(ListedImage {
                    filename,
                    modified_at: metadata.modified().ok().map(DateTime::<Utc>::from),
                }),
                Ok(false) => log::debug!("Ignoring non-image upload entry {}", filename),
                Err(e) => log::warn!("Skipping unreadable upload {}: {}", filename, e),
            }
        }

        images.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(images)
    }

    async fn create_original(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<CreateOutcome, error::SystemError> {
        if !is_flat_name(filename) {
            return Err(error::SystemError::bad_request("Filename is not usable"));
        }

        let path = self.upload_dir.join(filename);
        let mut file =
            match tokio::fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    return Ok(CreateOutcome::AlreadyExists);
                }
                Err(e) => return Err(e.into()),
            };

        let written = async {
            file.write_all(bytes).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            // half-written file is not a committed original
            tokio::fs::remove_file(&path).await.ok();
            return Err(e.into());
        }

        Ok(CreateOutcome::Created)
    }

    async fn read_original(&self, filename: &str) -> Result<Option<Vec<u8>>, error::SystemError> {
        read_optional(&self.upload_dir, filename).await
    }

    async fn write_thumbnail(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<(), error::SystemError> {
        if !is_flat_name(filename) {
            return Err(error::SystemError::bad_request("Filename is not usable"));
        }
        tokio::fs::write(self.thumbnail_dir.join(filename), bytes).await?;
        Ok(())
    }

    async fn read_thumbnail(&self, filename: &str) -> Result<Option<Vec<u8>>, error::SystemError> {
        read_optional(&self.thumbnail_dir, filename).await
    }

    async fn thumbnail_exists(&self, filename: &str) -> Result<bool, error::SystemError> {
        if !is_flat_name(filename) {
            return Ok(false);
        }
        Ok(tokio::fs::try_exists(self.thumbnail_dir.join(filename)).await?)
    }
}

use std::collections::HashSet;
use std::sync::Arc;

use actix_web::web;
use log::info;

use crate::api::error;
use crate::configs::GalleryConfig;
use crate::modules::gallery::{
    codec::{generate_thumbnail, ImageCodec},
    model::{ImageKind, IncomingFile, StoredUpload, ValidationError},
    naming::{add_thumb, resolve, sanitize_filename},
    repository::{CreateOutcome, ImageStore},
    schema::GalleryEntry,
    validator::validate,
};

#[derive(Clone)]
pub struct GalleryService {
    store: Arc<dyn ImageStore + Send + Sync>,
    codec: Arc<dyn ImageCodec>,
    config: Arc<GalleryConfig>,
}

impl GalleryService {
    pub fn with_dependencies(
        store: Arc<dyn ImageStore + Send + Sync>,
        codec: Arc<dyn ImageCodec>,
        config: Arc<GalleryConfig>,
    ) -> Self {
        info!("GalleryService initialized with dependencies");
        GalleryService { store, codec, config }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Validate, name, store and thumbnail one uploaded image.
    ///
    /// Nothing is written unless validation passes. A thumbnail failure leaves the
    /// stored original in place.
    pub async fn upload(
        &self,
        file: Option<IncomingFile>,
    ) -> Result<StoredUpload, error::SystemError> {
        let file = file
            .filter(|f| !f.filename.is_empty())
            .ok_or(ValidationError::FileRequired)?;

        if file.bytes.len() > self.config.max_upload_size {
            return Err(error::SystemError::PayloadTooLarge(self.config.max_upload_size));
        }

        let IncomingFile { filename: claimed, bytes } = file;
        let kind = validate(&bytes, &claimed, &self.config.allowed_formats)?;
        let desired = sanitize_filename(&claimed, &self.config.allowed_formats)?;

        let mut existing: HashSet<String> =
            self.store.list_images().await?.into_iter().map(|image| image.filename).collect();

        let filename = loop {
            let candidate = resolve(&desired, &existing)?;
            match self.store.create_original(&candidate, &bytes).await? {
                CreateOutcome::Created => break candidate,
                CreateOutcome::AlreadyExists => {
                    tracing::debug!(
                        filename = %candidate,
                        "name taken since listing, resolving again"
                    );
                    existing.insert(candidate);
                }
            }
        };
        tracing::info!(filename = %filename, claimed = %claimed, %kind, "stored original");

        let thumbnail = add_thumb(&filename);
        if let Err(e) = self.store_thumbnail(&filename, &thumbnail, kind).await {
            tracing::error!(
                filename = %filename,
                error = %e,
                "thumbnail generation failed, original kept"
            );
            return Err(e);
        }

        Ok(StoredUpload { filename, thumbnail, kind })
    }

    async fn store_thumbnail(
        &self,
        filename: &str,
        thumbnail: &str,
        kind: ImageKind,
    ) -> Result<(), error::SystemError> {
        let source = self.store.read_original(filename).await?.ok_or_else(|| {
            error::SystemError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("original {filename} vanished before thumbnailing"),
            ))
        })?;

        let codec = self.codec.clone();
        let target = self.config.thumbnail_size;
        let encoded =
            web::block(move || generate_thumbnail(codec.as_ref(), &source, kind, target))
                .await??;

        self.store.write_thumbnail(thumbnail, &encoded).await?;
        tracing::info!(
            thumbnail = %thumbnail,
            width = target.width,
            height = target.height,
            "stored thumbnail"
        );
        Ok(())
    }

    /// Originals paired with their thumbnail, if one exists
    pub async fn list(&self) -> Result<Vec<GalleryEntry>, error::SystemError> {
        let images = self.store.list_images().await?;
        let mut entries = Vec::with_capacity(images.len());

        for image in images {
            let thumbnail = add_thumb(&image.filename);
            let thumbnail = match self.store.thumbnail_exists(&thumbnail).await {
                Ok(true) => Some(thumbnail),
                Ok(false) => None,
                Err(e) => {
                    log::warn!("Could not check thumbnail for {}: {:?}", image.filename, e);
                    None
                }
            };
            entries.push(GalleryEntry {
                image: image.filename,
                thumbnail,
                uploaded_at: image.modified_at,
            });
        }

        Ok(entries)
    }

    pub async fn original(&self, filename: &str) -> Result<Vec<u8>, error::SystemError> {
        self.store
            .read_original(filename)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Image not found"))
    }

    pub async fn thumbnail(&self, filename: &str) -> Result<Vec<u8>, error::SystemError> {
        self.store
            .read_thumbnail(filename)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Thumbnail not found"))
    }
}

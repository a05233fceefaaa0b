use chrono::{DateTime, Utc};

use crate::api::error;

/// One original found in the upload directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedImage {
    pub filename: String,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Result of an attempt to claim a filename for a new original
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

#[async_trait::async_trait]
pub trait ImageStore {
    /// Originals whose extension is allowed and whose content sniffs as an allowed image
    async fn list_images(&self) -> Result<Vec<ListedImage>, error::SystemError>;

    /// Write a new original, never replacing an existing entry of the same name
    async fn create_original(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<CreateOutcome, error::SystemError>;

    async fn read_original(&self, filename: &str) -> Result<Option<Vec<u8>>, error::SystemError>;

    async fn write_thumbnail(&self, filename: &str, bytes: &[u8]) -> Result<(), error::SystemError>;

    async fn read_thumbnail(&self, filename: &str) -> Result<Option<Vec<u8>>, error::SystemError>;

    async fn thumbnail_exists(&self, filename: &str) -> Result<bool, error::SystemError>;
}

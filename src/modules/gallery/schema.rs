use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_THEME, THEMES};

/// One original with the thumbnail shown next to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryEntry {
    pub image: String,
    pub thumbnail: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ThemeQuery {
    pub theme: Option<String>,
}

/// Requested theme if known, else the cookie's theme if known, else the default
pub fn pick_theme(requested: Option<&str>, cookie: Option<&str>) -> &'static str {
    [requested, cookie]
        .into_iter()
        .flatten()
        .find_map(|name| THEMES.iter().copied().find(|theme| *theme == name))
        .unwrap_or(DEFAULT_THEME)
}

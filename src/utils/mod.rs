use actix_web::{
    cookie::{time, Cookie},
    HttpRequest,
};

use crate::constants::FLASH_COOKIE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Danger,
}

impl FlashLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Danger => "danger",
        }
    }
}

/// One-shot notice carried across the post/redirect/get cycle in a cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: FlashLevel::Success, message: message.into() }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self { level: FlashLevel::Danger, message: message.into() }
    }

    pub fn from_request(req: &HttpRequest) -> Option<Self> {
        let cookie = req.cookie(FLASH_COOKIE)?;
        let (level, message) = cookie.value().split_once(':')?;
        let level = match level {
            "success" => FlashLevel::Success,
            "danger" => FlashLevel::Danger,
            _ => return None,
        };
        Some(Self { level, message: message.to_string() })
    }

    pub fn into_cookie(self) -> Cookie<'static> {
        Cookie::build(FLASH_COOKIE, format!("{}:{}", self.level.as_str(), self.message))
            .path("/")
            .http_only(true)
            .finish()
    }

    /// Expired cookie that removes a consumed notice
    pub fn clear_cookie() -> Cookie<'static> {
        Cookie::build(FLASH_COOKIE, "")
            .path("/")
            .http_only(true)
            .max_age(time::Duration::seconds(0))
            .expires(time::OffsetDateTime::UNIX_EPOCH)
            .finish()
    }
}

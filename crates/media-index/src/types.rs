//! Index entry types.

use serde::{Deserialize, Serialize};

/// Rating assigned to newly discovered files.
pub const DEFAULT_RATING: i64 = 1;

/// Media kind, derived from the file extension when an entry is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

/// A single indexed media file.
///
/// `rating` and `category` belong to the user and survive reconciliation.
/// `nickname` is re-derived from the containing directory on every pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MediaEntry {
    /// Path relative to the media root, `/`-separated. Same as the index key.
    pub file_name: String,
    #[serde(default = "default_rating")]
    pub rating: i64,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

impl MediaEntry {
    /// Creates an entry for a newly discovered file.
    pub fn discovered(file_name: String, nickname: String, media_type: MediaType) -> Self {
        Self {
            file_name,
            rating: DEFAULT_RATING,
            nickname,
            category: String::new(),
            media_type,
        }
    }

    pub fn apply(&mut self, patch: &EntryPatch) {
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
    }
}

fn default_rating() -> i64 {
    DEFAULT_RATING
}

/// User edits to an entry. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EntryPatch {
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.category.is_none()
    }
}

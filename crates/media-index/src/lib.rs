//! Media index and query library.
//!
//! This crate provides the storage side of the media server:
//! - Recognized image/video extensions and classification
//! - Directory reconciliation against a persisted JSON index
//! - Filtering of the index by rating, nickname, category and type

pub mod error;
pub mod extensions;
pub mod index;
pub mod persistence;
pub mod query;
pub mod types;
pub mod walk;

// Re-export main types
pub use error::{IndexError, Result};
pub use extensions::{classify_path, media_content_type, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
pub use index::{MediaIndex, ReconcileStats};
pub use query::MediaFilter;
pub use types::{EntryPatch, MediaEntry, MediaType};

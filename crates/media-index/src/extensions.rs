//! Recognized media extensions and type classification.

use std::path::Path;

use crate::types::MediaType;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff"];

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "flv", "wmv", "mpeg"];

/// Classifies a file by its extension, ignoring case.
///
/// Images are checked first, so an extension listed in both sets is an image.
/// Returns `None` for files that are not indexed.
pub fn classify_path(path: &Path) -> Option<MediaType> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaType::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaType::Video)
    } else {
        None
    }
}

/// MIME type of a recognized media file, ignoring extension case.
pub fn media_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tiff" => "image/tiff",
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "flv" => "video/x-flv",
        "wmv" => "video/x-ms-wmv",
        "mpeg" => "video/mpeg",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_case_image_extension_is_image() {
        assert_eq!(classify_path(Path::new("photo.JPG")), Some(MediaType::Image));
        assert_eq!(classify_path(Path::new("a/b/Scan.TiFf")), Some(MediaType::Image));
    }

    #[test]
    fn video_extension_is_video() {
        assert_eq!(classify_path(Path::new("clip.mkv")), Some(MediaType::Video));
        assert_eq!(classify_path(Path::new("clip.MPEG")), Some(MediaType::Video));
    }

    #[test]
    fn other_files_are_excluded() {
        assert_eq!(classify_path(Path::new("notes.txt")), None);
        assert_eq!(classify_path(Path::new("README")), None);
        assert_eq!(classify_path(Path::new(".jpg")), None);
    }

    #[test]
    fn extension_sets_are_disjoint() {
        for ext in IMAGE_EXTENSIONS {
            assert!(!VIDEO_EXTENSIONS.contains(ext), "{ext} is in both sets");
        }
    }

    #[test]
    fn every_media_extension_has_a_content_type() {
        for ext in IMAGE_EXTENSIONS {
            let mime = media_content_type(Path::new(&format!("a.{ext}"))).expect("mime");
            assert!(mime.starts_with("image/"), "{ext} -> {mime}");
        }
        for ext in VIDEO_EXTENSIONS {
            let mime = media_content_type(Path::new(&format!("a.{ext}"))).expect("mime");
            assert!(mime.starts_with("video/"), "{ext} -> {mime}");
        }
        assert_eq!(media_content_type(Path::new("clip.MKV")), Some("video/x-matroska"));
        assert_eq!(media_content_type(Path::new("notes.txt")), None);
    }
}

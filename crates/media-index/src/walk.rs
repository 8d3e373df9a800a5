//! Recursive media discovery below a root directory.

use std::fs;
use std::path::{Component, Path};

use walkdir::WalkDir;

use crate::error::Result;
use crate::extensions::classify_path;
use crate::types::MediaType;

/// A media file seen during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Path relative to the walk root, `/`-separated.
    pub relative_path: String,
    /// Name of the immediate containing directory.
    pub nickname: String,
    pub media_type: MediaType,
}

/// Walks `root` and returns every file with a recognized media extension.
///
/// Directory symlinks are not descended into. Symlinks to regular files are
/// reported like regular files when their target resolves inside `root`.
/// Any I/O error aborts the walk.
pub fn discover_media(root: &Path) -> Result<Vec<DiscoveredFile>> {
    let canonical_root = fs::canonicalize(root)?;
    let root_nickname = root
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();

    let mut found = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        if entry.depth() == 0 || !is_regular_file(&entry, &canonical_root) {
            continue;
        }
        let Some(media_type) = classify_path(entry.path()) else {
            continue;
        };
        let relative = match entry.path().strip_prefix(root) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let Some(relative_path) = relative_key(relative) else {
            log::warn!(
                "skipping media file with non UTF-8 path: {}",
                entry.path().display()
            );
            continue;
        };
        let nickname = if entry.depth() == 1 {
            root_nickname.clone()
        } else {
            entry
                .path()
                .parent()
                .and_then(|parent| parent.file_name())
                .and_then(|name| name.to_str())
                .unwrap_or_default()
                .to_string()
        };
        found.push(DiscoveredFile {
            relative_path,
            nickname,
            media_type,
        });
    }
    Ok(found)
}

fn is_regular_file(entry: &walkdir::DirEntry, canonical_root: &Path) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    if !file_type.is_symlink() {
        return false;
    }
    match fs::canonicalize(entry.path()) {
        Ok(target) if target.starts_with(canonical_root) => target.is_file(),
        Ok(target) => {
            log::warn!(
                "skipping symlink {} pointing outside the media root: {}",
                entry.path().display(),
                target.display()
            );
            false
        }
        Err(_) => false,
    }
}

/// Joins the normal components of a relative path with `/`.
pub fn relative_key(relative: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

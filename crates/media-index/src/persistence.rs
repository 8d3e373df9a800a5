//! Index file read/write.
//!
//! The index is stored as one indented JSON object mapping relative paths to
//! entries. Reads never fail: a missing or unreadable file yields an empty
//! index. Writes go to a temp file in the same directory which is then renamed
//! over the index file.

use std::collections::HashMap;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::types::MediaEntry;

pub type EntryMap = HashMap<String, MediaEntry>;

/// Loads the index file, recovering to an empty map on any failure.
pub fn load_index_file(path: &Path) -> EntryMap {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(error) if error.kind() == ErrorKind::NotFound => return EntryMap::new(),
        Err(error) => {
            log::warn!("media index read failed for {}: {}", path.display(), error);
            return EntryMap::new();
        }
    };

    match serde_json::from_slice::<EntryMap>(&data) {
        Ok(entries) => entries,
        Err(error) => {
            log::warn!(
                "media index {} is malformed, starting empty: {}",
                path.display(),
                error
            );
            EntryMap::new()
        }
    }
}

/// Writes the full map to `path`, replacing previous contents.
pub fn write_index_file(path: &Path, entries: &EntryMap) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let tmp = NamedTempFile::new_in(parent)?;
    // Keep the mode of an existing index; the temp file is created 0600.
    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }
    {
        let mut writer = BufWriter::new(tmp.as_file());
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
        entries.serialize(&mut serializer)?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|error| error.error)?;

    log::debug!(
        "wrote media index to {} ({} entries)",
        path.display(),
        entries.len()
    );
    Ok(())
}

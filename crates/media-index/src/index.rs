//! The media index store.
//!
//! Lifecycle at startup is load → reconcile → persist (see [`MediaIndex::open`]).
//! After that the map only changes through [`MediaIndex::update_entry`].

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{IndexError, Result};
use crate::persistence::{load_index_file, write_index_file, EntryMap};
use crate::types::{EntryPatch, MediaEntry};
use crate::walk::discover_media;

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    pub added: usize,
    pub refreshed: usize,
    pub removed: usize,
    pub total: usize,
}

#[derive(Debug)]
pub struct MediaIndex {
    root: PathBuf,
    index_path: PathBuf,
    entries: EntryMap,
}

impl MediaIndex {
    /// Creates an empty index for `root`, persisted at `index_path`.
    ///
    /// The root is canonicalized so that files directly inside it get the
    /// root directory's real name as nickname.
    pub fn new(root: &Path, index_path: PathBuf) -> Result<Self> {
        let root = fs::canonicalize(root)?;
        Ok(Self {
            root,
            index_path,
            entries: EntryMap::new(),
        })
    }

    /// Loads, reconciles and persists the index.
    pub fn open(root: &Path, index_path: PathBuf) -> Result<Self> {
        let mut index = Self::new(root, index_path)?;
        index.load();
        let stats = index.reconcile()?;
        log::info!(
            "media index for {}: {} entries ({} added, {} refreshed, {} removed)",
            index.root.display(),
            stats.total,
            stats.added,
            stats.refreshed,
            stats.removed
        );
        index.persist()?;
        Ok(index)
    }

    /// Replaces the in-memory map with the persisted one (empty if missing or corrupt).
    pub fn load(&mut self) {
        self.entries = load_index_file(&self.index_path);
    }

    /// Brings the map in line with the files currently under the root.
    pub fn reconcile(&mut self) -> Result<ReconcileStats> {
        let discovered = discover_media(&self.root)?;
        let mut stats = ReconcileStats::default();
        let mut seen = HashSet::with_capacity(discovered.len());

        for file in discovered {
            match self.entries.get_mut(&file.relative_path) {
                Some(entry) => {
                    if entry.nickname != file.nickname {
                        entry.nickname = file.nickname;
                        stats.refreshed += 1;
                    }
                }
                None => {
                    self.entries.insert(
                        file.relative_path.clone(),
                        MediaEntry::discovered(
                            file.relative_path.clone(),
                            file.nickname,
                            file.media_type,
                        ),
                    );
                    stats.added += 1;
                }
            }
            seen.insert(file.relative_path);
        }

        let before = self.entries.len();
        self.entries.retain(|path, _| seen.contains(path));
        stats.removed = before - self.entries.len();
        stats.total = self.entries.len();
        Ok(stats)
    }

    /// Writes the whole map to the index file.
    pub fn persist(&self) -> Result<()> {
        write_index_file(&self.index_path, &self.entries)
    }

    /// Applies user edits to an indexed entry, persists the index and returns
    /// the updated entry.
    ///
    /// If the write fails the previous entry is restored, so memory never holds
    /// an edit that is not on disk.
    pub fn update_entry(&mut self, path: &str, patch: &EntryPatch) -> Result<MediaEntry> {
        let previous = self
            .entries
            .get(path)
            .cloned()
            .ok_or_else(|| IndexError::UnknownEntry(path.to_string()))?;
        let mut updated = previous.clone();
        updated.apply(patch);

        self.entries.insert(path.to_string(), updated.clone());
        if let Err(error) = self.persist() {
            self.entries.insert(path.to_string(), previous);
            return Err(error);
        }
        Ok(updated)
    }

    /// Resolves a client supplied relative path to a regular file inside the root.
    pub fn resolve_file(&self, relative: &str) -> Result<PathBuf> {
        let requested = self.root.join(relative);
        let resolved = fs::canonicalize(&requested)
            .map_err(|_| IndexError::NotFound(relative.to_string()))?;

        if !resolved.starts_with(&self.root) {
            return Err(IndexError::OutsideRoot(requested));
        }
        if !resolved.is_file() {
            return Err(IndexError::NotFound(relative.to_string()));
        }
        Ok(resolved)
    }

    pub fn entries(&self) -> &EntryMap {
        &self.entries
    }

    pub fn get(&self, path: &str) -> Option<&MediaEntry> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }
}

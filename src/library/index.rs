//! The media index: the read-only catalog the repository queries.
//!
//! [`DirectoryIndex`] builds the catalog by walking a library directory and
//! reading tags with `lofty`. [`MemoryIndex`] serves fixed rows.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use lofty::prelude::*;
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::LoadError;

use super::model::{IndexRow, TrackId};

/// Read-only access to a catalog of locally stored audio.
pub trait MediaIndex: Send + Sync {
    /// Check that this process may read the index at all.
    fn check_access(&self) -> Result<(), LoadError>;

    /// Return every audio row in the index, music or not, in no particular order.
    fn query(&self) -> Result<Vec<IndexRow>, LoadError>;
}

/// A media index over a directory tree.
pub struct DirectoryIndex {
    root: PathBuf,
    settings: LibrarySettings,
}

impl DirectoryIndex {
    pub fn new(root: impl Into<PathBuf>, settings: LibrarySettings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }

    fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.settings
                    .extensions
                    .iter()
                    .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                    .any(|e| !e.is_empty() && e == ext)
            })
            .unwrap_or(false)
    }

    /// A file is music unless one of its directories (below the root) is a
    /// configured non-music directory.
    fn is_music(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let Some(parent) = relative.parent() else {
            return true;
        };
        !parent.components().any(|c| {
            let name = c.as_os_str().to_string_lossy();
            self.settings
                .non_music_dirs
                .iter()
                .any(|d| d.eq_ignore_ascii_case(&name))
        })
    }

    fn read_row(&self, path: &Path) -> IndexRow {
        let mut title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string);
        let mut artist: Option<String> = None;
        let mut album: Option<String> = None;
        let mut duration_ms: i64 = 0;

        match lofty::read_from_path(path) {
            Ok(tagged) => {
                duration_ms = i64::try_from(tagged.properties().duration().as_millis())
                    .unwrap_or(i64::MAX);

                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    if let Some(v) = tag.title() {
                        if !v.trim().is_empty() {
                            title = Some(v.to_string());
                        }
                    }
                    artist = tag.artist().map(|v| v.to_string());
                    album = tag.album().map(|v| v.to_string());
                }
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no readable tags");
            }
        }

        IndexRow {
            id: path_id(path),
            title,
            artist,
            album,
            duration_ms,
            locator: path.to_path_buf(),
            is_music: self.is_music(path),
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Identifier for the file at `path`; the same path always maps to the same id.
pub(crate) fn path_id(path: &Path) -> TrackId {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    TrackId(hasher.finish())
}

impl MediaIndex for DirectoryIndex {
    fn check_access(&self) -> Result<(), LoadError> {
        fs::read_dir(&self.root)
            .map(|_| ())
            .map_err(|e| LoadError::from_io(&self.root, &e))
    }

    fn query(&self) -> Result<Vec<IndexRow>, LoadError> {
        self.check_access()?;

        let mut walker = WalkDir::new(&self.root).follow_links(self.settings.follow_links);

        // Non-recursive = only the root directory.
        let depth_cap = if self.settings.recursive {
            self.settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        let include_hidden = self.settings.include_hidden;
        let mut rows = Vec::new();
        for entry in walker
            .into_iter()
            .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            if path.is_file() && self.is_audio_file(path) {
                rows.push(self.read_row(path));
            }
        }

        Ok(rows)
    }
}

/// A media index serving a fixed set of rows, or a fixed failure.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct MemoryIndex {
    rows: Result<Vec<IndexRow>, LoadError>,
    access: Result<(), LoadError>,
}

#[cfg(test)]
impl MemoryIndex {
    pub fn new(rows: Vec<IndexRow>) -> Self {
        Self {
            rows: Ok(rows),
            access: Ok(()),
        }
    }

    pub fn failing(err: LoadError) -> Self {
        Self {
            rows: Err(err),
            access: Ok(()),
        }
    }

    pub fn denied(root: impl Into<PathBuf>) -> Self {
        let err = LoadError::PermissionDenied(root.into());
        Self {
            rows: Err(err.clone()),
            access: Err(err),
        }
    }
}

#[cfg(test)]
impl MediaIndex for MemoryIndex {
    fn check_access(&self) -> Result<(), LoadError> {
        self.access.clone()
    }

    fn query(&self) -> Result<Vec<IndexRow>, LoadError> {
        self.rows.clone()
    }
}

//! Text host seam: reading Makefile sources by path.

use super::path::path_key;
use crate::error::ResolveError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Read access to Makefile text
pub trait SourceReader: Send + Sync {
    /// Read the file at `path` as a sequence of lines.
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, ResolveError>;

    /// Whether `path` names a readable file.
    fn exists(&self, path: &Path) -> bool;
}

/// Reads sources from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl SourceReader for FsSource {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, ResolveError> {
        let text = std::fs::read_to_string(path).map_err(|source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(text.lines().map(str::to_string).collect())
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// In-memory sources, e.g. unsaved editor buffers
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, (PathBuf, String)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the text for `path`.
    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        let path = path.into();
        self.files.insert(path_key(&path), (path, text.into()));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_file(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }
}

impl SourceReader for MemorySource {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, ResolveError> {
        match self.files.get(&path_key(path)) {
            Some((_, text)) => Ok(text.lines().map(str::to_string).collect()),
            None => Err(ResolveError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not in memory source"),
            }),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(&path_key(path))
    }
}

//! Root Makefile discovery.
//!
//! Walks the workspace and collects files whose name is one of the configured
//! Makefile names. Ignored directories are pruned, not just filtered.

use crate::config::DiscoveryConfig;
use crate::error::ResolveError;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Finds candidate root Makefiles under a workspace
pub struct RootDiscovery<'c> {
    root: PathBuf,
    config: &'c DiscoveryConfig,
}

impl<'c> RootDiscovery<'c> {
    pub fn new(root: impl Into<PathBuf>, config: &'c DiscoveryConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Walk the workspace and return root Makefiles sorted by path.
    pub fn discover(&self) -> Result<Vec<PathBuf>, ResolveError> {
        if !self.root.is_dir() {
            return Err(ResolveError::Io {
                path: self.root.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "workspace root is not a directory",
                ),
            });
        }

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .into_iter()
            .filter_entry(|entry| !self.should_ignore(entry));

        let mut roots = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable workspace entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() && self.is_makefile(&entry) {
                roots.push(entry.into_path());
            }
        }

        roots.sort();
        if roots.len() > self.config.max_roots {
            warn!(
                found = roots.len(),
                max_roots = self.config.max_roots,
                "Too many root Makefiles, truncating"
            );
            roots.truncate(self.config.max_roots);
        }
        debug!(root = %self.root.display(), count = roots.len(), "Discovered root Makefiles");
        Ok(roots)
    }

    fn is_makefile(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        self.config
            .makefile_names
            .iter()
            .any(|candidate| candidate.as_str() == name)
    }

    /// Match ignore patterns against path components below the workspace root.
    fn should_ignore(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
        is_ignored(relative, &self.config.ignore_patterns)
    }
}

fn is_ignored(relative: &Path, patterns: &[String]) -> bool {
    relative.components().any(|component| match component {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            patterns.iter().any(|pattern| pattern.as_str() == name)
        }
        _ => false,
    })
}

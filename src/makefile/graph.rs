//! Include graph access shared by the builder, locator and flattener.

use super::path::{path_key, resolve_include};
use super::source::SourceReader;
use crate::error::ResolveError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory that relative include arguments are resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncludeBase {
    /// The directory of the file containing the include directive
    #[default]
    IncludingFile,
    /// The directory of the root Makefile
    Root,
}

/// A view of the include graph rooted at one Makefile
pub struct IncludeGraph<'a> {
    source: &'a dyn SourceReader,
    root: PathBuf,
    base: IncludeBase,
}

impl<'a> IncludeGraph<'a> {
    pub fn new(source: &'a dyn SourceReader, root: impl Into<PathBuf>, base: IncludeBase) -> Self {
        Self {
            source,
            root: root.into(),
            base,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source(&self) -> &'a dyn SourceReader {
        self.source
    }

    pub fn read(&self, file: &Path) -> Result<Vec<String>, ResolveError> {
        self.source.read_lines(file)
    }

    /// Resolve an include argument found in `including_file`.
    pub fn resolve(&self, including_file: &Path, argument: &str) -> PathBuf {
        let anchor = match self.base {
            IncludeBase::IncludingFile => including_file,
            IncludeBase::Root => self.root.as_path(),
        };
        let base_dir = anchor.parent().unwrap_or_else(|| Path::new("/"));
        resolve_include(base_dir, argument)
    }

    /// Resolve an include directive to a file that must be scanned.
    ///
    /// Returns `Ok(None)` for a missing optional include and
    /// `UnresolvedInclude` for a missing mandatory one.
    pub fn include_target(
        &self,
        including_file: &Path,
        line: usize,
        argument: &str,
        optional: bool,
    ) -> Result<Option<PathBuf>, ResolveError> {
        let target = self.resolve(including_file, argument);
        if self.source.exists(&target) {
            return Ok(Some(target));
        }
        if optional {
            debug!(target = %target.display(), "Skipping missing optional include");
            return Ok(None);
        }
        Err(ResolveError::UnresolvedInclude {
            path: target,
            included_from: including_file.to_path_buf(),
            line,
        })
    }
}

/// Files currently being scanned, outermost first
#[derive(Debug, Default)]
pub(crate) struct ScanStack {
    frames: Vec<(String, PathBuf)>,
}

impl ScanStack {
    /// Push `file`, failing if it is already being scanned.
    pub(crate) fn enter(&mut self, file: &Path) -> Result<(), ResolveError> {
        let key = path_key(file);
        if self.frames.iter().any(|(k, _)| *k == key) {
            let mut chain: Vec<PathBuf> = self.frames.iter().map(|(_, p)| p.clone()).collect();
            chain.push(file.to_path_buf());
            return Err(ResolveError::CyclicInclude { chain });
        }
        self.frames.push((key, file.to_path_buf()));
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.frames.pop();
    }
}

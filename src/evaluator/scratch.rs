//! Scratch arena for synthetic Makefiles
//!
//! Each refresh opens a new generation directory and collects the arena's
//! own older ones. Generations are named `gen-<pid>-<arena>-<id>`, so several
//! sessions can share one workspace directory; another owner's generation is
//! only collected once it has sat untouched for [`ABANDONED_AFTER`].
//!
//! Requests stage files into the generation they started with; if that
//! generation has been collected in the meantime, staging fails with
//! `StaleGeneration` instead of writing into a half-deleted directory. A
//! staged file is removed when its [`StagedFile`] is dropped.

use crate::error::EvaluatorError;
use crate::makefile::FlattenedDocument;
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

const GENERATION_PREFIX: &str = "gen-";

/// Age after which a generation owned by another arena counts as abandoned
pub const ABANDONED_AFTER: Duration = Duration::from_secs(24 * 60 * 60);

static NEXT_ARENA: AtomicU64 = AtomicU64::new(1);

/// Directory holding the scratch arena of `workspace_root` under `base`.
///
/// Workspaces are keyed by a BLAKE3 hash of their path.
pub fn workspace_scratch_dir(base: &Path, workspace_root: &Path) -> PathBuf {
    let hash = blake3::hash(workspace_root.to_string_lossy().as_bytes());
    let key = hex::encode(&hash.as_bytes()[..8]);
    base.join("workspaces").join(key)
}

/// Default base directory: the platform cache dir, else the temp dir.
pub fn default_scratch_base() -> PathBuf {
    directories::ProjectDirs::from("", "", "clarifier")
        .map(|dirs| dirs.cache_dir().join("scratch"))
        .unwrap_or_else(|| std::env::temp_dir().join("clarifier"))
}

/// One generation of the scratch arena
#[derive(Debug)]
pub struct ScratchGeneration {
    id: u64,
    dir: PathBuf,
    sequence: AtomicU64,
}

impl ScratchGeneration {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `document` as `context<N>.mk` in this generation.
    pub fn stage(&self, document: &FlattenedDocument) -> Result<StagedFile, EvaluatorError> {
        if !self.dir.is_dir() {
            return Err(EvaluatorError::StaleGeneration {
                generation: self.id,
            });
        }
        let n = self.sequence.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.join(format!("context{}.mk", n));
        fs::write(&path, document.render()).map_err(|e| {
            if self.dir.is_dir() {
                EvaluatorError::Scratch(e)
            } else {
                EvaluatorError::StaleGeneration {
                    generation: self.id,
                }
            }
        })?;
        debug!(path = %path.display(), lines = document.line_count(), "Staged synthetic makefile");
        Ok(StagedFile { path })
    }
}

/// A synthetic Makefile written into a generation; deleted on drop.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed staged makefile"),
            // Already gone with its generation.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), "Failed to remove staged makefile: {}", e),
        }
    }
}

/// Generation-indexed scratch directories for one workspace
#[derive(Debug)]
pub struct ScratchArena {
    root: PathBuf,
    owner: String,
    next_id: AtomicU64,
    current: RwLock<Option<Arc<ScratchGeneration>>>,
}

impl ScratchArena {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let owner = format!(
            "{}{}-{}-",
            GENERATION_PREFIX,
            std::process::id(),
            NEXT_ARENA.fetch_add(1, Ordering::Relaxed)
        );
        Self {
            root: root.into(),
            owner,
            next_id: AtomicU64::new(1),
            current: RwLock::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open a new generation and collect the older ones.
    pub fn refresh(&self) -> Result<Arc<ScratchGeneration>, EvaluatorError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let dir = self.root.join(format!("{}{}", self.owner, id));
        fs::create_dir_all(&dir)?;

        let generation = Arc::new(ScratchGeneration {
            id,
            dir,
            sequence: AtomicU64::new(0),
        });
        *self.current.write() = Some(Arc::clone(&generation));
        info!(generation = id, dir = %generation.dir.display(), "Opened scratch generation");

        self.collect_garbage(&generation.dir);
        Ok(generation)
    }

    /// Current generation, opening a new one if there is none or its
    /// directory has disappeared.
    pub fn current(&self) -> Result<Arc<ScratchGeneration>, EvaluatorError> {
        if let Some(generation) = self.current.read().as_ref() {
            if generation.dir.is_dir() {
                return Ok(Arc::clone(generation));
            }
            warn!(generation = generation.id, "Scratch generation vanished, reopening");
        }
        self.refresh()
    }

    fn collect_garbage(&self, keep: &Path) {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(root = %self.root.display(), "Failed to list scratch arena: {}", e);
                return;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(GENERATION_PREFIX) || path == keep || !path.is_dir() {
                continue;
            }
            if !name.starts_with(&self.owner) && !is_abandoned(&path) {
                continue;
            }
            match fs::remove_dir_all(&path) {
                Ok(()) => debug!(dir = %path.display(), "Collected scratch generation"),
                Err(e) => warn!(dir = %path.display(), "Failed to collect scratch generation: {}", e),
            }
        }
    }
}

fn is_abandoned(dir: &Path) -> bool {
    fs::metadata(dir)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .map(|age| age >= ABANDONED_AFTER)
        .unwrap_or(false)
}

//! Include path resolution and path keys
//!
//! Include arguments are resolved textually; existence is checked by callers
//! through the [`SourceReader`](super::source::SourceReader).

use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Resolve an include directive's argument against `base_dir`.
///
/// Absolute arguments are returned unchanged. Otherwise each leading `../`
/// pops one segment off `base_dir` and each leading `./` is dropped; the
/// remainder is appended with a single separator. Whitespace inside the
/// argument is stripped. No existence check is performed.
pub fn resolve_include(base_dir: &Path, include_arg: &str) -> PathBuf {
    let arg: String = include_arg.split_whitespace().collect();
    if arg.starts_with('/') {
        return PathBuf::from(arg);
    }

    let mut resolved = base_dir.to_path_buf();
    let mut components = Path::new(&arg).components().peekable();
    while let Some(component) = components.peek() {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            _ => break,
        }
        components.next();
    }
    for component in components {
        resolved.push(component.as_os_str());
    }
    resolved
}

/// Directory portion of a file path, as a string.
pub fn parent_dir_string(path: &Path) -> String {
    path.parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Resolve `.` and `..` segments without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Key used to compare files across the include graph.
///
/// Existing files are canonicalized (symlinks resolved); missing ones are
/// normalized lexically. Unicode is normalized to NFC and trailing slashes
/// are removed.
pub fn path_key(path: &Path) -> String {
    let resolved = dunce::canonicalize(path).unwrap_or_else(|_| normalize_lexically(path));
    normalize_path_string(&resolved.to_string_lossy())
}

/// Normalize a path string for comparison (without filesystem access)
pub fn normalize_path_string(path: &str) -> String {
    let mut result: String = path.nfc().collect();
    if result.len() > 1 {
        while result.ends_with('/') || result.ends_with('\\') {
            result.pop();
        }
    }
    result
}

/// Whether two paths name the same file.
pub fn same_file(a: &Path, b: &Path) -> bool {
    a == b || path_key(a) == path_key(b)
}

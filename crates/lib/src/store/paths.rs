//! Lexical path handling for the store.
//!
//! Nothing here touches the filesystem: the managed file usually does not
//! exist yet when its path is resolved, so containment is decided on the
//! normalized components alone.

use std::path::{Component, Path, PathBuf};

/// Normalize a path without touching the filesystem.
///
/// `.` components are dropped and `..` pops the previous component. A `..`
/// at the filesystem root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::ParentDir => {
        normalized.pop();
      }
      Component::CurDir => {}
      _ => normalized.push(component),
    }
  }
  normalized
}

/// Returns true if `path` is `base` or a descendant of it.
///
/// Comparison is component-wise, so `/tmp/xy` is not inside `/tmp/x`.
pub fn is_within(path: &Path, base: &Path) -> bool {
  path.starts_with(base)
}

/// Split a path inside `base` into `(location, name)`.
///
/// `location` is the directory relative to `base` (empty for files directly
/// under it) and `name` is the final component. Returns `None` when `path`
/// is not inside `base`.
pub fn split_relative(path: &Path, base: &Path) -> Option<(String, String)> {
  let relative = path.strip_prefix(base).ok()?;
  let name = relative
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();
  let location = relative
    .parent()
    .map(|p| p.to_string_lossy().into_owned())
    .unwrap_or_default();
  Some((location, name))
}

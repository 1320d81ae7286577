//! Test utilities for localfile-lib.

use std::path::Path;

use tempfile::TempDir;

use crate::store::Store;

/// Create a store rooted in a fresh temporary directory.
///
/// The `TempDir` must be kept alive for as long as the store is used.
pub fn temp_store() -> (TempDir, Store) {
  let temp = TempDir::new().unwrap();
  let store = Store::new(temp.path()).unwrap();
  (temp, store)
}

/// Write a file relative to `root`, creating parent directories.
pub fn write_fixture(root: &Path, relative: &str, content: &str) -> std::path::PathBuf {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(&path, content).unwrap();
  path
}

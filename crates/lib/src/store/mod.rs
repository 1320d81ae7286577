//! Path-scoped file store.
//!
//! The store owns a base directory and performs every file operation the
//! provider needs through paths that are guaranteed to stay inside it.
//!
//! # Layout
//!
//! ```text
//! <base_dir>/
//! ├── <name>                  # location = ""
//! └── <location>/
//!     └── <name>              # parent directories created on write
//! ```
//!
//! All state of interest lives on disk and is re-read on every call; the
//! store itself only holds the canonical base directory.

mod archive;
pub mod paths;
mod types;

use std::fs::{self, DirBuilder, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

#[cfg(unix)]
use crate::consts::{DIR_MODE, FILE_MODE};

pub use types::{ErrorKind, StoreError};

/// A file path split relative to the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativePath {
  /// Normalized absolute path.
  pub absolute: PathBuf,
  /// Directory relative to the base, empty for top-level files.
  pub location: String,
  /// Final path component.
  pub name: String,
}

/// File client confined to a single base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
  base_dir: PathBuf,
}

impl Store {
  /// Create a store rooted at `base_dir`.
  ///
  /// The directory must exist. It is canonicalized once here so that
  /// containment checks compare against a symlink-free absolute path.
  pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
    let requested = base_dir.as_ref();
    let canonical = dunce::canonicalize(requested).map_err(|e| StoreError::io(requested, e))?;

    let metadata = fs::metadata(&canonical).map_err(|e| StoreError::io(&canonical, e))?;
    if !metadata.is_dir() {
      return Err(StoreError::NotADirectory { path: canonical });
    }

    debug!(base_dir = %canonical.display(), "store opened");
    Ok(Self { base_dir: canonical })
  }

  /// The canonical base directory.
  pub fn base_dir(&self) -> &Path {
    &self.base_dir
  }

  /// Resolve `location` and `name` into an absolute path inside the base
  /// directory.
  ///
  /// The joined path is normalized lexically and must be the base directory
  /// or a descendant of it. Absolute segments replace the join prefix, so
  /// they only pass when they already point inside the base.
  pub fn resolve_path(&self, location: &str, name: &str) -> Result<PathBuf, StoreError> {
    let joined = self.base_dir.join(location).join(name);
    let full = paths::normalize(&joined);

    if !paths::is_within(&full, &self.base_dir) {
      debug!(
        location = %location,
        name = %name,
        resolved = %full.display(),
        "rejected path outside base directory"
      );
      return Err(StoreError::PathEscape {
        path: full,
        base: self.base_dir.clone(),
      });
    }

    Ok(full)
  }

  /// Split an absolute path inside the base directory into location and name.
  pub fn relative_to_base(&self, path: &Path) -> Result<RelativePath, StoreError> {
    let absolute = paths::normalize(path);
    match paths::split_relative(&absolute, &self.base_dir) {
      Some((location, name)) => Ok(RelativePath {
        absolute,
        location,
        name,
      }),
      None => Err(StoreError::PathEscape {
        path: absolute,
        base: self.base_dir.clone(),
      }),
    }
  }

  /// Read the whole file as UTF-8 text.
  pub fn read_file(&self, path: &Path) -> Result<String, StoreError> {
    let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    debug!(path = %path.display(), len = content.len(), "read file");
    Ok(content)
  }

  /// Write `content` to `path`, creating parent directories and replacing
  /// any existing file in place.
  pub fn write_file(&self, path: &Path, content: &str) -> Result<(), StoreError> {
    create_parent_dirs(path)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
      use std::os::unix::fs::OpenOptionsExt;
      options.mode(FILE_MODE);
    }

    let mut file = options.open(path).map_err(|e| StoreError::io(path, e))?;
    file
      .write_all(content.as_bytes())
      .map_err(|e| StoreError::io(path, e))?;

    info!(path = %path.display(), len = content.len(), "wrote file");
    Ok(())
  }

  /// Remove the file at `path`.
  ///
  /// A missing file is not an error. Parent directories are left alone.
  pub fn delete(&self, path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
      Ok(()) => {
        info!(path = %path.display(), "deleted file");
        Ok(())
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "file already gone");
        Ok(())
      }
      Err(e) => Err(StoreError::Io {
        path: path.to_path_buf(),
        source: e,
      }),
    }
  }

  /// Check whether anything exists at `path`.
  pub fn exists(&self, path: &Path) -> Result<bool, StoreError> {
    match fs::metadata(path) {
      Ok(_) => Ok(true),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
      Err(e) => Err(StoreError::Io {
        path: path.to_path_buf(),
        source: e,
      }),
    }
  }

  /// Create a zip at `archive_path` holding the bytes of `source_path` as
  /// its only entry, named `entry_name`.
  ///
  /// The source is read before the archive is touched, so an unreadable
  /// source leaves any existing archive as it was.
  pub fn create_archive(&self, archive_path: &Path, source_path: &Path, entry_name: &str) -> Result<(), StoreError> {
    create_parent_dirs(archive_path)?;

    let bytes = fs::read(source_path).map_err(|e| StoreError::SourceUnreadable {
      path: source_path.to_path_buf(),
      source: e,
    })?;

    archive::write_single_entry(archive_path, entry_name, &bytes)?;

    info!(
      archive = %archive_path.display(),
      source = %source_path.display(),
      entry = %entry_name,
      len = bytes.len(),
      "created archive"
    );
    Ok(())
  }
}

/// Create every missing parent directory of `path`.
fn create_parent_dirs(path: &Path) -> Result<(), StoreError> {
  let Some(parent) = path.parent() else {
    return Ok(());
  };

  let mut builder = DirBuilder::new();
  builder.recursive(true);
  #[cfg(unix)]
  {
    use std::os::unix::fs::DirBuilderExt;
    builder.mode(DIR_MODE);
  }

  builder.create(parent).map_err(|e| StoreError::io(parent, e))
}

//! Error types for store operations.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Coarse classification of a [`StoreError`].
///
/// Callers branch on the kind rather than on individual variants: a missing
/// file means "resource gone" during a refresh but is a hard failure for an
/// explicit read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The resolved path falls outside the base directory.
  PathEscape,
  /// The file or archive does not exist.
  NotFound,
  /// Any other I/O failure (permissions, disk full, bad archive write).
  IoFailure,
  /// The source file for an archive could not be opened or read.
  SourceUnreadable,
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      ErrorKind::PathEscape => "path escape",
      ErrorKind::NotFound => "not found",
      ErrorKind::IoFailure => "io failure",
      ErrorKind::SourceUnreadable => "source unreadable",
    };
    write!(f, "{}", s)
  }
}

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
  /// The joined and normalized path is not inside the base directory.
  #[error("path escapes base directory: {} is outside {}", path.display(), base.display())]
  PathEscape { path: PathBuf, base: PathBuf },

  /// The file does not exist.
  #[error("file not found: {}", path.display())]
  NotFound { path: PathBuf },

  /// The base directory exists but is not a directory.
  #[error("not a directory: {}", path.display())]
  NotADirectory { path: PathBuf },

  /// I/O error on the given path.
  #[error("io error on {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The archive source could not be opened or read.
  #[error("cannot read archive source {}: {source}", path.display())]
  SourceUnreadable {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The zip writer failed.
  #[error("failed to write archive {}: {source}", path.display())]
  Archive {
    path: PathBuf,
    #[source]
    source: zip::result::ZipError,
  },
}

impl StoreError {
  /// Wrap an I/O error, mapping `NotFound` to [`StoreError::NotFound`].
  pub(crate) fn io(path: &Path, source: io::Error) -> Self {
    if source.kind() == io::ErrorKind::NotFound {
      StoreError::NotFound {
        path: path.to_path_buf(),
      }
    } else {
      StoreError::Io {
        path: path.to_path_buf(),
        source,
      }
    }
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      StoreError::PathEscape { .. } => ErrorKind::PathEscape,
      StoreError::NotFound { .. } => ErrorKind::NotFound,
      StoreError::SourceUnreadable { .. } => ErrorKind::SourceUnreadable,
      StoreError::NotADirectory { .. } | StoreError::Io { .. } | StoreError::Archive { .. } => ErrorKind::IoFailure,
    }
  }

  pub fn is_not_found(&self) -> bool {
    self.kind() == ErrorKind::NotFound
  }

  /// The path the error concerns.
  pub fn path(&self) -> &Path {
    match self {
      StoreError::PathEscape { path, .. }
      | StoreError::NotFound { path }
      | StoreError::NotADirectory { path }
      | StoreError::Io { path, .. }
      | StoreError::SourceUnreadable { path, .. }
      | StoreError::Archive { path, .. } => path,
    }
  }
}

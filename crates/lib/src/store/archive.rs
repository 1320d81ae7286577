//! Single-entry zip construction.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::consts::FILE_MODE;

use super::types::StoreError;

/// Entry options shared by every archive the store writes.
///
/// The timestamp is pinned to the zip epoch so identical inputs produce
/// byte-identical archives.
fn entry_options() -> SimpleFileOptions {
  SimpleFileOptions::default()
    .compression_method(CompressionMethod::Deflated)
    .unix_permissions(FILE_MODE)
    .last_modified_time(DateTime::default())
}

/// Write `bytes` as the only entry of a new zip at `archive_path`.
///
/// Any existing file at `archive_path` is truncated. The parent directory
/// must already exist.
pub(super) fn write_single_entry(archive_path: &Path, entry_name: &str, bytes: &[u8]) -> Result<(), StoreError> {
  let archive_err = |source| StoreError::Archive {
    path: archive_path.to_path_buf(),
    source,
  };

  let file = File::create(archive_path).map_err(|e| StoreError::io(archive_path, e))?;
  let mut writer = ZipWriter::new(file);

  writer.start_file(entry_name, entry_options()).map_err(archive_err)?;
  writer
    .write_all(bytes)
    .map_err(|e| StoreError::io(archive_path, e))?;

  let mut file = writer.finish().map_err(archive_err)?;
  file.flush().map_err(|e| StoreError::io(archive_path, e))?;
  Ok(())
}

//! The localfile provider.
//!
//! This is the adapter between a host and the [`Store`]: it declares the
//! provider, resource and data source schemas, validates the provider
//! configuration into a store, and translates lifecycle calls into store
//! operations.
//!
//! # Submodules
//!
//! - [`diagnostics`] - Error and warning reporting to the host
//! - [`schema`] - Attribute schemas and plan helpers
//! - [`resource`] - Lifecycle traits and their JSON-level adapters
//! - [`txt`] - The `localfile_txt` resource
//! - [`onefile_zip`] - The `localfile_onefile_zip` resource
//! - [`txt_data_source`] - The `localfile_txt` data source
//! - [`server`] - Request dispatch for the JSON-lines protocol

pub mod diagnostics;
pub mod onefile_zip;
pub mod resource;
pub mod schema;
pub mod server;
pub mod txt;
pub mod txt_data_source;

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::{BASE_DIR_ENV, PROVIDER_TYPE_NAME};
use crate::store::{ErrorKind, RelativePath, Store, StoreError};

use diagnostics::Diagnostics;
use resource::{ErasedDataSource, ErasedResource, erase_data_source, erase_resource};
use schema::{Attribute, Schema};

/// Provider-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
  /// Base directory for all file operations. Falls back to
  /// `LOCALFILE_BASE_DIR` when unset.
  #[serde(default)]
  pub base_dir: Option<String>,
}

impl ProviderConfig {
  pub fn with_base_dir(base_dir: impl Into<String>) -> Self {
    Self {
      base_dir: Some(base_dir.into()),
    }
  }

  /// The configured base directory, or the environment fallback.
  fn effective_base_dir(&self) -> Option<String> {
    self
      .base_dir
      .clone()
      .filter(|dir| !dir.is_empty())
      .or_else(|| std::env::var(BASE_DIR_ENV).ok().filter(|dir| !dir.is_empty()))
  }
}

#[derive(Debug, Clone)]
pub struct LocalfileProvider {
  version: String,
}

impl LocalfileProvider {
  pub fn new(version: impl Into<String>) -> Self {
    Self {
      version: version.into(),
    }
  }

  pub fn type_name(&self) -> &'static str {
    PROVIDER_TYPE_NAME
  }

  pub fn version(&self) -> &str {
    &self.version
  }

  pub fn schema(&self) -> Schema {
    Schema::new(
      "The localfile provider manages simple text files and zip archives within a designated base directory.",
      vec![Attribute::optional(
        "base_dir",
        "Base directory for all file operations. Must be an existing directory. Defaults to the LOCALFILE_BASE_DIR environment variable.",
      )],
    )
  }

  /// Validate the configuration and open the store every resource and data
  /// source will share.
  pub fn configure(&self, config: &ProviderConfig) -> Result<Arc<Store>, Diagnostics> {
    let Some(base_dir) = config.effective_base_dir() else {
      return Err(Diagnostics::attribute_error(
        "base_dir",
        "Missing base_dir",
        format!(
          "The base_dir must be specified for the localfile provider, either in the provider configuration or via {}.",
          BASE_DIR_ENV
        ),
      ));
    };

    let requested = std::path::absolute(Path::new(&base_dir)).map_err(|e| {
      Diagnostics::attribute_error("base_dir", "Invalid base_dir", format!("Cannot resolve base_dir: {}", e))
    })?;
    debug!(base_dir = %requested.display(), "configuring localfile provider");

    let store = Store::new(&requested).map_err(|e| {
      let detail = match (&e, e.kind()) {
        (StoreError::NotADirectory { .. }, _) => "The base_dir must be a directory.".to_string(),
        (_, ErrorKind::NotFound) => format!("Base directory does not exist: {}", e),
        _ => format!("Cannot resolve base_dir: {}", e),
      };
      Diagnostics::attribute_error("base_dir", "Invalid base_dir", detail)
    })?;

    info!(local_file_base_dir = %store.base_dir().display(), "configured localfile provider");
    Ok(Arc::new(store))
  }

  pub fn resources(&self) -> Vec<Box<dyn ErasedResource>> {
    vec![
      erase_resource(txt::TxtResource),
      erase_resource(onefile_zip::OneFileZipResource),
    ]
  }

  pub fn data_sources(&self) -> Vec<Box<dyn ErasedDataSource>> {
    vec![erase_data_source(txt_data_source::TxtDataSource)]
  }

  /// Full type name for a resource or data source suffix.
  pub fn full_type_name(&self, suffix: &str) -> String {
    format!("{}_{}", PROVIDER_TYPE_NAME, suffix)
  }
}

pub(crate) fn path_string(path: &Path) -> String {
  path.to_string_lossy().into_owned()
}

/// Borrow a state attribute when it is set and non-empty.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|v| !v.is_empty())
}

/// Split an import ID (an absolute path) relative to the base directory.
pub(crate) fn import_relative(store: &Store, id: &str) -> Result<RelativePath, Diagnostics> {
  let rel = store.relative_to_base(Path::new(id)).map_err(|e| {
    Diagnostics::error(
      "Invalid import ID",
      format!("Cannot determine relative path for import ID: {}", e),
    )
  })?;

  if rel.name.is_empty() {
    return Err(Diagnostics::error(
      "Invalid import ID",
      "The import ID must be the absolute path of a file inside the base directory.",
    ));
  }
  Ok(rel)
}

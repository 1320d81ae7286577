//! The `localfile_txt` data source: reads an existing text file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::Store;

use super::diagnostics::Diagnostics;
use super::resource::DataSource;
use super::schema::{Attribute, Schema};
use super::path_string;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxtDataSourceModel {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub location: Option<String>,
  #[serde(default)]
  pub data: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TxtDataSource;

impl DataSource for TxtDataSource {
  type Model = TxtDataSourceModel;

  fn type_suffix(&self) -> &'static str {
    "txt"
  }

  fn schema(&self) -> Schema {
    Schema::new(
      "Reads an existing text file from the local filesystem.",
      vec![
        Attribute::computed("id", "Absolute path to the file on disk."),
        Attribute::required("name", "Name of the file to read, including extension."),
        Attribute::optional("location", "Subdirectory within the base directory where the file resides."),
        Attribute::computed("data", "Contents of the file."),
      ],
    )
  }

  fn read(&self, store: &Store, config: TxtDataSourceModel) -> Result<TxtDataSourceModel, Diagnostics> {
    if config.name.is_empty() {
      return Err(Diagnostics::attribute_error(
        "name",
        "Missing file name",
        "The name attribute must be provided.",
      ));
    }

    let location = config.location.unwrap_or_default();
    let path = store
      .resolve_path(&location, &config.name)
      .map_err(|e| Diagnostics::error("Invalid file path", e))?;

    // A missing file is an error here, unlike a resource refresh.
    let content = store.read_file(&path).map_err(|e| {
      Diagnostics::error(
        "Error reading file",
        format!("Could not read file {}: {}", path.display(), e),
      )
    })?;

    debug!(file_path = %path.display(), "read text file via data source");

    Ok(TxtDataSourceModel {
      id: Some(path_string(&path)),
      name: config.name,
      location: Some(location),
      data: Some(content),
    })
  }
}

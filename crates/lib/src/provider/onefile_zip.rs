//! The `localfile_onefile_zip` resource: a zip archive holding one file.
//!
//! Every input attribute forces replacement, so update never touches disk.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::store::Store;

use super::diagnostics::Diagnostics;
use super::resource::{ReadOutcome, Resource};
use super::schema::{Attribute, Schema};
use super::{import_relative, non_empty, path_string};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneFileZipModel {
  #[serde(default)]
  pub id: Option<String>,
  /// Absolute path of the file to archive. Not confined to the base
  /// directory; usually the `id` of a `localfile_txt` resource.
  #[serde(default)]
  pub src_data_file: Option<String>,
  pub name: String,
  #[serde(default)]
  pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OneFileZipResource;

impl Resource for OneFileZipResource {
  type Model = OneFileZipModel;

  fn type_suffix(&self) -> &'static str {
    "onefile_zip"
  }

  fn schema(&self) -> Schema {
    Schema::new(
      "Creates a zip archive containing a single source file.",
      vec![
        Attribute::computed("id", "Absolute path to the zip archive on disk.").use_state_for_unknown(),
        Attribute::required(
          "src_data_file",
          "Absolute path to the source file to include in the zip. Typically references a localfile_txt resource's id.",
        )
        .requires_replace(),
        Attribute::required("name", "Name of the zip archive file.").requires_replace(),
        Attribute::optional("location", "Subdirectory within the base directory to place the zip archive.")
          .with_default("")
          .requires_replace(),
      ],
    )
  }

  fn create(&self, store: &Store, plan: OneFileZipModel) -> Result<OneFileZipModel, Diagnostics> {
    let src = plan.src_data_file.unwrap_or_default();
    let location = plan.location.unwrap_or_default();

    let zip_path = store
      .resolve_path(&location, &plan.name)
      .map_err(|e| Diagnostics::error("Failed to determine zip path", e))?;

    // The entry is named after the source file, without its directories.
    let Some(entry_name) = Path::new(&src).file_name().map(|n| n.to_string_lossy().into_owned()) else {
      return Err(Diagnostics::attribute_error(
        "src_data_file",
        "Error creating zip archive",
        format!("src_data_file {:?} does not name a file", src),
      ));
    };

    store
      .create_archive(&zip_path, Path::new(&src), &entry_name)
      .map_err(|e| Diagnostics::error("Error creating zip archive", e))?;

    info!(zip_path = %zip_path.display(), entry = %entry_name, "created zip archive");

    Ok(OneFileZipModel {
      id: Some(path_string(&zip_path)),
      src_data_file: Some(src),
      name: plan.name,
      location: Some(location),
    })
  }

  fn read(&self, store: &Store, state: OneFileZipModel) -> Result<ReadOutcome<OneFileZipModel>, Diagnostics> {
    let Some(id) = non_empty(&state.id).map(str::to_string) else {
      return Ok(ReadOutcome::Present(state));
    };

    match store.exists(Path::new(&id)) {
      Ok(true) => Ok(ReadOutcome::Present(state)),
      Ok(false) => {
        info!(path = %id, "zip file removed from disk, removing from state");
        Ok(ReadOutcome::Removed)
      }
      Err(e) => Err(Diagnostics::error("Error reading zip file", e)),
    }
  }

  /// Every input forces replacement, so the prior state still describes
  /// what is on disk.
  fn update(&self, _store: &Store, prior: OneFileZipModel, _plan: OneFileZipModel) -> Result<OneFileZipModel, Diagnostics> {
    Ok(prior)
  }

  fn delete(&self, store: &Store, state: OneFileZipModel) -> Result<(), Diagnostics> {
    let Some(id) = non_empty(&state.id) else {
      return Ok(());
    };

    store
      .delete(Path::new(id))
      .map_err(|e| Diagnostics::error("Error deleting zip file", e))?;
    info!(zip_path = %id, "deleted zip archive");
    Ok(())
  }

  fn import_state(&self, store: &Store, id: &str) -> Result<OneFileZipModel, Diagnostics> {
    let rel = import_relative(store, id)?;
    Ok(OneFileZipModel {
      id: Some(path_string(&rel.absolute)),
      src_data_file: None,
      name: rel.name,
      location: Some(rel.location),
    })
  }
}

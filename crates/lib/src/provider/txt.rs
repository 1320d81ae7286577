//! The `localfile_txt` resource: a plain text file under the base directory.
//!
//! `name` and `location` pick the file and force replacement when they
//! change; `data` is rewritten in place on update. The `id` is the absolute
//! path of the file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::store::Store;

use super::diagnostics::Diagnostics;
use super::resource::{ReadOutcome, Resource};
use super::schema::{Attribute, Schema};
use super::{import_relative, non_empty, path_string};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxtResourceModel {
  #[serde(default)]
  pub id: Option<String>,
  pub name: String,
  #[serde(default)]
  pub location: Option<String>,
  #[serde(default)]
  pub data: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TxtResource;

impl Resource for TxtResource {
  type Model = TxtResourceModel;

  fn type_suffix(&self) -> &'static str {
    "txt"
  }

  fn schema(&self) -> Schema {
    Schema::new(
      "Creates and manages a text file on the local filesystem.",
      vec![
        Attribute::computed("id", "Absolute path to the file on disk.").use_state_for_unknown(),
        Attribute::required("name", "Name of the file, including extension.").requires_replace(),
        Attribute::optional("location", "Subdirectory within the base directory to place the file.")
          .with_default("")
          .requires_replace(),
        Attribute::required("data", "Contents to write to the file."),
      ],
    )
  }

  fn create(&self, store: &Store, plan: TxtResourceModel) -> Result<TxtResourceModel, Diagnostics> {
    let location = plan.location.unwrap_or_default();
    let path = store
      .resolve_path(&location, &plan.name)
      .map_err(|e| Diagnostics::error("Failed to determine file path", e))?;

    let data = plan.data.unwrap_or_default();
    store
      .write_file(&path, &data)
      .map_err(|e| Diagnostics::error("Error writing file", e))?;

    info!(file_path = %path.display(), "created text file");

    Ok(TxtResourceModel {
      id: Some(path_string(&path)),
      name: plan.name,
      location: Some(location),
      data: Some(data),
    })
  }

  fn read(&self, store: &Store, state: TxtResourceModel) -> Result<ReadOutcome<TxtResourceModel>, Diagnostics> {
    let Some(id) = non_empty(&state.id).map(str::to_string) else {
      return Ok(ReadOutcome::Present(state));
    };

    match store.read_file(Path::new(&id)) {
      Ok(content) => Ok(ReadOutcome::Present(TxtResourceModel {
        data: Some(content),
        ..state
      })),
      Err(e) if e.is_not_found() => {
        info!(path = %id, "file no longer exists, removing from state");
        Ok(ReadOutcome::Removed)
      }
      Err(e) => Err(Diagnostics::error("Error reading file", e)),
    }
  }

  fn update(
    &self,
    store: &Store,
    prior: TxtResourceModel,
    plan: TxtResourceModel,
  ) -> Result<TxtResourceModel, Diagnostics> {
    let data = plan.data.unwrap_or_default();

    if prior.data.as_deref() != Some(data.as_str()) {
      let Some(id) = non_empty(&prior.id) else {
        return Err(Diagnostics::error("Error updating file", "resource state has no id"));
      };
      store
        .write_file(Path::new(id), &data)
        .map_err(|e| Diagnostics::error("Error updating file", e))?;
      info!(file_path = %id, "updated text file contents");
    }

    Ok(TxtResourceModel {
      data: Some(data),
      ..prior
    })
  }

  fn delete(&self, store: &Store, state: TxtResourceModel) -> Result<(), Diagnostics> {
    let Some(id) = non_empty(&state.id) else {
      return Ok(());
    };

    store
      .delete(Path::new(id))
      .map_err(|e| Diagnostics::error("Error deleting file", e))?;
    info!(file_path = %id, "deleted text file");
    Ok(())
  }

  fn import_state(&self, store: &Store, id: &str) -> Result<TxtResourceModel, Diagnostics> {
    let rel = import_relative(store, id)?;
    Ok(TxtResourceModel {
      id: Some(path_string(&rel.absolute)),
      name: rel.name,
      location: Some(rel.location),
      data: None,
    })
  }
}

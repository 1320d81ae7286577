//! Resource and data source lifecycle traits.
//!
//! Resources and data sources are written against typed models. The
//! dispatcher works on JSON values, so each implementation is wrapped in an
//! erased adapter that decodes the incoming state, calls the typed
//! operation and encodes the result.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::store::Store;

use super::diagnostics::Diagnostics;
use super::schema::Schema;

/// Result of refreshing a resource from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<M> {
  /// The resource still exists; carries the refreshed state.
  Present(M),
  /// The resource was deleted outside the provider and should be dropped
  /// from state.
  Removed,
}

/// A managed resource.
///
/// Every operation receives the configured store explicitly.
pub trait Resource: Send + Sync {
  type Model: Serialize + DeserializeOwned;

  /// Type name suffix, appended to the provider type name.
  fn type_suffix(&self) -> &'static str;

  fn schema(&self) -> Schema;

  fn create(&self, store: &Store, plan: Self::Model) -> Result<Self::Model, Diagnostics>;

  fn read(&self, store: &Store, state: Self::Model) -> Result<ReadOutcome<Self::Model>, Diagnostics>;

  fn update(&self, store: &Store, prior: Self::Model, plan: Self::Model) -> Result<Self::Model, Diagnostics>;

  fn delete(&self, store: &Store, state: Self::Model) -> Result<(), Diagnostics>;

  /// Build state for an existing object identified by `id`.
  fn import_state(&self, store: &Store, id: &str) -> Result<Self::Model, Diagnostics>;
}

/// A read-only data source.
pub trait DataSource: Send + Sync {
  type Model: Serialize + DeserializeOwned;

  fn type_suffix(&self) -> &'static str;

  fn schema(&self) -> Schema;

  fn read(&self, store: &Store, config: Self::Model) -> Result<Self::Model, Diagnostics>;
}

/// JSON-level view of a [`Resource`] used by the dispatcher.
pub trait ErasedResource: Send + Sync {
  fn type_suffix(&self) -> &'static str;
  fn schema(&self) -> Schema;
  fn create(&self, store: &Store, plan: Value) -> Result<Value, Diagnostics>;
  /// `Ok(None)` means the resource is gone.
  fn read(&self, store: &Store, state: Value) -> Result<Option<Value>, Diagnostics>;
  fn update(&self, store: &Store, prior: Value, plan: Value) -> Result<Value, Diagnostics>;
  fn delete(&self, store: &Store, state: Value) -> Result<(), Diagnostics>;
  fn import_state(&self, store: &Store, id: &str) -> Result<Value, Diagnostics>;
}

/// JSON-level view of a [`DataSource`] used by the dispatcher.
pub trait ErasedDataSource: Send + Sync {
  fn type_suffix(&self) -> &'static str;
  fn schema(&self) -> Schema;
  fn read(&self, store: &Store, config: Value) -> Result<Value, Diagnostics>;
}

struct Erased<T>(T);

/// Box a typed resource behind the JSON-level interface.
pub fn erase_resource<R: Resource + 'static>(resource: R) -> Box<dyn ErasedResource> {
  Box::new(Erased(resource))
}

/// Box a typed data source behind the JSON-level interface.
pub fn erase_data_source<D: DataSource + 'static>(data_source: D) -> Box<dyn ErasedDataSource> {
  Box::new(Erased(data_source))
}

fn decode<M: DeserializeOwned>(value: Value) -> Result<M, Diagnostics> {
  serde_json::from_value(value).map_err(|e| Diagnostics::error("Invalid state", e))
}

fn encode<M: Serialize>(model: &M) -> Result<Value, Diagnostics> {
  serde_json::to_value(model).map_err(|e| Diagnostics::error("Failed to encode state", e))
}

impl<R: Resource> ErasedResource for Erased<R> {
  fn type_suffix(&self) -> &'static str {
    self.0.type_suffix()
  }

  fn schema(&self) -> Schema {
    self.0.schema()
  }

  fn create(&self, store: &Store, plan: Value) -> Result<Value, Diagnostics> {
    let state = self.0.create(store, decode(plan)?)?;
    encode(&state)
  }

  fn read(&self, store: &Store, state: Value) -> Result<Option<Value>, Diagnostics> {
    match self.0.read(store, decode(state)?)? {
      ReadOutcome::Present(model) => encode(&model).map(Some),
      ReadOutcome::Removed => Ok(None),
    }
  }

  fn update(&self, store: &Store, prior: Value, plan: Value) -> Result<Value, Diagnostics> {
    let state = self.0.update(store, decode(prior)?, decode(plan)?)?;
    encode(&state)
  }

  fn delete(&self, store: &Store, state: Value) -> Result<(), Diagnostics> {
    self.0.delete(store, decode(state)?)
  }

  fn import_state(&self, store: &Store, id: &str) -> Result<Value, Diagnostics> {
    let state = self.0.import_state(store, id)?;
    encode(&state)
  }
}

impl<D: DataSource> ErasedDataSource for Erased<D> {
  fn type_suffix(&self) -> &'static str {
    self.0.type_suffix()
  }

  fn schema(&self) -> Schema {
    self.0.schema()
  }

  fn read(&self, store: &Store, config: Value) -> Result<Value, Diagnostics> {
    let state = self.0.read(store, decode(config)?)?;
    encode(&state)
  }
}

//! Request dispatch for the JSON-lines protocol.
//!
//! The host sends one [`Request`] per line and receives one [`Response`] per
//! line. The server holds the provider and, once configured, the shared
//! store; every resource and data source call goes through it.
//!
//! # Example session
//!
//! ```text
//! > {"method":"configure_provider","config":{"base_dir":"/srv/files"}}
//! < {}
//! > {"method":"apply_resource_change","type_name":"localfile_txt","planned_state":{"name":"a.txt","data":"hi"}}
//! < {"state":{"id":"/srv/files/a.txt","name":"a.txt","location":"","data":"hi"}}
//! ```

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::store::Store;

use super::diagnostics::Diagnostics;
use super::resource::{ErasedDataSource, ErasedResource};
use super::schema::Schema;
use super::{LocalfileProvider, ProviderConfig};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Request {
  GetSchema,
  ConfigureProvider {
    #[serde(default)]
    config: ProviderConfig,
  },
  PlanResourceChange {
    type_name: String,
    #[serde(default)]
    prior_state: Option<Value>,
    #[serde(default)]
    proposed_new_state: Option<Value>,
  },
  ApplyResourceChange {
    type_name: String,
    #[serde(default)]
    prior_state: Option<Value>,
    #[serde(default)]
    planned_state: Option<Value>,
  },
  ReadResource {
    type_name: String,
    current_state: Value,
  },
  ImportResourceState {
    type_name: String,
    id: String,
  },
  ReadDataSource {
    type_name: String,
    config: Value,
  },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSchema {
  pub type_name: &'static str,
  pub version: String,
  pub provider: Schema,
  pub resources: BTreeMap<String, Schema>,
  pub data_sources: BTreeMap<String, Schema>,
}

/// Response to a single request.
///
/// A response without `state` and without error diagnostics after a read
/// means the resource no longer exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Response {
  #[serde(skip_serializing_if = "Diagnostics::is_empty")]
  pub diagnostics: Diagnostics,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub state: Option<Value>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub requires_replace: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub schema: Option<ProviderSchema>,
}

impl Response {
  fn with_state(state: Option<Value>) -> Self {
    Self {
      state,
      ..Self::default()
    }
  }

  fn from_diagnostics(diagnostics: Diagnostics) -> Self {
    Self {
      diagnostics,
      ..Self::default()
    }
  }
}

impl From<Result<Option<Value>, Diagnostics>> for Response {
  fn from(result: Result<Option<Value>, Diagnostics>) -> Self {
    match result {
      Ok(state) => Response::with_state(state),
      Err(diags) => Response::from_diagnostics(diags),
    }
  }
}

pub struct ProviderServer {
  provider: LocalfileProvider,
  resources: BTreeMap<String, Box<dyn ErasedResource>>,
  data_sources: BTreeMap<String, Box<dyn ErasedDataSource>>,
  store: Option<Arc<Store>>,
}

impl ProviderServer {
  pub fn new(provider: LocalfileProvider) -> Self {
    let resources = provider
      .resources()
      .into_iter()
      .map(|r| (provider.full_type_name(r.type_suffix()), r))
      .collect();
    let data_sources = provider
      .data_sources()
      .into_iter()
      .map(|d| (provider.full_type_name(d.type_suffix()), d))
      .collect();

    Self {
      provider,
      resources,
      data_sources,
      store: None,
    }
  }

  /// Start already configured with `store`.
  pub fn with_store(mut self, store: Arc<Store>) -> Self {
    self.store = Some(store);
    self
  }

  pub fn provider(&self) -> &LocalfileProvider {
    &self.provider
  }

  pub fn store(&self) -> Option<&Arc<Store>> {
    self.store.as_ref()
  }

  pub fn schema(&self) -> ProviderSchema {
    ProviderSchema {
      type_name: self.provider.type_name(),
      version: self.provider.version().to_string(),
      provider: self.provider.schema(),
      resources: self.resources.iter().map(|(k, r)| (k.clone(), r.schema())).collect(),
      data_sources: self.data_sources.iter().map(|(k, d)| (k.clone(), d.schema())).collect(),
    }
  }

  /// Serve requests from `reader` until EOF, writing one response line per
  /// non-blank request line. Returns the number of requests handled.
  pub fn serve<R: BufRead, W: Write>(&mut self, mut reader: R, mut writer: W) -> io::Result<usize> {
    let mut handled = 0;
    let mut buf = Vec::new();
    loop {
      buf.clear();
      if reader.read_until(b'\n', &mut buf)? == 0 {
        break;
      }

      let response = match std::str::from_utf8(&buf) {
        Ok(line) if line.trim().is_empty() => continue,
        Ok(line) => self.handle_line(line),
        Err(e) => {
          warn!(error = %e, "request line is not valid UTF-8");
          Response::from_diagnostics(Diagnostics::error("Malformed request", e))
        }
      };

      let encoded = serde_json::to_string(&response).map_err(io::Error::other)?;
      writeln!(writer, "{}", encoded)?;
      writer.flush()?;
      handled += 1;
    }

    info!(requests = handled, "protocol session ended");
    Ok(handled)
  }

  /// Decode and handle one protocol line.
  pub fn handle_line(&mut self, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
      Ok(request) => self.handle(request),
      Err(e) => {
        warn!(error = %e, "malformed request");
        Response::from_diagnostics(Diagnostics::error("Malformed request", e))
      }
    }
  }

  pub fn handle(&mut self, request: Request) -> Response {
    match request {
      Request::GetSchema => Response {
        schema: Some(self.schema()),
        ..Response::default()
      },
      Request::ConfigureProvider { config } => self.configure(&config),
      Request::PlanResourceChange {
        type_name,
        prior_state,
        proposed_new_state,
      } => self.plan(&type_name, prior_state, proposed_new_state),
      Request::ApplyResourceChange {
        type_name,
        prior_state,
        planned_state,
      } => self.apply(&type_name, prior_state, planned_state).into(),
      Request::ReadResource {
        type_name,
        current_state,
      } => self.read(&type_name, current_state).into(),
      Request::ImportResourceState { type_name, id } => self.import(&type_name, &id).into(),
      Request::ReadDataSource { type_name, config } => self.read_data_source(&type_name, config).into(),
    }
  }

  fn configure(&mut self, config: &ProviderConfig) -> Response {
    match self.provider.configure(config) {
      Ok(store) => {
        self.store = Some(store);
        Response::default()
      }
      Err(diags) => Response::from_diagnostics(diags),
    }
  }

  fn configured_store(&self) -> Result<Arc<Store>, Diagnostics> {
    self.store.clone().ok_or_else(|| {
      Diagnostics::error(
        "Provider not configured",
        "The localfile provider must be configured with a base_dir before resources or data sources can be used.",
      )
    })
  }

  fn resource(&self, type_name: &str) -> Result<&dyn ErasedResource, Diagnostics> {
    self
      .resources
      .get(type_name)
      .map(|r| r.as_ref())
      .ok_or_else(|| Diagnostics::error("Unknown resource type", format!("{} is not a resource of this provider", type_name)))
  }

  fn data_source(&self, type_name: &str) -> Result<&dyn ErasedDataSource, Diagnostics> {
    self.data_sources.get(type_name).map(|d| d.as_ref()).ok_or_else(|| {
      Diagnostics::error(
        "Unknown data source type",
        format!("{} is not a data source of this provider", type_name),
      )
    })
  }

  /// Plan a change: fill defaults, carry stable computed values from the
  /// prior state and report replace-forcing differences.
  fn plan(&self, type_name: &str, prior: Option<Value>, proposed: Option<Value>) -> Response {
    let resource = match self.resource(type_name) {
      Ok(resource) => resource,
      Err(diags) => return Response::from_diagnostics(diags),
    };
    let schema = resource.schema();

    let Some(mut planned) = proposed else {
      debug!(type_name = %type_name, "planned destroy");
      return Response::default();
    };
    schema.apply_defaults(&mut planned);

    let requires_replace = match &prior {
      Some(prior) => schema.requires_replace(prior, &planned),
      None => Vec::new(),
    };

    for attr in schema.attributes.iter().filter(|a| a.computed && !a.optional && !a.required) {
      let carried = match &prior {
        Some(prior) if attr.use_state_for_unknown && requires_replace.is_empty() => {
          prior.get(attr.name).cloned().unwrap_or(Value::Null)
        }
        _ => Value::Null,
      };
      if let Some(object) = planned.as_object_mut() {
        object.insert(attr.name.to_string(), carried);
      }
    }

    debug!(type_name = %type_name, replace = ?requires_replace, "planned change");
    Response {
      state: Some(planned),
      requires_replace,
      ..Response::default()
    }
  }

  fn apply(&self, type_name: &str, prior: Option<Value>, planned: Option<Value>) -> Result<Option<Value>, Diagnostics> {
    let resource = self.resource(type_name)?;
    let store = self.configured_store()?;
    let schema = resource.schema();

    match (prior, planned) {
      (None, Some(mut planned)) => {
        schema.apply_defaults(&mut planned);
        let missing = schema.validate_required(&planned);
        if missing.has_error() {
          return Err(missing);
        }
        resource.create(&store, planned).map(Some)
      }
      (Some(prior), Some(mut planned)) => {
        schema.apply_defaults(&mut planned);
        let missing = schema.validate_required(&planned);
        if missing.has_error() {
          return Err(missing);
        }
        resource.update(&store, prior, planned).map(Some)
      }
      (Some(prior), None) => resource.delete(&store, prior).map(|()| None),
      (None, None) => Err(Diagnostics::error(
        "Invalid apply request",
        "apply_resource_change needs a prior state, a planned state, or both",
      )),
    }
  }

  fn read(&self, type_name: &str, state: Value) -> Result<Option<Value>, Diagnostics> {
    let resource = self.resource(type_name)?;
    let store = self.configured_store()?;
    resource.read(&store, state)
  }

  fn import(&self, type_name: &str, id: &str) -> Result<Option<Value>, Diagnostics> {
    let resource = self.resource(type_name)?;
    let store = self.configured_store()?;
    resource.import_state(&store, id).map(Some)
  }

  fn read_data_source(&self, type_name: &str, config: Value) -> Result<Option<Value>, Diagnostics> {
    let data_source = self.data_source(type_name)?;
    let store = self.configured_store()?;
    data_source.read(&store, config).map(Some)
  }
}

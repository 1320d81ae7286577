//! Shared helpers for library integration tests.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

use localfile_lib::provider::server::{ProviderServer, Request, Response};
use localfile_lib::provider::{LocalfileProvider, ProviderConfig};
use localfile_lib::store::Store;

/// Temporary base directory with a store and a configured server over it.
pub struct TestEnv {
  pub temp: TempDir,
  pub store: Store,
  pub server: ProviderServer,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let store = Store::new(temp.path()).unwrap();
    let mut server = ProviderServer::new(LocalfileProvider::new("test"));
    let response = server.handle(Request::ConfigureProvider {
      config: ProviderConfig::with_base_dir(temp.path().to_string_lossy()),
    });
    assert_no_errors(&response);
    Self { temp, store, server }
  }

  pub fn base(&self) -> &Path {
    self.store.base_dir()
  }

  /// Path of a file under the base directory.
  pub fn path(&self, relative: &str) -> PathBuf {
    self.base().join(relative)
  }

  pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
    let path = self.path(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  /// Create a resource through the apply path and return its new state.
  pub fn create(&mut self, type_name: &str, planned: Value) -> Value {
    let response = self.server.handle(Request::ApplyResourceChange {
      type_name: type_name.to_string(),
      prior_state: None,
      planned_state: Some(planned),
    });
    assert_no_errors(&response);
    response.state.unwrap()
  }

  pub fn read(&mut self, type_name: &str, state: Value) -> Response {
    self.server.handle(Request::ReadResource {
      type_name: type_name.to_string(),
      current_state: state,
    })
  }

  pub fn destroy(&mut self, type_name: &str, state: Value) -> Response {
    self.server.handle(Request::ApplyResourceChange {
      type_name: type_name.to_string(),
      prior_state: Some(state),
      planned_state: None,
    })
  }
}

pub fn assert_no_errors(response: &Response) {
  assert!(
    !response.diagnostics.has_error(),
    "unexpected diagnostics: {}",
    response.diagnostics
  );
}

/// Summary of the first diagnostic in a response.
pub fn first_summary(response: &Response) -> String {
  response
    .diagnostics
    .iter()
    .next()
    .map(|d| d.summary.clone())
    .unwrap_or_default()
}

pub fn txt(name: &str, location: &str, data: &str) -> Value {
  json!({ "name": name, "location": location, "data": data })
}

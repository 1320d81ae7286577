//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use tempfile::TempDir;

/// Isolated test environment.
///
/// Each test gets its own temporary base directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Canonical base directory, matching what the provider reports in ids.
  pub fn base_dir(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  pub fn path(&self, relative: &str) -> PathBuf {
    self.base_dir().join(relative)
  }

  pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
    let path = self.path(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  /// Command preconfigured with `--base-dir`.
  pub fn cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("terraform-provider-localfile");
    cmd.arg("--base-dir").arg(self.temp.path());
    cmd
  }

  /// Send `requests` one per line and return the decoded responses.
  pub fn session(&self, requests: &[Value]) -> Vec<Value> {
    session_with(self.cmd(), requests)
  }
}

/// Run a serve session with an arbitrary command.
pub fn session_with(mut cmd: Command, requests: &[Value]) -> Vec<Value> {
  let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();
  let output = cmd.arg("serve").write_stdin(input).assert().success().get_output().stdout.clone();

  String::from_utf8(output)
    .unwrap()
    .lines()
    .map(|line| serde_json::from_str(line).unwrap())
    .collect()
}

pub fn path_str(path: &Path) -> &str {
  path.to_str().unwrap()
}

//! Tests for the `serve` command's JSON-lines protocol.

use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::json;

use super::common::{TestEnv, path_str, session_with};

#[test]
fn txt_lifecycle_over_stdio() {
  let env = TestEnv::new();
  let file = env.path("notes/todo.txt");

  let responses = env.session(&[
    json!({
      "method": "apply_resource_change",
      "type_name": "localfile_txt",
      "planned_state": { "name": "todo.txt", "location": "notes", "data": "buy milk" }
    }),
    json!({
      "method": "read_data_source",
      "type_name": "localfile_txt",
      "config": { "name": "todo.txt", "location": "notes" }
    }),
  ]);

  assert_eq!(responses.len(), 2);
  assert_eq!(responses[0]["state"]["id"], path_str(&file));
  assert_eq!(responses[1]["state"]["data"], "buy milk");
  assert_eq!(std::fs::read_to_string(&file).unwrap(), "buy milk");
}

#[test]
fn destroy_and_refresh_over_stdio() {
  let env = TestEnv::new();
  let file = env.write_file("old.txt", "stale");
  let state = json!({ "id": path_str(&file), "name": "old.txt", "location": "", "data": "stale" });

  let responses = env.session(&[
    json!({
      "method": "apply_resource_change",
      "type_name": "localfile_txt",
      "prior_state": state
    }),
    json!({
      "method": "read_resource",
      "type_name": "localfile_txt",
      "current_state": state
    }),
  ]);

  assert_eq!(responses[0], json!({}));
  assert_eq!(responses[1], json!({}));
  assert!(!file.exists());
}

#[test]
fn traversal_is_reported_as_diagnostic() {
  let env = TestEnv::new();
  let responses = env.session(&[json!({
    "method": "apply_resource_change",
    "type_name": "localfile_txt",
    "planned_state": { "name": "passwd", "location": "../../../../etc", "data": "x" }
  })]);

  let diag = &responses[0]["diagnostics"][0];
  assert_eq!(diag["severity"], "error");
  assert_eq!(diag["summary"], "Failed to determine file path");
  assert!(responses[0].get("state").is_none());
}

#[test]
fn zip_from_text_file_over_stdio() {
  let env = TestEnv::new();
  let src = env.write_file("src/data.txt", "payload");

  let responses = env.session(&[json!({
    "method": "apply_resource_change",
    "type_name": "localfile_onefile_zip",
    "planned_state": { "src_data_file": path_str(&src), "name": "data.zip", "location": "dist" }
  })]);

  assert_eq!(responses[0]["state"]["id"], path_str(&env.path("dist/data.zip")));
  let archive = zip_entries(&env.path("dist/data.zip"));
  assert_eq!(archive, vec!["data.txt".to_string()]);
}

#[test]
fn configure_request_enables_unconfigured_server() {
  let env = TestEnv::new();
  env.write_file("hello.txt", "hi");

  let responses = session_with(
    cargo_bin_cmd!("terraform-provider-localfile"),
    &[
      json!({ "method": "read_data_source", "type_name": "localfile_txt", "config": { "name": "hello.txt" } }),
      json!({ "method": "configure_provider", "config": { "base_dir": path_str(&env.base_dir()) } }),
      json!({ "method": "read_data_source", "type_name": "localfile_txt", "config": { "name": "hello.txt" } }),
    ],
  );

  assert_eq!(responses[0]["diagnostics"][0]["summary"], "Provider not configured");
  assert_eq!(responses[1], json!({}));
  assert_eq!(responses[2]["state"]["data"], "hi");
}

#[test]
fn malformed_lines_do_not_stop_the_session() {
  let env = TestEnv::new();
  let output = env
    .cmd()
    .arg("serve")
    .write_stdin("not json\n{\"method\":\"get_schema\"}\n")
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let lines: Vec<serde_json::Value> = String::from_utf8(output)
    .unwrap()
    .lines()
    .map(|l| serde_json::from_str(l).unwrap())
    .collect();
  assert_eq!(lines[0]["diagnostics"][0]["summary"], "Malformed request");
  assert!(lines[1]["schema"]["resources"].is_object());
}

fn zip_entries(path: &std::path::Path) -> Vec<String> {
  let file = std::fs::File::open(path).unwrap();
  let archive = zip::ZipArchive::new(file).unwrap();
  archive.file_names().map(str::to_string).collect()
}

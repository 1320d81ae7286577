//! End-to-end provider tests through the request dispatcher.

use std::fs;

use serde_json::json;

use localfile_lib::provider::server::Request;

use super::common::{TestEnv, assert_no_errors, first_summary, txt};

mod txt_resource {
  use super::*;

  #[test]
  fn create_refresh_update_destroy() {
    let mut env = TestEnv::new();
    let state = env.create("localfile_txt", txt("app.conf", "etc", "port=80\n"));
    let path = env.path("etc/app.conf");
    assert_eq!(state["id"], path.to_str().unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), "port=80\n");

    fs::write(&path, "port=8080\n").unwrap();
    let refreshed = env.read("localfile_txt", state).state.unwrap();
    assert_eq!(refreshed["data"], "port=8080\n");

    let updated = env.server.handle(Request::ApplyResourceChange {
      type_name: "localfile_txt".to_string(),
      prior_state: Some(refreshed),
      planned_state: Some(txt("app.conf", "etc", "port=443\n")),
    });
    assert_no_errors(&updated);
    assert_eq!(fs::read_to_string(&path).unwrap(), "port=443\n");

    assert_no_errors(&env.destroy("localfile_txt", updated.state.unwrap()));
    assert!(!path.exists());
  }

  #[test]
  fn refresh_after_external_delete_drops_state() {
    let mut env = TestEnv::new();
    let state = env.create("localfile_txt", txt("gone.txt", "", "x"));
    fs::remove_file(env.path("gone.txt")).unwrap();

    let response = env.read("localfile_txt", state);
    assert_no_errors(&response);
    assert!(response.state.is_none());
  }

  #[test]
  fn traversal_attempt_fails_without_writing() {
    let mut env = TestEnv::new();
    let response = env.server.handle(Request::ApplyResourceChange {
      type_name: "localfile_txt".to_string(),
      prior_state: None,
      planned_state: Some(txt("escape.txt", "../..", "x")),
    });
    assert_eq!(first_summary(&response), "Failed to determine file path");
    assert!(response.state.is_none());
    assert!(!env.base().join("../../escape.txt").exists());
  }

  #[test]
  fn import_then_refresh_reads_content() {
    let mut env = TestEnv::new();
    let path = env.write_file("logs/today.log", "line\n");

    let imported = env.server.handle(Request::ImportResourceState {
      type_name: "localfile_txt".to_string(),
      id: path.to_string_lossy().into_owned(),
    });
    assert_no_errors(&imported);
    let state = imported.state.unwrap();
    assert_eq!(state["name"], "today.log");
    assert_eq!(state["location"], "logs");

    let refreshed = env.read("localfile_txt", state).state.unwrap();
    assert_eq!(refreshed["data"], "line\n");
  }

  #[test]
  fn import_outside_base_is_rejected() {
    let mut env = TestEnv::new();
    let outside = env.base().join("..").join("elsewhere.txt");

    let response = env.server.handle(Request::ImportResourceState {
      type_name: "localfile_txt".to_string(),
      id: outside.to_string_lossy().into_owned(),
    });
    assert_eq!(first_summary(&response), "Invalid import ID");
    assert!(response.state.is_none());
  }
}

mod onefile_zip_resource {
  use super::*;

  #[test]
  fn zips_a_managed_text_file() {
    let mut env = TestEnv::new();
    let file = env.create("localfile_txt", txt("payload.txt", "in", "zip me"));

    let zip_state = env.create(
      "localfile_onefile_zip",
      json!({ "src_data_file": file["id"], "name": "payload.zip", "location": "out" }),
    );
    let zip_path = env.path("out/payload.zip");
    assert_eq!(zip_state["id"], zip_path.to_str().unwrap());

    let archive = zip::ZipArchive::new(fs::File::open(&zip_path).unwrap()).unwrap();
    assert_eq!(archive.file_names().collect::<Vec<_>>(), vec!["payload.txt"]);

    assert_no_errors(&env.destroy("localfile_onefile_zip", zip_state));
    assert!(!zip_path.exists());
    assert!(env.path("in/payload.txt").exists());
  }

  #[test]
  fn changing_source_plans_replacement() {
    let mut env = TestEnv::new();
    let src = env.write_file("a.txt", "a");
    let state = env.create(
      "localfile_onefile_zip",
      json!({ "src_data_file": src.to_string_lossy(), "name": "a.zip" }),
    );

    let plan = env.server.handle(Request::PlanResourceChange {
      type_name: "localfile_onefile_zip".to_string(),
      prior_state: Some(state),
      proposed_new_state: Some(json!({ "src_data_file": "/elsewhere/b.txt", "name": "a.zip" })),
    });
    assert_eq!(plan.requires_replace, vec!["src_data_file".to_string()]);
  }

  #[test]
  fn import_then_refresh_keeps_archive() {
    let mut env = TestEnv::new();
    let src = env.write_file("a.txt", "a");
    env.create(
      "localfile_onefile_zip",
      json!({ "src_data_file": src.to_string_lossy(), "name": "a.zip", "location": "dist" }),
    );
    let zip_path = env.path("dist/a.zip");

    let imported = env.server.handle(Request::ImportResourceState {
      type_name: "localfile_onefile_zip".to_string(),
      id: zip_path.to_string_lossy().into_owned(),
    });
    assert_no_errors(&imported);
    let state = imported.state.unwrap();
    assert_eq!(state["id"], zip_path.to_str().unwrap());
    assert_eq!(state["name"], "a.zip");
    assert_eq!(state["location"], "dist");
    assert!(state["src_data_file"].is_null());

    let refreshed = env.read("localfile_onefile_zip", state.clone());
    assert_no_errors(&refreshed);
    assert_eq!(refreshed.state.unwrap(), state);
  }

  #[test]
  fn missing_source_is_an_error() {
    let mut env = TestEnv::new();
    let missing = env.path("missing.txt");
    let response = env.server.handle(Request::ApplyResourceChange {
      type_name: "localfile_onefile_zip".to_string(),
      prior_state: None,
      planned_state: Some(json!({ "src_data_file": missing.to_string_lossy(), "name": "a.zip" })),
    });
    assert_eq!(first_summary(&response), "Error creating zip archive");
  }
}

mod txt_data_source {
  use super::*;

  #[test]
  fn reads_existing_file() {
    let mut env = TestEnv::new();
    env.write_file("cfg/settings.ini", "[main]\n");

    let response = env.server.handle(Request::ReadDataSource {
      type_name: "localfile_txt".to_string(),
      config: json!({ "name": "settings.ini", "location": "cfg" }),
    });
    assert_no_errors(&response);
    let state = response.state.unwrap();
    assert_eq!(state["data"], "[main]\n");
    assert_eq!(state["id"], env.path("cfg/settings.ini").to_str().unwrap());
  }

  #[test]
  fn missing_file_is_an_error() {
    let mut env = TestEnv::new();
    let response = env.server.handle(Request::ReadDataSource {
      type_name: "localfile_txt".to_string(),
      config: json!({ "name": "absent.txt" }),
    });
    assert_eq!(first_summary(&response), "Error reading file");
  }
}

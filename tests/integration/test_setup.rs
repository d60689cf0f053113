//! Tests for the setup command

use crate::helpers::{TestProject, run_relpack_ok};
use std::fs;

#[test]
fn test_setup_writes_project_config() {
  let project = TestProject::new();
  fs::remove_file(project.config_path()).unwrap();

  run_relpack_ok(&project, &["setup", "--project-config"]);

  let config = project.read_file("relpack.json");
  assert!(config.contains("archive_kinds"));
  assert!(config.contains("zip"));
}

#[test]
fn test_setup_writes_app_config_under_home() {
  let project = TestProject::new();
  run_relpack_ok(&project, &["setup", "--app-config"]);
  assert!(project.home.join(".relpack/config.json").exists());
}

#[test]
fn test_setup_merges_gitignore_files() {
  let project = TestProject::new();
  fs::write(project.path.join(".gitignore"), "custom/\n").unwrap();

  run_relpack_ok(&project, &["setup", "--gitignore"]);

  let root_ignore = project.read_file(".gitignore");
  assert!(root_ignore.contains("custom/"));
  assert!(root_ignore.contains("**/bin/"));
  assert!(root_ignore.contains("**/obj/"));

  // src exists in the fixture, so it gets its own exclusions.
  let src_ignore = project.read_file("src/.gitignore");
  assert!(src_ignore.contains(".vs/"));
  assert!(src_ignore.contains("packages/*/"));
}

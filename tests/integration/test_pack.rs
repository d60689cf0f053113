//! End-to-end tests for the pack command

use crate::helpers::{TestProject, run_relpack, run_relpack_ok, zip_entries};

fn pack_args(project: &TestProject, version: &str, build_tool: &str) -> Vec<String> {
  vec![
    "pack".to_string(),
    version.to_string(),
    "-f".to_string(),
    project.config_path().display().to_string(),
    "--build-tool".to_string(),
    build_tool.to_string(),
  ]
}

#[test]
fn test_pack_produces_src_and_bin_archives() {
  let project = TestProject::new();
  let args = pack_args(&project, "1.2.3", "true");
  let args: Vec<&str> = args.iter().map(String::as_str).collect();
  run_relpack_ok(&project, &args);

  assert!(project.file_exists("release/src-1.2.3.zip"));
  assert!(project.file_exists("release/bin-1.2.3.zip"));
  // No compiled help files in the tree, so no help archive.
  assert!(!project.file_exists("release/help-1.2.3.zip"));
}

#[test]
fn test_src_archive_contains_stamped_sources() {
  let project = TestProject::new();
  let args = pack_args(&project, "1.2.3", "true");
  let args: Vec<&str> = args.iter().map(String::as_str).collect();
  run_relpack_ok(&project, &args);

  let entries = zip_entries(&project.path.join("release/src-1.2.3.zip"));
  let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
  assert!(names.contains(&"src/Lib/Lib.csproj"));
  assert!(names.contains(&"src/Lib/Code.cs"));
  assert!(names.contains(&"src/Samples/Demo/Demo.csproj"));
  assert!(names.contains(&"src/All.sln"));
  assert!(names.contains(&"keys/app.snk"));
  assert!(names.contains(&"README.md"));

  // The archived descriptor carries the stamped version fields.
  let (_, lib) = entries.iter().find(|(n, _)| n == "src/Lib/Lib.csproj").unwrap();
  assert!(lib.contains("<Version>1.2.3</Version>"));
  assert!(lib.contains("<AssemblyVersion>1.2</AssemblyVersion>"));
  assert!(lib.contains("<FileVersion>1.2.3.0</FileVersion>"));

  // The templated readme was expanded.
  let (_, readme) = entries.iter().find(|(n, _)| n == "README.md").unwrap();
  assert!(readme.contains("Release 1.2.3 of the demo library."));
}

#[test]
fn test_bin_archive_rewrites_sample_references() {
  let project = TestProject::new();
  let args = pack_args(&project, "1.2.3", "true");
  let args: Vec<&str> = args.iter().map(String::as_str).collect();
  run_relpack_ok(&project, &args);

  let entries = zip_entries(&project.path.join("release/bin-1.2.3.zip"));
  let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
  assert!(names.contains(&"net6.0/Lib.dll"));
  assert!(names.contains(&"net7.0/Lib.dll"));
  assert!(names.contains(&"samples/Samples/Demo/Program.cs"));

  let (_, demo) = entries.iter().find(|(n, _)| n == "samples/Samples/Demo/Demo.csproj").unwrap();
  // The project reference became per-framework binary references.
  assert!(!demo.contains("ProjectReference"));
  assert!(demo.contains("../../../net6.0/Lib.dll"));
  assert!(demo.contains("../../../net7.0/Lib.dll"));
  // Conditioned per target framework (attribute quoting varies on write).
  assert!(demo.contains("Condition="));
  assert!(demo.contains("$(TargetFramework)"));
}

#[test]
fn test_pack_restores_descriptors_and_cleans_temp() {
  let project = TestProject::new();
  let original_lib = project.read_file("src/Lib/Lib.csproj");
  let original_demo = project.read_file("src/Samples/Demo/Demo.csproj");

  let args = pack_args(&project, "1.2.3", "true");
  let args: Vec<&str> = args.iter().map(String::as_str).collect();
  run_relpack_ok(&project, &args);

  assert_eq!(project.read_file("src/Lib/Lib.csproj"), original_lib);
  assert_eq!(project.read_file("src/Samples/Demo/Demo.csproj"), original_demo);
  assert!(!project.file_exists("src/Lib/Lib.csproj.bak"));
  assert!(!project.file_exists("src/Samples/Demo/Demo.csproj.bak"));
  assert!(!project.file_exists("tmp"));
}

#[test]
fn test_failing_build_aborts_but_restores() {
  let project = TestProject::new();
  let original_lib = project.read_file("src/Lib/Lib.csproj");

  let args = pack_args(&project, "1.2.3", "false");
  let args: Vec<&str> = args.iter().map(String::as_str).collect();
  let output = run_relpack(&project, &args);

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(3));
  assert!(!project.file_exists("release/src-1.2.3.zip"));
  // Teardown ran: the in-place rewrite was rolled back.
  assert_eq!(project.read_file("src/Lib/Lib.csproj"), original_lib);
  assert!(!project.file_exists("src/Lib/Lib.csproj.bak"));
}

#[test]
fn test_invalid_version_is_a_user_error() {
  let project = TestProject::new();
  let output = run_relpack(&project, &["pack", "not-a-version", "--build-tool", "true"]);
  assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_unconfigured_build_tool_is_a_user_error() {
  let project = TestProject::new();
  let output = run_relpack(&project, &["pack", "1.2.3"]);
  assert_eq!(output.status.code(), Some(1));
}

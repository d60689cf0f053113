//! Tests for the inspect command

use crate::helpers::{TestProject, run_relpack_ok};

#[test]
fn test_inspect_lists_modules_and_solutions() {
  let project = TestProject::new();
  let output = run_relpack_ok(&project, &["inspect", "1.2.3"]);
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Modules (2):"));
  assert!(stdout.contains("/Lib/Lib.csproj"));
  assert!(stdout.contains("/Samples/Demo/Demo.csproj"));
  assert!(stdout.contains("net6.0, net7.0"));
  assert!(stdout.contains("Solutions (1):"));
  assert!(stdout.contains("All.sln (1 project(s))"));
}

#[test]
fn test_inspect_does_not_touch_the_tree() {
  let project = TestProject::new();
  let before = project.read_file("src/Lib/Lib.csproj");
  run_relpack_ok(&project, &["inspect", "1.2.3"]);

  assert_eq!(project.read_file("src/Lib/Lib.csproj"), before);
  assert!(!project.file_exists("release"));
  assert!(!project.file_exists("tmp"));
}

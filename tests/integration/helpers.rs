//! Test helpers for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const LIB_CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFrameworks>net6.0;net7.0</TargetFrameworks>
    <Description>Demo library</Description>
  </PropertyGroup>
</Project>
"#;

pub const DEMO_CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <OutputType>Exe</OutputType>
    <TargetFrameworks>net6.0;net7.0</TargetFrameworks>
  </PropertyGroup>
  <ItemGroup>
    <ProjectReference Include="../../Lib/Lib.csproj" />
  </ItemGroup>
</Project>
"#;

pub const SOLUTION: &str = r#"Microsoft Visual Studio Solution File, Format Version 12.00
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "Lib", "Lib\Lib.csproj", "{01D2D040-A2AF-42A1-9821-D1C6D77A3309}"
EndProject
"#;

/// A synthetic release tree: one library, one sample, notes, keys, binaries
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
  /// Stand-in HOME so the user's real app config stays out of the run
  pub home: PathBuf,
}

impl TestProject {
  pub fn new() -> Self {
    let root = TempDir::new().expect("create temp dir");
    let path = root.path().join("project");
    let home = root.path().join("home");
    fs::create_dir_all(&home).expect("create home");

    write(&path.join("relpack.json"), r#"{ "archive_kinds": ["zip"] }"#);
    write(&path.join("README.md"), "Release $VERSION$ of the demo library.\n");
    write(&path.join("src/All.sln"), SOLUTION);
    write(&path.join("src/Lib/Lib.csproj"), LIB_CSPROJ);
    write(&path.join("src/Lib/Code.cs"), "// code\n");
    write(&path.join("src/Samples/Demo/Demo.csproj"), DEMO_CSPROJ);
    write(&path.join("src/Samples/Demo/Program.cs"), "// sample\n");
    write(&path.join("keys/app.snk"), "not a real key");
    // What the (faked) external build would have produced.
    write(&path.join("bin/Release/net6.0/Lib.dll"), "net6.0 binary");
    write(&path.join("bin/Release/net7.0/Lib.dll"), "net7.0 binary");

    Self { _root: root, path, home }
  }

  pub fn config_path(&self) -> PathBuf {
    self.path.join("relpack.json")
  }

  pub fn read_file(&self, relative: &str) -> String {
    fs::read_to_string(self.path.join(relative)).expect("read file")
  }

  pub fn file_exists(&self, relative: &str) -> bool {
    self.path.join(relative).exists()
  }
}

pub fn write(path: &Path, contents: &str) {
  fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
  fs::write(path, contents).expect("write file");
}

/// Run the relpack binary; does not assert on the exit status
pub fn run_relpack(project: &TestProject, args: &[&str]) -> Output {
  let binary = env!("CARGO_BIN_EXE_relpack");
  Command::new(binary)
    .current_dir(&project.path)
    .env("HOME", &project.home)
    .args(args)
    .output()
    .expect("run relpack")
}

/// Run the relpack binary and require success
pub fn run_relpack_ok(project: &TestProject, args: &[&str]) -> Output {
  let output = run_relpack(project, args);
  assert!(
    output.status.success(),
    "relpack {:?} failed\nstdout: {}\nstderr: {}",
    args,
    String::from_utf8_lossy(&output.stdout),
    String::from_utf8_lossy(&output.stderr)
  );
  output
}

/// Entry names and contents of a zip archive, in archive order
pub fn zip_entries(path: &Path) -> Vec<(String, String)> {
  let file = fs::File::open(path).expect("open archive");
  let mut archive = zip::ZipArchive::new(file).expect("read archive");
  let mut entries = Vec::new();
  for i in 0..archive.len() {
    let mut entry = archive.by_index(i).expect("entry");
    let name = entry.name().to_string();
    let mut contents = String::new();
    use std::io::Read;
    entry.read_to_string(&mut contents).unwrap_or_default();
    entries.push((name, contents));
  }
  entries
}

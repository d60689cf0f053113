//! Project descriptor analysis
//!
//! Extracts the assembly name and target-framework set from a descriptor
//! document and produces the immutable [`ProjectOutputInfo`] snapshot the
//! reference resolver works with.

use crate::core::diagnostics::Diagnostics;
use crate::core::version::ReleaseVersion;
use crate::msbuild;
use crate::scan::path as scan_path;
use crate::utils;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use xmltree::Element;

static TARGET_FRAMEWORK_VERSION_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^v[0-9]+(?:\.[0-9]+)*$").expect("framework version pattern"));

/// Immutable analysis snapshot of a buildable project
///
/// Shared by value into the sample-resolution lookup; carries no reference
/// back to the file it came from.
#[derive(Debug, Clone)]
pub struct ProjectOutputInfo {
  pub identity: String,
  pub project_name: String,
  /// Absent when several `AssemblyName` definitions made the value ambiguous
  pub assembly_name: Option<String>,
  pub target_frameworks: Vec<String>,
}

/// Mutable analysis state attached to a descriptor file
#[derive(Debug, Default)]
pub struct ProjectMeta {
  /// Subdirectory path of the owning module, from the scan root
  pub module_dirs: Vec<String>,
  pub assembly_name: Option<String>,
  pub target_frameworks: Vec<String>,
}

impl ProjectMeta {
  pub fn new(module_dirs: Vec<String>) -> Self {
    Self {
      module_dirs,
      ..Self::default()
    }
  }

  /// The full subdirectory chain: module path plus the file's own path
  pub fn all_sub_directories(&self, file_sub_directories: &[String]) -> Vec<String> {
    let mut dirs = self.module_dirs.clone();
    dirs.extend_from_slice(file_sub_directories);
    dirs
  }

  /// The project identity of this descriptor
  pub fn project_identity(&self, file_sub_directories: &[String], file_name: &str) -> String {
    let mut segments = self.all_sub_directories(file_sub_directories);
    segments.push(file_name.to_string());
    scan_path::identity(&segments)
  }

  /// Read assembly name and target frameworks from a parsed descriptor
  pub fn analyze(&mut self, root: &Element, file_name: &str, identity: &str, diagnostics: &mut Diagnostics) {
    self.assembly_name = read_assembly_name(root, file_name, identity, diagnostics);
    self.target_frameworks = read_target_frameworks(root, diagnostics);
  }

  /// Snapshot the analysis results
  pub fn create_output_info(&self, file_sub_directories: &[String], file_name: &str) -> ProjectOutputInfo {
    ProjectOutputInfo {
      identity: self.project_identity(file_sub_directories, file_name),
      project_name: utils::file_stem_of(file_name).to_string(),
      assembly_name: self.assembly_name.clone(),
      target_frameworks: self.target_frameworks.clone(),
    }
  }
}

/// Stamp the release version fields into a descriptor document
pub fn stamp_versions(root: &mut Element, version: &ReleaseVersion) {
  msbuild::write_metadata_element(root, "Version", &version.to_string());
  msbuild::write_metadata_element(root, "AssemblyVersion", &version.assembly_version());
  msbuild::write_metadata_element(root, "FileVersion", &version.file_version());
}

fn read_assembly_name(
  root: &Element,
  file_name: &str,
  identity: &str,
  diagnostics: &mut Diagnostics,
) -> Option<String> {
  let values = msbuild::property_values(root, "AssemblyName");
  match values.len() {
    0 => Some(utils::file_stem_of(file_name).to_string()),
    1 => Some(values.into_iter().next().unwrap_or_default().trim().to_string()),
    n => {
      diagnostics.problem(format!(
        "Several output names ({}) found for the assembly from project {}.",
        n, identity
      ));
      None
    }
  }
}

fn read_target_frameworks(root: &Element, diagnostics: &mut Diagnostics) -> Vec<String> {
  let mut result = BTreeSet::new();

  for value in msbuild::property_values(root, "TargetFramework") {
    let value = value.trim();
    if !value.is_empty() {
      result.insert(value.to_string());
    }
  }

  for value in msbuild::property_values(root, "TargetFrameworks") {
    for target in value.split(';') {
      let target = target.trim();
      if !target.is_empty() {
        result.insert(target.to_string());
      }
    }
  }

  if result.is_empty() {
    read_legacy_target_frameworks(root, &mut result, diagnostics);
  }

  result.into_iter().collect()
}

/// Legacy descriptors declare a framework version (plus optional profile in
/// the same property group) instead of a framework id
fn read_legacy_target_frameworks(root: &Element, result: &mut BTreeSet<String>, diagnostics: &mut Diagnostics) {
  for group in msbuild::children_named(root, "PropertyGroup") {
    for version_el in msbuild::children_named(group, "TargetFrameworkVersion") {
      let raw = msbuild::text_of(version_el);
      let raw = raw.trim();
      let Some(target) = framework_version_to_id(raw) else {
        diagnostics.problem(format!("Unknown target framework version: {}", raw));
        continue;
      };

      let profiles: Vec<String> = msbuild::children_named(group, "TargetFrameworkProfile")
        .map(|p| msbuild::text_of(p).trim().to_string())
        .collect();
      if profiles.is_empty() {
        result.insert(target);
        continue;
      }
      for profile in profiles {
        match profile.as_str() {
          "Client" => {
            result.insert(format!("{}-client", target));
          }
          other => {
            diagnostics.problem(format!("Unknown target framework profile: {}", other));
          }
        }
      }
    }
  }
}

fn framework_version_to_id(version: &str) -> Option<String> {
  if TARGET_FRAMEWORK_VERSION_RE.is_match(version) {
    Some(format!("net{}", version[1..].replace('.', "")))
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::diagnostics::MessageKind;

  fn parse(xml: &str) -> Element {
    Element::parse(xml.as_bytes()).unwrap()
  }

  fn analyzed(xml: &str) -> (ProjectMeta, Diagnostics) {
    let mut meta = ProjectMeta::new(vec!["Lib".to_string()]);
    let mut diagnostics = Diagnostics::silent();
    meta.analyze(&parse(xml), "Lib.csproj", "/Lib/Lib.csproj", &mut diagnostics);
    (meta, diagnostics)
  }

  #[test]
  fn test_assembly_name_defaults_to_file_stem() {
    let (meta, _) = analyzed("<Project><PropertyGroup/></Project>");
    assert_eq!(meta.assembly_name.as_deref(), Some("Lib"));
  }

  #[test]
  fn test_assembly_name_single_definition() {
    let (meta, _) = analyzed("<Project><PropertyGroup><AssemblyName>Custom</AssemblyName></PropertyGroup></Project>");
    assert_eq!(meta.assembly_name.as_deref(), Some("Custom"));
  }

  #[test]
  fn test_assembly_name_ambiguity_is_soft() {
    let (meta, diagnostics) = analyzed(
      r#"<Project>
        <PropertyGroup><AssemblyName>A</AssemblyName></PropertyGroup>
        <PropertyGroup><AssemblyName>B</AssemblyName></PropertyGroup>
      </Project>"#,
    );
    assert_eq!(meta.assembly_name, None);
    assert_eq!(diagnostics.count(MessageKind::Problem), 1);
  }

  #[test]
  fn test_target_frameworks_modern_fields() {
    let (meta, _) = analyzed(
      r#"<Project><PropertyGroup>
        <TargetFrameworks>net6.0; net7.0</TargetFrameworks>
        <TargetFramework>net6.0</TargetFramework>
      </PropertyGroup></Project>"#,
    );
    assert_eq!(meta.target_frameworks, vec!["net6.0", "net7.0"]);
  }

  #[test]
  fn test_target_frameworks_legacy_version() {
    let (meta, _) = analyzed(
      "<Project><PropertyGroup><TargetFrameworkVersion>v4.6.1</TargetFrameworkVersion></PropertyGroup></Project>",
    );
    assert_eq!(meta.target_frameworks, vec!["net461"]);
  }

  #[test]
  fn test_target_frameworks_legacy_client_profile() {
    let (meta, _) = analyzed(
      r#"<Project><PropertyGroup>
        <TargetFrameworkVersion>v4.0</TargetFrameworkVersion>
        <TargetFrameworkProfile>Client</TargetFrameworkProfile>
      </PropertyGroup></Project>"#,
    );
    assert_eq!(meta.target_frameworks, vec!["net40-client"]);
  }

  #[test]
  fn test_target_frameworks_unknown_legacy_version() {
    let (meta, diagnostics) = analyzed(
      "<Project><PropertyGroup><TargetFrameworkVersion>banana</TargetFrameworkVersion></PropertyGroup></Project>",
    );
    assert!(meta.target_frameworks.is_empty());
    assert_eq!(diagnostics.count(MessageKind::Problem), 1);
  }

  #[test]
  fn test_legacy_ignored_when_modern_present() {
    let (meta, _) = analyzed(
      r#"<Project><PropertyGroup>
        <TargetFramework>net6.0</TargetFramework>
        <TargetFrameworkVersion>v4.0</TargetFrameworkVersion>
      </PropertyGroup></Project>"#,
    );
    assert_eq!(meta.target_frameworks, vec!["net6.0"]);
  }

  #[test]
  fn test_project_identity() {
    let meta = ProjectMeta::new(vec!["Samples".to_string(), "Demo".to_string()]);
    assert_eq!(meta.project_identity(&[], "Demo.csproj"), "/Samples/Demo/Demo.csproj");

    let nested = meta.project_identity(&["Sub".to_string()], "Inner.csproj");
    assert_eq!(nested, "/Samples/Demo/Sub/Inner.csproj");
  }

  #[test]
  fn test_identity_is_injective_for_distinct_files() {
    let a = ProjectMeta::new(vec!["A".to_string()]);
    let b = ProjectMeta::new(vec!["B".to_string()]);
    assert_ne!(a.project_identity(&[], "X.csproj"), b.project_identity(&[], "X.csproj"));

    let same_module = ProjectMeta::new(vec!["A".to_string()]);
    assert_ne!(
      same_module.project_identity(&[], "X.csproj"),
      same_module.project_identity(&["Sub".to_string()], "X.csproj")
    );
  }

  #[test]
  fn test_stamp_versions() {
    let mut root = parse("<Project><PropertyGroup><Description>d</Description></PropertyGroup></Project>");
    stamp_versions(&mut root, &ReleaseVersion::parse("2.3.1-beta").unwrap());
    assert_eq!(msbuild::property_values(&root, "Version"), vec!["2.3.1-beta"]);
    assert_eq!(msbuild::property_values(&root, "AssemblyVersion"), vec!["2.3"]);
    assert_eq!(msbuild::property_values(&root, "FileVersion"), vec!["2.3.1.0"]);
  }
}

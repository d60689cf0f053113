//! Solution file analysis
//!
//! Extracts the project descriptors a solution includes. Solution files use
//! a line-oriented format:
//!
//! ```text
//! Project("{GUID}") = "Name", "Path\To\Name.csproj", "{GUID}"
//! ```
//!
//! Solution folders and other non-descriptor items are skipped.

use crate::scan::path as scan_path;
use crate::utils;
use regex::Regex;
use std::sync::LazyLock;

static PROJECT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?m)^Project\("\{[0-9A-Fa-f-]+\}"\)\s*=\s*"[^"]*",\s*"([^"]+)""#).expect("solution project pattern")
});

/// Extensions a solution item must have to count as a project descriptor
const DESCRIPTOR_EXTENSIONS: [&str; 2] = [".csproj", ".vbproj"];

/// Identities of the project descriptors referenced by a solution
///
/// Paths are relative to the solution file's directory, which is also the
/// module scan root, so the result is directly comparable to module project
/// identities.
pub fn included_projects(contents: &str) -> Vec<String> {
  PROJECT_LINE_RE
    .captures_iter(contents)
    .filter_map(|captures| {
      let path = captures.get(1)?.as_str();
      let extension = utils::extension_of(path);
      if !DESCRIPTOR_EXTENSIONS.contains(&extension.as_str()) {
        return None;
      }
      let segments: Vec<&str> = path.split(['/', '\\']).filter(|s| !s.is_empty()).collect();
      Some(scan_path::identity(&segments))
    })
    .collect()
}

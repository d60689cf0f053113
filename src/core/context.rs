//! Unified run context
//!
//! Built once per command and passed through every phase. Owns the
//! diagnostics collector so no phase needs process-global state.

use crate::core::config::{AppConfig, ProjectConfig};
use crate::core::diagnostics::Diagnostics;
use crate::core::version::ReleaseVersion;
use std::path::{Path, PathBuf};

/// Everything a release run needs to know
pub struct RunContext {
  /// Root of the project data tree
  pub root_path: PathBuf,
  /// The version being released
  pub version: ReleaseVersion,
  /// Per-project configuration
  pub config: ProjectConfig,
  /// Per-user configuration
  pub app_config: AppConfig,
  /// Categorized message collector for the whole run
  pub diagnostics: Diagnostics,
}

impl RunContext {
  pub fn new(
    root_path: PathBuf,
    version: ReleaseVersion,
    config: ProjectConfig,
    app_config: AppConfig,
  ) -> Self {
    Self {
      root_path,
      version,
      config,
      app_config,
      diagnostics: Diagnostics::new(),
    }
  }

  /// Where finished archives are placed
  pub fn release_path(&self) -> PathBuf {
    self.root_path.join("release")
  }

  /// Where temporary rewritten copies are placed
  pub fn temp_path(&self) -> PathBuf {
    self.root_path.join("tmp")
  }

  /// Root of the source module tree
  pub fn src_path(&self) -> PathBuf {
    self.root_path.join("src")
  }

  /// Root of the documentation sources
  pub fn doc_path(&self) -> PathBuf {
    self.root_path.join("doc")
  }

  /// Where the external build drops release binaries
  pub fn binaries_path(&self) -> PathBuf {
    self.root_path.join("bin").join("Release")
  }

  /// Effective path of a temporary copy with the given file name
  pub fn temp_file(&self, name: &str) -> PathBuf {
    self.temp_path().join(name)
  }

  /// Resolve the root path from command-line options
  ///
  /// The explicit directory wins; otherwise the directory of the config
  /// file; otherwise the current directory.
  pub fn resolve_root(directory: Option<&Path>, config_file: &Path) -> PathBuf {
    match directory {
      Some(dir) => dir.to_path_buf(),
      None => config_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::config::{AppConfig, ProjectConfig};

  fn context_at(root: &str) -> RunContext {
    RunContext {
      root_path: PathBuf::from(root),
      version: ReleaseVersion::parse("1.0.0").unwrap(),
      config: ProjectConfig::default(),
      app_config: AppConfig::default(),
      diagnostics: Diagnostics::silent(),
    }
  }

  #[test]
  fn test_derived_paths() {
    let ctx = context_at("/proj");
    assert_eq!(ctx.release_path(), PathBuf::from("/proj/release"));
    assert_eq!(ctx.temp_path(), PathBuf::from("/proj/tmp"));
    assert_eq!(ctx.binaries_path(), PathBuf::from("/proj/bin/Release"));
  }

  #[test]
  fn test_resolve_root_prefers_directory() {
    let root = RunContext::resolve_root(Some(Path::new("/explicit")), Path::new("/cfg/relpack.json"));
    assert_eq!(root, PathBuf::from("/explicit"));

    let root = RunContext::resolve_root(None, Path::new("/cfg/relpack.json"));
    assert_eq!(root, PathBuf::from("/cfg"));

    let root = RunContext::resolve_root(None, Path::new("relpack.json"));
    assert_eq!(root, PathBuf::from("."));
  }
}

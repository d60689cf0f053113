//! Application and project configuration
//!
//! Two JSON files feed a run: a per-user application config
//! (`~/.relpack/config.json`) holding machine-specific paths, and a
//! per-project config (`relpack.json` next to the source tree) holding
//! release preferences. A missing file behaves like an empty object; every
//! field has a default.

use crate::core::error::{PackResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Archive container kinds relpack can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchiveKind {
  Zip,
  TarGz,
}

impl ArchiveKind {
  /// File extension including the leading dot
  pub fn file_extension(self) -> &'static str {
    match self {
      ArchiveKind::Zip => ".zip",
      ArchiveKind::TarGz => ".tar.gz",
    }
  }
}

/// Per-user application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
  /// Path to the external build tool (msbuild or a compatible driver)
  #[serde(default)]
  pub build_tool_path: Option<PathBuf>,
}

impl AppConfig {
  /// Directory holding the per-user configuration
  pub fn directory_path() -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    home.join(".relpack")
  }

  /// Path of the per-user configuration file
  pub fn file_path() -> PathBuf {
    Self::directory_path().join("config.json")
  }

  /// Load the per-user config; a missing or unreadable file yields defaults
  pub fn load() -> PackResult<Self> {
    Self::load_from(&Self::file_path())
  }

  pub fn load_from(path: &Path) -> PackResult<Self> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(_) => return Ok(Self::default()),
    };
    serde_json::from_str(&content).with_context(|| format!("Failed to parse app config from {}", path.display()))
  }

  /// Save the per-user config, creating its directory
  pub fn save(&self) -> PackResult<()> {
    let dir = Self::directory_path();
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = Self::file_path();
    let content = serde_json::to_string_pretty(self).context("Failed to serialize app config")?;
    fs::write(&path, content).with_context(|| format!("Failed to write app config to {}", path.display()))?;
    Ok(())
  }
}

fn default_archive_kinds() -> Vec<ArchiveKind> {
  vec![ArchiveKind::Zip]
}

fn default_keyword_delimiter() -> char {
  '$'
}

/// Per-project release configuration (`relpack.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
  /// Archive container kinds to produce for every release archive
  #[serde(default = "default_archive_kinds")]
  pub archive_kinds: Vec<ArchiveKind>,

  /// Delimiter around `VERSION`/`DATE`/`DATETIME` keywords in templated files
  #[serde(default = "default_keyword_delimiter")]
  pub readme_keyword_delimiter: char,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      archive_kinds: default_archive_kinds(),
      readme_keyword_delimiter: default_keyword_delimiter(),
    }
  }
}

impl ProjectConfig {
  /// Default project config file name
  pub const FILE_NAME: &'static str = "relpack.json";

  /// Load the project config; a missing file yields defaults
  pub fn load(path: &Path) -> PackResult<Self> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(_) => return Ok(Self::default()),
    };
    serde_json::from_str(&content).with_context(|| format!("Failed to parse project config from {}", path.display()))
  }

  /// Save the project config
  pub fn save(&self, path: &Path) -> PackResult<()> {
    let content = serde_json::to_string_pretty(self).context("Failed to serialize project config")?;
    fs::write(path, content).with_context(|| format!("Failed to write project config to {}", path.display()))?;
    Ok(())
  }
}

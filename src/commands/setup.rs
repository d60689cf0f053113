//! The `setup` command: create skeleton configuration files

use crate::core::config::{AppConfig, ProjectConfig};
use crate::core::error::{PackResult, ResultExt};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Patterns every release tree wants ignored
const ROOT_IGNORE_PATTERNS: [&str; 5] = ["**/bin/", "**/obj/", "doc/*.xml", "**/*.bak", "**/*.cache"];

/// Additional patterns for the module tree
const SRC_IGNORE_PATTERNS: [&str; 2] = [".vs/", "packages/*/"];

pub fn run_setup(
  app_config: bool,
  project_config: bool,
  gitignore: bool,
  directory: Option<PathBuf>,
) -> PackResult<()> {
  let root = directory.unwrap_or_else(|| PathBuf::from("."));

  if app_config {
    let config = AppConfig::load()?;
    config.save()?;
    println!("Wrote {}", AppConfig::file_path().display());
  }

  if project_config {
    let path = root.join(ProjectConfig::FILE_NAME);
    ProjectConfig::default().save(&path)?;
    println!("Wrote {}", path.display());
  }

  if gitignore {
    fs::create_dir_all(&root).with_context(|| format!("Failed to create {}", root.display()))?;
    write_gitignore(&root, &ROOT_IGNORE_PATTERNS)?;
    let src = root.join("src");
    if src.is_dir() {
      write_gitignore(&src, &SRC_IGNORE_PATTERNS)?;
    }
  }

  Ok(())
}

/// Merge ignore patterns into a `.gitignore`, keeping existing lines
fn write_gitignore(dir: &Path, patterns: &[&str]) -> PackResult<()> {
  let path = dir.join(".gitignore");

  let mut lines: Vec<String> = Vec::new();
  let mut present: BTreeSet<String> = BTreeSet::new();
  if let Ok(existing) = fs::read_to_string(&path) {
    for line in existing.lines() {
      if !line.is_empty() && present.insert(line.to_string()) {
        lines.push(line.to_string());
      }
    }
  }

  for pattern in patterns {
    if present.insert((*pattern).to_string()) {
      lines.push((*pattern).to_string());
    }
  }

  let mut contents = lines.join("\n");
  contents.push('\n');
  fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_gitignore_merge_keeps_existing_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".gitignore"), "custom/\n**/bin/\n").unwrap();

    write_gitignore(dir.path(), &ROOT_IGNORE_PATTERNS).unwrap();
    let first = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
    assert!(first.contains("custom/"));
    assert_eq!(first.matches("**/bin/").count(), 1);

    write_gitignore(dir.path(), &ROOT_IGNORE_PATTERNS).unwrap();
    let second = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
    assert_eq!(first, second);
  }
}

//! Generic recursive tree scanner
//!
//! One scan routine serves every collection. Concrete behavior is injected
//! through two hooks: a directory hook that either records a terminal unit
//! (stopping the descent) or continues with a context value, and a file
//! classifier invoked for every file of a continued directory.
//!
//! Build-output directories and machine-local settings files are excluded
//! unconditionally. Children are visited in name order so repeated scans of
//! an unmodified tree produce identical results.

use crate::core::error::{PackResult, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory names that are always pruned
const RESERVED_OUTPUT_DIRS: [&str; 2] = ["bin", "obj"];

/// Outcome of the directory hook
pub enum DirDecision<C> {
  /// The directory is a terminal unit; do not descend into it
  Stop,
  /// Keep descending; the context value is handed to the classifier and to
  /// child directory decisions
  Descend(C),
}

/// Whether a file is a machine-local settings file that never belongs in a
/// release
pub fn is_local_settings_file(file_name: &str) -> bool {
  file_name.starts_with('.') || file_name.eq_ignore_ascii_case("thumbs.db") || file_name.eq_ignore_ascii_case("desktop.ini")
}

fn is_pruned_directory(dir_name: &str) -> bool {
  RESERVED_OUTPUT_DIRS.contains(&dir_name) || dir_name.starts_with('.')
}

/// Recursively scan a tree
///
/// `decide` is called for the root and every non-pruned descendant
/// directory, with the accumulated subdirectory sequence (root = empty) and
/// the parent's context. `classify` is called for every non-excluded file of
/// a directory whose decision was [`DirDecision::Descend`].
///
/// A nonexistent root yields an empty scan; ancillary directories are
/// optional in real trees.
pub fn scan_tree<C>(
  root: &Path,
  decide: &mut dyn FnMut(&Path, &[String], Option<&C>) -> PackResult<DirDecision<C>>,
  classify: &mut dyn FnMut(&Path, &[String], &C) -> PackResult<()>,
) -> PackResult<()> {
  if !root.is_dir() {
    log::debug!("scan root {} does not exist; nothing to collect", root.display());
    return Ok(());
  }
  walk(root, &mut Vec::new(), None, decide, classify)
}

fn walk<C>(
  dir: &Path,
  sub_directories: &mut Vec<String>,
  parent: Option<&C>,
  decide: &mut dyn FnMut(&Path, &[String], Option<&C>) -> PackResult<DirDecision<C>>,
  classify: &mut dyn FnMut(&Path, &[String], &C) -> PackResult<()>,
) -> PackResult<()> {
  let context = match decide(dir, sub_directories, parent)? {
    DirDecision::Stop => return Ok(()),
    DirDecision::Descend(context) => context,
  };

  let (files, dirs) = sorted_entries(dir)?;

  for file in &files {
    let name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if is_local_settings_file(name) {
      continue;
    }
    classify(file, sub_directories, &context)?;
  }

  for child in &dirs {
    let name = child.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if is_pruned_directory(name) {
      continue;
    }
    sub_directories.push(name.to_string());
    let result = walk(child, sub_directories, Some(&context), decide, classify);
    sub_directories.pop();
    result?;
  }

  Ok(())
}

/// List the files directly inside a directory, in name order, excluding
/// machine-local settings files
///
/// Used by directory hooks that need to inspect a folder's files before
/// deciding whether it is a terminal unit.
pub fn files_in(dir: &Path) -> PackResult<Vec<PathBuf>> {
  let (files, _) = sorted_entries(dir)?;
  Ok(
    files
      .into_iter()
      .filter(|f| {
        let name = f.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        !is_local_settings_file(name)
      })
      .collect(),
  )
}

fn sorted_entries(dir: &Path) -> PackResult<(Vec<PathBuf>, Vec<PathBuf>)> {
  let mut files = Vec::new();
  let mut dirs = Vec::new();

  let entries = fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;
  for entry in entries {
    let entry = entry.with_context(|| format!("Failed to read directory entry in {}", dir.display()))?;
    let path = entry.path();
    let file_type = entry
      .file_type()
      .with_context(|| format!("Failed to stat {}", path.display()))?;
    if file_type.is_dir() {
      dirs.push(path);
    } else if file_type.is_file() {
      files.push(path);
    }
  }

  files.sort();
  dirs.sort();
  Ok((files, dirs))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;

  fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"x").unwrap();
  }

  #[test]
  fn test_scan_collects_files_with_subdirectories() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("top.txt"));
    touch(&dir.path().join("a/nested.txt"));
    touch(&dir.path().join("a/b/deep.txt"));

    let mut seen = Vec::new();
    scan_tree::<()>(
      dir.path(),
      &mut |_, _, _| Ok(DirDecision::Descend(())),
      &mut |file, subs, _| {
        let name = file.file_name().unwrap().to_string_lossy().to_string();
        seen.push((subs.to_vec(), name));
        Ok(())
      },
    )
    .unwrap();

    assert_eq!(
      seen,
      vec![
        (vec![], "top.txt".to_string()),
        (vec!["a".to_string()], "nested.txt".to_string()),
        (vec!["a".to_string(), "b".to_string()], "deep.txt".to_string()),
      ]
    );
  }

  #[test]
  fn test_scan_prunes_output_dirs_and_dotfiles() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("keep.txt"));
    touch(&dir.path().join("bin/skipped.dll"));
    touch(&dir.path().join("obj/skipped.obj"));
    touch(&dir.path().join(".vs/skipped.suo"));
    touch(&dir.path().join(".hidden"));
    touch(&dir.path().join("Thumbs.db"));

    let mut seen = Vec::new();
    scan_tree::<()>(
      dir.path(),
      &mut |_, _, _| Ok(DirDecision::Descend(())),
      &mut |file, _, _| {
        seen.push(file.file_name().unwrap().to_string_lossy().to_string());
        Ok(())
      },
    )
    .unwrap();

    assert_eq!(seen, vec!["keep.txt".to_string()]);
  }

  #[test]
  fn test_stop_skips_subtree() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("a/inside.txt"));
    touch(&dir.path().join("b/inside.txt"));

    let mut seen = Vec::new();
    scan_tree::<()>(
      dir.path(),
      &mut |_, subs, _| {
        if subs.first().map(String::as_str) == Some("a") {
          Ok(DirDecision::Stop)
        } else {
          Ok(DirDecision::Descend(()))
        }
      },
      &mut |file, subs, _| {
        seen.push(format!("{}/{}", subs.join("/"), file.file_name().unwrap().to_string_lossy()));
        Ok(())
      },
    )
    .unwrap();

    assert_eq!(seen, vec!["b/inside.txt".to_string()]);
  }

  #[test]
  fn test_missing_root_is_empty_scan() {
    let mut called = false;
    scan_tree::<()>(
      Path::new("/definitely/not/here"),
      &mut |_, _, _| Ok(DirDecision::Descend(())),
      &mut |_, _, _| {
        called = true;
        Ok(())
      },
    )
    .unwrap();
    assert!(!called);
  }
}

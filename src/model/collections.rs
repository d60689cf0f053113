//! List-based ancillary file collections
//!
//! Release notes, help sources, key files, public info, solutions and build
//! outputs all share one collection type; what differs is the scan rule and
//! the archive-entry prefix.

use crate::core::context::RunContext;
use crate::core::error::PackResult;
use crate::model::file::RelevantFile;
use crate::scan::scanner::{self, DirDecision};
use crate::utils;
use std::path::{Path, PathBuf};

/// Extensions treated as templated text under `pubinfo/`
const TEMPLATED_TEXT_EXTENSIONS: [&str; 4] = [".md", ".txt", ".htm", ".html"];

/// File-name stems recognized as release notes
const RELEASE_NOTES_STEMS: [&str; 3] = ["readme", "releasenotes", "changelog"];

/// Scan and classification rule of a list collection
#[derive(Debug, Clone, Copy)]
pub enum CollectionRule {
  /// Non-recursive `*.sln` in the scan root
  SolutionRoot,
  /// Non-recursive release-notes files, keyword-templated
  ReleaseNotes,
  /// Recursive documentation sources; the generated `Help` output directory
  /// is skipped, help-builder projects get their own kind
  HelpSources,
  /// Non-recursive strong-name key files
  KeyFiles,
  /// Recursive public-info files; text files are keyword-templated
  PublicInfo,
  /// Recursive or flat filter by extension; an empty set accepts everything
  ByExtension {
    recursive: bool,
    extensions: &'static [&'static str],
  },
}

/// A flat list of relevant files discovered under one root
#[derive(Debug)]
pub struct ListCollection {
  prefix: &'static str,
  rule: CollectionRule,
  files: Vec<RelevantFile>,
}

impl ListCollection {
  pub fn new(prefix: &'static str, rule: CollectionRule) -> Self {
    Self {
      prefix,
      rule,
      files: Vec::new(),
    }
  }

  /// Solution files next to the module tree (archived under `src/`)
  pub fn solutions() -> Self {
    Self::new("src/", CollectionRule::SolutionRoot)
  }

  /// Release notes in the project root (archived at the archive root)
  pub fn release_notes() -> Self {
    Self::new("", CollectionRule::ReleaseNotes)
  }

  /// Documentation sources (archived under `doc/`)
  pub fn help_sources() -> Self {
    Self::new("doc/", CollectionRule::HelpSources)
  }

  /// Strong-name key files (archived under `keys/`)
  pub fn key_files() -> Self {
    Self::new("keys/", CollectionRule::KeyFiles)
  }

  /// Public project information; analyzed and prepared but never archived
  pub fn public_info() -> Self {
    Self::new("pubinfo/", CollectionRule::PublicInfo)
  }

  /// Build outputs from the release configuration
  pub fn binaries() -> Self {
    Self::new(
      "",
      CollectionRule::ByExtension {
        recursive: true,
        extensions: &[],
      },
    )
  }

  /// Compiled help files
  pub fn help_output() -> Self {
    Self::new(
      "",
      CollectionRule::ByExtension {
        recursive: true,
        extensions: &[".chm"],
      },
    )
  }

  pub fn files(&self) -> &[RelevantFile] {
    &self.files
  }

  pub fn file_count(&self) -> usize {
    self.files.len()
  }

  /// Scan `root` according to this collection's rule
  pub fn find_files(&mut self, root: &Path) -> PackResult<()> {
    let rule = self.rule;
    let files = &mut self.files;

    scanner::scan_tree::<()>(
      root,
      &mut |dir, subs, _| Ok(decide(rule, dir, subs)),
      &mut |file, subs, _| {
        if let Some(relevant) = classify(rule, file, subs) {
          files.push(relevant);
        }
        Ok(())
      },
    )
  }

  pub fn analyze(&mut self, ctx: &mut RunContext) -> PackResult<()> {
    for file in &mut self.files {
      file.analyze(ctx)?;
    }
    Ok(())
  }

  pub fn prepare(&mut self, ctx: &mut RunContext) -> PackResult<()> {
    for file in &mut self.files {
      file.prepare(ctx)?;
    }
    Ok(())
  }

  pub fn tidy_up(&mut self, ctx: &mut RunContext) {
    for file in &mut self.files {
      file.tidy_up(ctx);
    }
  }

  /// Enumerate (effective path, archive entry name) pairs
  pub fn provide_files(&self, ctx: &RunContext, add: &mut dyn FnMut(PathBuf, String)) {
    for file in &self.files {
      add(file.effective_path(ctx), format!("{}{}", self.prefix, file.logical_name()));
    }
  }
}

fn decide(rule: CollectionRule, dir: &Path, subs: &[String]) -> DirDecision<()> {
  let recursive = match rule {
    CollectionRule::SolutionRoot | CollectionRule::ReleaseNotes | CollectionRule::KeyFiles => false,
    CollectionRule::HelpSources | CollectionRule::PublicInfo => true,
    CollectionRule::ByExtension { recursive, .. } => recursive,
  };
  if !recursive && !subs.is_empty() {
    return DirDecision::Stop;
  }
  if matches!(rule, CollectionRule::HelpSources)
    && dir.file_name().and_then(|n| n.to_str()) == Some("Help")
  {
    // Generated help output; sources only.
    return DirDecision::Stop;
  }
  DirDecision::Descend(())
}

fn classify(rule: CollectionRule, file: &Path, subs: &[String]) -> Option<RelevantFile> {
  let file_name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
  let extension = utils::extension_of(file_name);

  match rule {
    CollectionRule::SolutionRoot => {
      (extension == ".sln").then(|| RelevantFile::solution(file.to_path_buf(), subs.to_vec()))
    }
    CollectionRule::ReleaseNotes => {
      let stem = utils::file_stem_of(file_name).to_ascii_lowercase();
      RELEASE_NOTES_STEMS
        .iter()
        .any(|s| stem.starts_with(s))
        .then(|| RelevantFile::templated(file.to_path_buf(), subs.to_vec()))
    }
    CollectionRule::HelpSources => Some(if extension == ".shfbproj" {
      RelevantFile::help_builder_project(file.to_path_buf(), subs.to_vec())
    } else {
      RelevantFile::plain(file.to_path_buf(), subs.to_vec())
    }),
    CollectionRule::KeyFiles => {
      (extension == ".snk").then(|| RelevantFile::plain(file.to_path_buf(), subs.to_vec()))
    }
    CollectionRule::PublicInfo => Some(if TEMPLATED_TEXT_EXTENSIONS.contains(&extension.as_str()) {
      RelevantFile::templated(file.to_path_buf(), subs.to_vec())
    } else {
      RelevantFile::plain(file.to_path_buf(), subs.to_vec())
    }),
    CollectionRule::ByExtension { extensions, .. } => (extensions.is_empty()
      || extensions.contains(&extension.as_str()))
    .then(|| RelevantFile::plain(file.to_path_buf(), subs.to_vec())),
  }
}

//! Files of interest to the release process
//!
//! A [`RelevantFile`] couples a source path and its subdirectory sequence
//! with a closed [`FileKind`] deciding how the file behaves across the
//! analyze / prepare / tidy-up lifecycle and which path ends up in the
//! archive manifest.

use crate::core::context::RunContext;
use crate::core::error::{PackResult, ResultExt};
use crate::model::project::{self, ProjectMeta, ProjectOutputInfo};
use crate::model::{readme, sample, solution};
use crate::msbuild::{self, Backup};
use crate::scan::path as scan_path;
use crate::utils;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Descriptor state plus the backup of its in-place rewrite
#[derive(Debug, Default)]
pub struct ProjectState {
  pub meta: ProjectMeta,
  backup: Option<Backup>,
}

/// Sample descriptor state; the rewritten copy lives under a throwaway name
#[derive(Debug)]
pub struct SampleState {
  pub meta: ProjectMeta,
  temp_name: String,
}

/// Help-builder project state (in-place stamped, like module descriptors)
#[derive(Debug, Default)]
pub struct HelpBuilderState {
  backup: Option<Backup>,
}

/// Solution analysis results
#[derive(Debug, Default)]
pub struct SolutionState {
  pub included_projects: Vec<String>,
}

/// How a file behaves through the release lifecycle
#[derive(Debug)]
pub enum FileKind {
  /// Shipped verbatim
  Plain,
  /// Keyword-templated into a temporary copy
  Templated,
  /// Module project descriptor, version-stamped in place with backup
  Project(ProjectState),
  /// Sample project descriptor, stamped and reference-rewritten into a
  /// temporary copy
  SampleProject(SampleState),
  /// Help-builder project, help-version-stamped in place with backup
  HelpBuilderProject(HelpBuilderState),
  /// Solution file; analysis records the projects it includes
  Solution(SolutionState),
}

/// A file discovered by a collection scan
#[derive(Debug)]
pub struct RelevantFile {
  path: PathBuf,
  file_name: String,
  sub_directories: Vec<String>,
  kind: FileKind,
}

impl RelevantFile {
  pub fn new(path: PathBuf, sub_directories: Vec<String>, kind: FileKind) -> Self {
    let file_name = path
      .file_name()
      .map(|n| n.to_string_lossy().to_string())
      .unwrap_or_default();
    Self {
      path,
      file_name,
      sub_directories,
      kind,
    }
  }

  pub fn plain(path: PathBuf, sub_directories: Vec<String>) -> Self {
    Self::new(path, sub_directories, FileKind::Plain)
  }

  pub fn templated(path: PathBuf, sub_directories: Vec<String>) -> Self {
    Self::new(path, sub_directories, FileKind::Templated)
  }

  pub fn project(path: PathBuf, sub_directories: Vec<String>, module_dirs: Vec<String>) -> Self {
    Self::new(
      path,
      sub_directories,
      FileKind::Project(ProjectState {
        meta: ProjectMeta::new(module_dirs),
        backup: None,
      }),
    )
  }

  pub fn sample_project(path: PathBuf, sub_directories: Vec<String>, module_dirs: Vec<String>) -> Self {
    let extension = utils::extension_of(
      path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
        .as_str(),
    );
    let temp_name = format!("{}{}", Uuid::new_v4().simple(), extension);
    Self::new(
      path,
      sub_directories,
      FileKind::SampleProject(SampleState {
        meta: ProjectMeta::new(module_dirs),
        temp_name,
      }),
    )
  }

  pub fn help_builder_project(path: PathBuf, sub_directories: Vec<String>) -> Self {
    Self::new(path, sub_directories, FileKind::HelpBuilderProject(HelpBuilderState::default()))
  }

  pub fn solution(path: PathBuf, sub_directories: Vec<String>) -> Self {
    Self::new(path, sub_directories, FileKind::Solution(SolutionState::default()))
  }

  pub fn kind(&self) -> &FileKind {
    &self.kind
  }

  /// Subdirectory sequence joined with "/" plus the file name
  pub fn logical_name(&self) -> String {
    scan_path::logical_name(&self.sub_directories, &self.file_name)
  }

  /// The analysis snapshot, for descriptor kinds
  pub fn project_output_info(&self) -> Option<ProjectOutputInfo> {
    self
      .descriptor_meta()
      .map(|meta| meta.create_output_info(&self.sub_directories, &self.file_name))
  }

  fn descriptor_meta(&self) -> Option<&ProjectMeta> {
    match &self.kind {
      FileKind::Project(state) => Some(&state.meta),
      FileKind::SampleProject(state) => Some(&state.meta),
      _ => None,
    }
  }

  /// Collect per-file metadata
  pub fn analyze(&mut self, ctx: &mut RunContext) -> PackResult<()> {
    ctx.diagnostics.debug(format!("Analyzing file {}", self.logical_name()));

    match &mut self.kind {
      FileKind::Project(state) => {
        let identity = state.meta.project_identity(&self.sub_directories, &self.file_name);
        let root = msbuild::load_descriptor(&self.path)?;
        state.meta.analyze(&root, &self.file_name, &identity, &mut ctx.diagnostics);
      }
      FileKind::SampleProject(state) => {
        let identity = state.meta.project_identity(&self.sub_directories, &self.file_name);
        let root = msbuild::load_descriptor(&self.path)?;
        state.meta.analyze(&root, &self.file_name, &identity, &mut ctx.diagnostics);
      }
      FileKind::Solution(state) => {
        let contents =
          fs::read_to_string(&self.path).with_context(|| format!("Failed to read solution {}", self.path.display()))?;
        state.included_projects = solution::included_projects(&contents);
        for project in &state.included_projects {
          ctx.diagnostics.debug(format!("Found reference to project {}.", project));
        }
      }
      _ => {}
    }
    Ok(())
  }

  /// Produce the prepared form of the file (in place or as a temporary copy)
  pub fn prepare(&mut self, ctx: &mut RunContext) -> PackResult<()> {
    ctx.diagnostics.debug(format!("Preparing file {}", self.logical_name()));

    match &mut self.kind {
      FileKind::Plain | FileKind::Solution(_) | FileKind::SampleProject(_) => Ok(()),
      FileKind::Templated => {
        let contents =
          fs::read_to_string(&self.path).with_context(|| format!("Failed to read {}", self.path.display()))?;
        let expanded = readme::expand_keywords(&contents, ctx.config.readme_keyword_delimiter, &ctx.version);
        let target = ctx.temp_file(&self.file_name);
        fs::write(&target, expanded).with_context(|| format!("Failed to write {}", target.display()))?;
        Ok(())
      }
      FileKind::Project(state) => {
        let mut root = msbuild::load_descriptor(&self.path)?;
        project::stamp_versions(&mut root, &ctx.version);
        state.backup = Some(Backup::create(&self.path)?);
        msbuild::save_descriptor(&root, &self.path)
      }
      FileKind::HelpBuilderProject(state) => {
        let mut root = msbuild::load_descriptor(&self.path)?;
        msbuild::write_metadata_element(&mut root, "HelpFileVersion", &ctx.version.file_version());
        msbuild::write_metadata_element(
          &mut root,
          "Preliminary",
          if ctx.version.is_prerelease() { "True" } else { "False" },
        );
        state.backup = Some(Backup::create(&self.path)?);
        msbuild::save_descriptor(&root, &self.path)
      }
    }
  }

  /// Produce the rewritten temporary copy of a sample descriptor
  ///
  /// `shipped_sources` and `built_outputs` come from the owning sample
  /// collection; non-sample kinds fall back to the ordinary preparation.
  pub fn prepare_sample(
    &mut self,
    ctx: &mut RunContext,
    shipped_sources: &BTreeSet<String>,
    built_outputs: &BTreeMap<String, ProjectOutputInfo>,
  ) -> PackResult<()> {
    if !matches!(self.kind, FileKind::SampleProject(_)) {
      return self.prepare(ctx);
    }
    ctx.diagnostics.debug(format!("Preparing sample project {}", self.logical_name()));

    let FileKind::SampleProject(state) = &mut self.kind else {
      return Ok(());
    };
    let identity = state.meta.project_identity(&self.sub_directories, &self.file_name);
    let local_path = state.meta.all_sub_directories(&self.sub_directories);

    let mut root = msbuild::load_descriptor(&self.path)?;
    project::stamp_versions(&mut root, &ctx.version);
    sample::rewrite_project_references(
      &mut root,
      &identity,
      &local_path,
      &state.meta.target_frameworks,
      shipped_sources,
      built_outputs,
      &mut ctx.diagnostics,
    );

    let target = ctx.temp_file(&state.temp_name);
    ctx
      .diagnostics
      .debug(format!("Writing sample project {} to {}", self.file_name, target.display()));
    msbuild::save_descriptor(&root, &target)
  }

  /// The path that goes into archive manifests
  pub fn effective_path(&self, ctx: &RunContext) -> PathBuf {
    match &self.kind {
      FileKind::Templated => ctx.temp_file(&self.file_name),
      FileKind::SampleProject(state) => ctx.temp_file(&state.temp_name),
      _ => self.path.clone(),
    }
  }

  /// Undo preparation artifacts: restore backups, drop temporary copies
  ///
  /// Best-effort by contract; failures become diagnostics, never errors.
  pub fn tidy_up(&mut self, ctx: &mut RunContext) {
    match &mut self.kind {
      FileKind::Project(ProjectState { backup, .. }) | FileKind::HelpBuilderProject(HelpBuilderState { backup }) => {
        if let Some(backup) = backup.take()
          && let Err(err) = backup.restore()
        {
          ctx.diagnostics.problem(format!("Failed to restore {}: {}", self.path.display(), err));
        }
      }
      FileKind::Templated => {
        remove_temp_copy(ctx, &self.file_name);
      }
      FileKind::SampleProject(state) => {
        let temp_name = state.temp_name.clone();
        remove_temp_copy(ctx, &temp_name);
      }
      FileKind::Plain | FileKind::Solution(_) => {}
    }
  }
}

fn remove_temp_copy(ctx: &mut RunContext, temp_name: &str) {
  let temp = ctx.temp_file(temp_name);
  if temp.exists() && fs::remove_file(&temp).is_err() {
    ctx.diagnostics.problem(format!("Failed to remove temporary file {}", temp.display()));
  }
}

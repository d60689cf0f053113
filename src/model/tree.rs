//! The project tree and its release phases
//!
//! One [`ProjectTree`] owns every file collection of a release run and moves
//! them through the strictly sequential phases
//! `Discovered → Analyzed → Prepared → Assembled → TornDown`. Teardown
//! always runs, whatever happened to the build or the archives.

use crate::build::archive::{self, ManifestEntry};
use crate::build::runner::BuildRunner;
use crate::core::context::RunContext;
use crate::core::error::{ConfigError, PackError, PackResult, ResultExt};
use crate::model::collections::ListCollection;
use crate::model::file::FileKind;
use crate::model::module::ModuleCollection;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Run phases, strictly sequential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Created,
  Discovered,
  Analyzed,
  Prepared,
  Assembled,
  TornDown,
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}", self)
  }
}

/// A file source feeding an archive manifest
enum Source<'a> {
  Modules(&'a ModuleCollection),
  List(&'a ListCollection),
}

/// The complete file model of one release run
pub struct ProjectTree {
  modules: ModuleCollection,
  release_notes: ListCollection,
  help_sources: ListCollection,
  key_files: ListCollection,
  public_info: ListCollection,
  solutions: ListCollection,
  /// Discovered only after primary analysis; needs the output lookup
  samples: Option<ModuleCollection>,
  phase: Phase,
}

impl Default for ProjectTree {
  fn default() -> Self {
    Self::new()
  }
}

impl ProjectTree {
  pub fn new() -> Self {
    Self {
      modules: ModuleCollection::primary(),
      release_notes: ListCollection::release_notes(),
      help_sources: ListCollection::help_sources(),
      key_files: ListCollection::key_files(),
      public_info: ListCollection::public_info(),
      solutions: ListCollection::solutions(),
      samples: None,
      phase: Phase::Created,
    }
  }

  #[allow(dead_code)] // asserted on by unit tests
  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn modules(&self) -> &ModuleCollection {
    &self.modules
  }

  pub fn solutions(&self) -> &ListCollection {
    &self.solutions
  }

  pub fn release_notes(&self) -> &ListCollection {
    &self.release_notes
  }

  pub fn help_sources(&self) -> &ListCollection {
    &self.help_sources
  }

  pub fn key_files(&self) -> &ListCollection {
    &self.key_files
  }

  fn require_phase(&self, expected: Phase) -> PackResult<()> {
    if self.phase == expected {
      Ok(())
    } else {
      Err(PackError::Config(ConfigError::WrongPhase {
        expected: expected.to_string(),
        actual: self.phase.to_string(),
      }))
    }
  }

  /// Walk the tree once and build the file model
  pub fn find_contents(&mut self, ctx: &mut RunContext) -> PackResult<()> {
    self.require_phase(Phase::Created)?;

    let src = ctx.src_path();
    self.solutions.find_files(&src)?;
    self.modules.find_files(&src, ctx)?;
    self.release_notes.find_files(&ctx.root_path)?;
    self.help_sources.find_files(&ctx.doc_path())?;
    self.key_files.find_files(&ctx.root_path.join("keys"))?;
    self.public_info.find_files(&ctx.root_path.join("pubinfo"))?;

    ctx.diagnostics.info(format!(
      "Discovered {} module(s), {} solution(s).",
      self.modules.modules().len(),
      self.solutions.file_count()
    ));
    self.phase = Phase::Discovered;
    Ok(())
  }

  /// Walk the model again and extract per-file metadata
  pub fn analyze_contents(&mut self, ctx: &mut RunContext) -> PackResult<()> {
    self.require_phase(Phase::Discovered)?;

    self.modules.analyze(ctx)?;
    self.release_notes.analyze(ctx)?;
    self.help_sources.analyze(ctx)?;
    self.key_files.analyze(ctx)?;
    self.public_info.analyze(ctx)?;
    self.solutions.analyze(ctx)?;

    self.phase = Phase::Analyzed;
    Ok(())
  }

  /// Materialize prepared files, run the external builds, assemble archives
  ///
  /// Teardown always runs, also when a build or the assembly failed.
  pub fn prepare_contents(&mut self, ctx: &mut RunContext) -> PackResult<()> {
    self.require_phase(Phase::Analyzed)?;

    let release_path = ctx.release_path();
    fs::create_dir_all(&release_path).with_context(|| format!("Failed to create {}", release_path.display()))?;
    let temp_path = ctx.temp_path();
    fs::create_dir_all(&temp_path).with_context(|| format!("Failed to create {}", temp_path.display()))?;

    let result = self.build_and_assemble(ctx);

    self.tidy_up(ctx);
    // Leave the temp directory alone if anything else was dropped there.
    let _ = fs::remove_dir(&temp_path);
    self.phase = Phase::TornDown;

    result
  }

  fn build_and_assemble(&mut self, ctx: &mut RunContext) -> PackResult<()> {
    self.modules.prepare(ctx)?;
    self.release_notes.prepare(ctx)?;
    self.help_sources.prepare(ctx)?;
    self.key_files.prepare(ctx)?;
    self.public_info.prepare(ctx)?;
    self.solutions.prepare(ctx)?;
    self.phase = Phase::Prepared;

    let runner = BuildRunner::from_context(ctx)?;

    let solution_paths: Vec<PathBuf> = self.solutions.files().iter().map(|f| f.effective_path(ctx)).collect();
    for path in &solution_paths {
      runner.build(path, &["/t:Rebuild", "/p:Configuration=Release"], &mut ctx.diagnostics)?;
    }

    let help_project_paths: Vec<PathBuf> = self
      .help_sources
      .files()
      .iter()
      .filter(|f| matches!(f.kind(), FileKind::HelpBuilderProject(_)))
      .map(|f| f.effective_path(ctx))
      .collect();
    for path in &help_project_paths {
      runner.build(path, &["/p:Configuration=Release"], &mut ctx.diagnostics)?;
    }

    let mut binaries = ListCollection::binaries();
    binaries.find_files(&ctx.binaries_path())?;

    // Sample discovery needs the complete identity lookup from the primary
    // analysis; storing the collection before preparing it keeps its files
    // reachable for teardown even on a mid-preparation failure.
    let built_outputs = self.modules.output_lookup();
    let mut samples = ModuleCollection::samples();
    samples.find_files(&ctx.src_path(), ctx)?;
    self.samples = Some(samples);
    if let Some(samples) = self.samples.as_mut() {
      samples.analyze(ctx)?;
      samples.prepare_samples(ctx, &built_outputs)?;
    }

    let mut help_files = ListCollection::help_output();
    help_files.find_files(&ctx.doc_path())?;

    Self::create_archives(
      ctx,
      "src",
      &[
        Source::Modules(&self.modules),
        Source::List(&self.release_notes),
        Source::List(&self.help_sources),
        Source::List(&self.solutions),
        Source::List(&self.key_files),
      ],
    )?;

    let mut bin_sources = vec![Source::List(&self.release_notes), Source::List(&binaries)];
    if let Some(samples) = &self.samples {
      bin_sources.push(Source::Modules(samples));
    }
    Self::create_archives(ctx, "bin", &bin_sources)?;

    if help_files.file_count() > 0 {
      Self::create_archives(ctx, "help", &[Source::List(&help_files), Source::List(&self.release_notes)])?;
    }

    self.phase = Phase::Assembled;
    Ok(())
  }

  fn create_archives(ctx: &mut RunContext, name: &str, sources: &[Source<'_>]) -> PackResult<()> {
    let manifest = Self::manifest_of(ctx, sources);
    for kind in ctx.config.archive_kinds.clone() {
      let file_name = archive::archive_file_name(name, &ctx.version, kind);
      let path = ctx.release_path().join(&file_name);
      ctx.diagnostics.info(format!("Creating archive {} ...", path.display()));
      archive::pack_archive(&path, kind, &manifest)?;
    }
    Ok(())
  }

  fn manifest_of(ctx: &RunContext, sources: &[Source<'_>]) -> Vec<ManifestEntry> {
    let mut manifest = Vec::new();
    for source in sources {
      match source {
        Source::Modules(collection) => collection.provide_files(ctx, &mut |path, entry| manifest.push((path, entry))),
        Source::List(collection) => collection.provide_files(ctx, &mut |path, entry| manifest.push((path, entry))),
      }
    }
    manifest
  }

  /// Best-effort removal of preparation artifacts across every collection
  fn tidy_up(&mut self, ctx: &mut RunContext) {
    self.modules.tidy_up(ctx);
    self.release_notes.tidy_up(ctx);
    self.help_sources.tidy_up(ctx);
    self.key_files.tidy_up(ctx);
    self.public_info.tidy_up(ctx);
    self.solutions.tidy_up(ctx);
    if let Some(samples) = self.samples.as_mut() {
      samples.tidy_up(ctx);
    }
  }
}

//! Module discovery
//!
//! A module is a directory containing exactly one project descriptor. The
//! module owns the recursive scan of its own subtree; the surrounding
//! collection never descends past a module boundary.

use crate::core::context::RunContext;
use crate::core::error::PackResult;
use crate::model::file::RelevantFile;
use crate::model::project::ProjectOutputInfo;
use crate::scan::scanner::{self, DirDecision};
use crate::utils;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// File extensions that identify a project descriptor
pub const DESCRIPTOR_EXTENSIONS: [&str; 2] = [".csproj", ".vbproj"];

/// Source-file extensions that never ship (editor and build leftovers)
const IGNORED_SOURCE_EXTENSIONS: [&str; 5] = [".suo", ".user", ".bak", ".old", ".cache"];

fn is_descriptor(file_name: &str) -> bool {
  DESCRIPTOR_EXTENSIONS.contains(&utils::extension_of(file_name).as_str())
}

/// One buildable unit: a directory with exactly one project descriptor
#[derive(Debug)]
pub struct Module {
  name: String,
  folder: PathBuf,
  sub_directories: Vec<String>,
  files: Vec<RelevantFile>,
}

impl Module {
  /// Create a module rooted at `folder` and scan its subtree for files
  ///
  /// `sample` selects the descriptor flavor: sample descriptors get their
  /// references rewritten into a temporary copy, primary descriptors are
  /// stamped in place.
  fn discover(name: String, folder: &Path, sub_directories: Vec<String>, sample: bool) -> PackResult<Self> {
    let mut files = Vec::new();
    let module_dirs = sub_directories.clone();

    scanner::scan_tree::<()>(
      folder,
      &mut |_, _, _| Ok(DirDecision::Descend(())),
      &mut |file, subs, _| {
        let file_name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let extension = utils::extension_of(file_name);
        if IGNORED_SOURCE_EXTENSIONS.contains(&extension.as_str()) {
          return Ok(());
        }
        let relevant = if is_descriptor(file_name) {
          if sample {
            RelevantFile::sample_project(file.to_path_buf(), subs.to_vec(), module_dirs.clone())
          } else {
            RelevantFile::project(file.to_path_buf(), subs.to_vec(), module_dirs.clone())
          }
        } else {
          RelevantFile::plain(file.to_path_buf(), subs.to_vec())
        };
        files.push(relevant);
        Ok(())
      },
    )?;

    Ok(Self {
      name,
      folder: folder.to_path_buf(),
      sub_directories,
      files,
    })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn folder(&self) -> &Path {
    &self.folder
  }

  #[allow(dead_code)] // asserted on by unit tests
  pub fn sub_directories(&self) -> &[String] {
    &self.sub_directories
  }

  pub fn files(&self) -> &[RelevantFile] {
    &self.files
  }

  fn analyze(&mut self, ctx: &mut RunContext) -> PackResult<()> {
    for file in &mut self.files {
      file.analyze(ctx)?;
    }
    Ok(())
  }

  fn prepare(&mut self, ctx: &mut RunContext) -> PackResult<()> {
    for file in &mut self.files {
      file.prepare(ctx)?;
    }
    Ok(())
  }

  fn prepare_samples(
    &mut self,
    ctx: &mut RunContext,
    shipped_sources: &BTreeSet<String>,
    built_outputs: &BTreeMap<String, ProjectOutputInfo>,
  ) -> PackResult<()> {
    for file in &mut self.files {
      file.prepare_sample(ctx, shipped_sources, built_outputs)?;
    }
    Ok(())
  }

  fn tidy_up(&mut self, ctx: &mut RunContext) {
    for file in &mut self.files {
      file.tidy_up(ctx);
    }
  }

  /// Analysis snapshots of every descriptor in this module
  pub fn all_projects(&self) -> impl Iterator<Item = ProjectOutputInfo> + '_ {
    self.files.iter().filter_map(RelevantFile::project_output_info)
  }

  fn provide_files(&self, ctx: &RunContext, add: &mut dyn FnMut(PathBuf, String)) {
    let mut prefix = String::new();
    for dir in &self.sub_directories {
      prefix.push_str(dir);
      prefix.push('/');
    }
    for file in &self.files {
      add(file.effective_path(ctx), format!("{}{}", prefix, file.logical_name()));
    }
  }
}

/// Where a collection may suspect module boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleScanScope {
  /// Anywhere under the scan root
  Everywhere,
  /// Only under top-level directories named for sample code
  SampleRoots,
}

/// The scan driver that partitions a tree into modules
#[derive(Debug)]
pub struct ModuleCollection {
  prefix: &'static str,
  scope: ModuleScanScope,
  sample: bool,
  modules: Vec<Module>,
}

impl ModuleCollection {
  /// The primary source-module collection (archived under `src/`)
  pub fn primary() -> Self {
    Self {
      prefix: "src/",
      scope: ModuleScanScope::Everywhere,
      sample: false,
      modules: Vec::new(),
    }
  }

  /// The sample-module collection (archived under `samples/`)
  pub fn samples() -> Self {
    Self {
      prefix: "samples/",
      scope: ModuleScanScope::SampleRoots,
      sample: true,
      modules: Vec::new(),
    }
  }

  pub fn modules(&self) -> &[Module] {
    &self.modules
  }

  /// Recursively partition the tree under `root` into modules
  pub fn find_files(&mut self, root: &Path, ctx: &mut RunContext) -> PackResult<()> {
    let scope = self.scope;
    let sample = self.sample;
    let modules = &mut self.modules;
    let diagnostics = &mut ctx.diagnostics;

    scanner::scan_tree::<()>(
      root,
      &mut |dir, subs, _| {
        let suspect = match scope {
          ModuleScanScope::Everywhere => true,
          ModuleScanScope::SampleRoots => {
            matches!(subs.first().map(String::as_str), Some("Samples") | Some("Examples"))
          }
        };
        if !suspect {
          return Ok(DirDecision::Descend(()));
        }

        let descriptors: Vec<PathBuf> = scanner::files_in(dir)?
          .into_iter()
          .filter(|f| {
            let name = f.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            is_descriptor(name)
          })
          .collect();

        if descriptors.len() == 1 {
          let descriptor_name = descriptors[0]
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
          let name = utils::file_stem_of(&descriptor_name).to_string();
          diagnostics.debug(format!("module found: {}", dir.display()));
          modules.push(Module::discover(name, dir, subs.to_vec(), sample)?);
          Ok(DirDecision::Stop)
        } else {
          Ok(DirDecision::Descend(()))
        }
      },
      // Loose files outside any module are not part of this collection.
      &mut |_, _, _| Ok(()),
    )
  }

  pub fn analyze(&mut self, ctx: &mut RunContext) -> PackResult<()> {
    for module in &mut self.modules {
      module.analyze(ctx)?;
    }
    Ok(())
  }

  pub fn prepare(&mut self, ctx: &mut RunContext) -> PackResult<()> {
    for module in &mut self.modules {
      module.prepare(ctx)?;
    }
    Ok(())
  }

  /// Prepare sample modules: rewrite references against the built outputs
  ///
  /// `built_outputs` is the identity lookup produced by the primary
  /// collection's analysis; the shipped-sources set is this collection's own
  /// project inventory.
  pub fn prepare_samples(
    &mut self,
    ctx: &mut RunContext,
    built_outputs: &BTreeMap<String, ProjectOutputInfo>,
  ) -> PackResult<()> {
    let shipped_sources: BTreeSet<String> = self.all_projects().map(|p| p.identity).collect();
    for module in &mut self.modules {
      module.prepare_samples(ctx, &shipped_sources, built_outputs)?;
    }
    Ok(())
  }

  pub fn tidy_up(&mut self, ctx: &mut RunContext) {
    for module in &mut self.modules {
      module.tidy_up(ctx);
    }
  }

  /// Analysis snapshots of every project in every module
  pub fn all_projects(&self) -> impl Iterator<Item = ProjectOutputInfo> + '_ {
    self.modules.iter().flat_map(Module::all_projects)
  }

  /// The identity → output lookup consumed by the sample rewriter
  pub fn output_lookup(&self) -> BTreeMap<String, ProjectOutputInfo> {
    self.all_projects().map(|p| (p.identity.clone(), p)).collect()
  }

  /// Enumerate (effective path, archive entry name) pairs
  pub fn provide_files(&self, ctx: &RunContext, add: &mut dyn FnMut(PathBuf, String)) {
    let prefix = self.prefix;
    for module in &self.modules {
      module.provide_files(ctx, &mut |path, entry| {
        add(path, format!("{}{}", prefix, entry));
      });
    }
  }
}

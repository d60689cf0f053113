//! The `pack` command: build a complete release

use crate::core::config::{AppConfig, ProjectConfig};
use crate::core::context::RunContext;
use crate::core::diagnostics::MessageKind;
use crate::core::error::PackResult;
use crate::core::version::ReleaseVersion;
use crate::model::tree::ProjectTree;
use std::path::PathBuf;

/// Resolve configs and root, producing the run context
pub fn build_context(
  version: &str,
  config_file: Option<PathBuf>,
  directory: Option<PathBuf>,
  build_tool: Option<PathBuf>,
) -> PackResult<RunContext> {
  let version = ReleaseVersion::parse(version)?;

  let config_path = match config_file {
    Some(path) => path,
    None => PathBuf::from(ProjectConfig::FILE_NAME),
  };
  let config_path = if config_path.is_absolute() {
    config_path
  } else {
    std::env::current_dir()?.join(config_path)
  };

  let root_path = RunContext::resolve_root(directory.as_deref(), &config_path);
  let config = ProjectConfig::load(&config_path)?;
  let mut app_config = AppConfig::load()?;
  if build_tool.is_some() {
    app_config.build_tool_path = build_tool;
  }

  Ok(RunContext::new(root_path, version, config, app_config))
}

pub fn run_pack(
  version: String,
  config_file: Option<PathBuf>,
  directory: Option<PathBuf>,
  build_tool: Option<PathBuf>,
) -> PackResult<()> {
  let mut ctx = build_context(&version, config_file, directory, build_tool)?;

  let result = run_phases(&mut ctx);
  if let Err(err) = &result {
    ctx.diagnostics.report(MessageKind::Failure, err.to_string());
  }
  ctx.diagnostics.print_summary();
  result
}

fn run_phases(ctx: &mut RunContext) -> PackResult<()> {
  let mut tree = ProjectTree::new();
  tree.find_contents(ctx)?;
  tree.analyze_contents(ctx)?;
  tree.prepare_contents(ctx)?;

  let summary = format!("Release {} assembled in {}.", ctx.version, ctx.release_path().display());
  ctx.diagnostics.info(summary);
  Ok(())
}

//! External build tool invocation
//!
//! Builds run synchronously and block until the tool exits; no timeout is
//! enforced, so a hung build blocks the whole run (known limitation of the
//! release process, matching the synchronous phase model).

use crate::core::context::RunContext;
use crate::core::diagnostics::Diagnostics;
use crate::core::error::{BuildError, ConfigError, PackError, PackResult};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs the configured external build tool
pub struct BuildRunner {
  tool_path: PathBuf,
}

impl BuildRunner {
  /// Resolve the build tool from the run's application config
  pub fn from_context(ctx: &RunContext) -> PackResult<Self> {
    let tool_path = ctx
      .app_config
      .build_tool_path
      .clone()
      .ok_or(PackError::Config(ConfigError::BuildToolNotConfigured))?;
    Ok(Self { tool_path })
  }

  /// Build one descriptor; a nonzero exit code is a fatal build failure
  pub fn build(&self, descriptor: &Path, args: &[&str], diagnostics: &mut Diagnostics) -> PackResult<()> {
    diagnostics.info(format!("Building {} ...", descriptor.display()));

    let output = Command::new(&self.tool_path)
      .arg(descriptor)
      .args(args)
      .output()
      .map_err(|err| {
        PackError::Build(BuildError::ToolNotLaunched {
          tool: self.tool_path.clone(),
          message: err.to_string(),
        })
      })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
      diagnostics.external(stdout.trim_end());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
      diagnostics.external(stderr.trim_end());
    }

    let exit_code = output.status.code().unwrap_or(-1);
    if exit_code == 0 {
      diagnostics.info("Process finished successfully.");
      Ok(())
    } else {
      Err(PackError::Build(BuildError::ToolFailed {
        descriptor: descriptor.to_path_buf(),
        exit_code,
      }))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::config::{AppConfig, ProjectConfig};
  use crate::core::version::ReleaseVersion;

  fn context_with_tool(tool: Option<&str>) -> RunContext {
    RunContext {
      root_path: PathBuf::from("."),
      version: ReleaseVersion::parse("1.0.0").unwrap(),
      config: ProjectConfig::default(),
      app_config: AppConfig {
        build_tool_path: tool.map(PathBuf::from),
      },
      diagnostics: Diagnostics::silent(),
    }
  }

  #[test]
  fn test_unconfigured_tool_is_config_error() {
    let err = BuildRunner::from_context(&context_with_tool(None)).err().unwrap();
    assert!(matches!(err, PackError::Config(ConfigError::BuildToolNotConfigured)));
  }

  #[test]
  fn test_successful_build() {
    let runner = BuildRunner::from_context(&context_with_tool(Some("true"))).unwrap();
    let mut diagnostics = Diagnostics::silent();
    runner.build(Path::new("whatever.sln"), &[], &mut diagnostics).unwrap();
  }

  #[test]
  fn test_nonzero_exit_is_build_failure() {
    let runner = BuildRunner::from_context(&context_with_tool(Some("false"))).unwrap();
    let mut diagnostics = Diagnostics::silent();
    let err = runner.build(Path::new("whatever.sln"), &[], &mut diagnostics).unwrap_err();
    assert!(matches!(err, PackError::Build(BuildError::ToolFailed { .. })));
  }
}

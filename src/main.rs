mod build;
mod commands;
mod core;
mod model;
mod msbuild;
mod scan;
mod ui;
mod utils;

use clap::{Parser, Subcommand};
use crate::core::error::{PackError, print_error};
use std::path::PathBuf;

/// Assemble source, binary, and help release archives for multi-project
/// MSBuild source trees
#[derive(Parser)]
#[command(name = "relpack")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build the release archives for a version
  Pack {
    /// The release version (semantic version, e.g. 1.2.3 or 1.2.3-beta)
    version: String,
    /// Path to the project configuration file (default: relpack.json in the
    /// current directory)
    #[arg(short = 'f', long = "config-file")]
    config_file: Option<PathBuf>,
    /// Root directory of the project data (default: the configuration file
    /// directory)
    #[arg(short = 'd', long)]
    directory: Option<PathBuf>,
    /// Override the configured external build tool
    #[arg(long)]
    build_tool: Option<PathBuf>,
  },

  /// Discover and analyze the tree without building anything
  Inspect {
    /// The release version the analysis runs against
    version: String,
    /// Path to the project configuration file
    #[arg(short = 'f', long = "config-file")]
    config_file: Option<PathBuf>,
    /// Root directory of the project data
    #[arg(short = 'd', long)]
    directory: Option<PathBuf>,
  },

  /// Create skeleton configuration files
  Setup {
    /// Write the per-user application config skeleton
    #[arg(short = 'a', long)]
    app_config: bool,
    /// Write a default project configuration file
    #[arg(short = 'p', long)]
    project_config: bool,
    /// Merge default exclusions into .gitignore files
    #[arg(short = 'g', long)]
    gitignore: bool,
    /// Root directory of the project data (default: current directory)
    #[arg(short = 'd', long)]
    directory: Option<PathBuf>,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  env_logger::init();

  let cli = Cli::parse();

  let result = match cli.command {
    Commands::Pack {
      version,
      config_file,
      directory,
      build_tool,
    } => commands::run_pack(version, config_file, directory, build_tool),
    Commands::Inspect {
      version,
      config_file,
      directory,
    } => commands::run_inspect(version, config_file, directory),
    Commands::Setup {
      app_config,
      project_config,
      gitignore,
      directory,
    } => commands::run_setup(app_config, project_config, gitignore, directory),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: PackError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}

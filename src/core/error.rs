//! Error types for relpack with contextual messages and exit codes
//!
//! A single categorized error enum covers the whole run. Unresolvable
//! references, multiple-definition ambiguities and similar soft conditions
//! are NOT errors; they go through the diagnostics collector instead.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for relpack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, wrong command context)
  User = 1,
  /// System error (I/O, malformed descriptor)
  System = 2,
  /// External build tool reported failure
  Build = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for relpack
#[derive(Debug)]
pub enum PackError {
  /// Configuration errors
  Config(ConfigError),

  /// Project descriptor errors
  Descriptor(DescriptorError),

  /// External build failures
  Build(BuildError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl PackError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    PackError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    PackError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// Categorized errors keep their category (and exit code) untouched.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      PackError::Message { message, context, help } => PackError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      other => other,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      PackError::Config(_) => ExitCode::User,
      PackError::Descriptor(_) => ExitCode::System,
      PackError::Build(_) => ExitCode::Build,
      PackError::Io(_) => ExitCode::System,
      PackError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      PackError::Config(e) => e.help_message(),
      PackError::Build(e) => e.help_message(),
      PackError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for PackError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PackError::Config(e) => write!(f, "{}", e),
      PackError::Descriptor(e) => write!(f, "{}", e),
      PackError::Build(e) => write!(f, "{}", e),
      PackError::Io(e) => write!(f, "I/O error: {}", e),
      PackError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for PackError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PackError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for PackError {
  fn from(err: io::Error) -> Self {
    PackError::Io(err)
  }
}

impl From<String> for PackError {
  fn from(msg: String) -> Self {
    PackError::message(msg)
  }
}

impl From<&str> for PackError {
  fn from(msg: &str) -> Self {
    PackError::message(msg)
  }
}

impl From<serde_json::Error> for PackError {
  fn from(err: serde_json::Error) -> Self {
    PackError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for PackError {
  fn from(err: semver::Error) -> Self {
    PackError::Config(ConfigError::InvalidVersion {
      message: err.to_string(),
    })
  }
}

impl From<xmltree::ParseError> for PackError {
  fn from(err: xmltree::ParseError) -> Self {
    PackError::Descriptor(DescriptorError::Unparsable {
      message: err.to_string(),
    })
  }
}

impl From<xmltree::Error> for PackError {
  fn from(err: xmltree::Error) -> Self {
    PackError::message(format!("XML write error: {}", err))
  }
}

impl From<zip::result::ZipError> for PackError {
  fn from(err: zip::result::ZipError) -> Self {
    PackError::message(format!("Zip error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for PackError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    PackError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// The release version argument did not parse as a semantic version
  InvalidVersion { message: String },

  /// Build tool path missing from the application config
  BuildToolNotConfigured,

  /// An operation was requested in the wrong run phase
  WrongPhase { expected: String, actual: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::InvalidVersion { .. } => {
        Some("Pass the release version as the first argument, e.g. `relpack pack 1.2.3`.".to_string())
      }
      ConfigError::BuildToolNotConfigured => Some(
        "Set build_tool_path in ~/.relpack/config.json (see `relpack setup --app-config`) or pass --build-tool."
          .to_string(),
      ),
      ConfigError::WrongPhase { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::InvalidVersion { message } => {
        write!(f, "Invalid release version: {}", message)
      }
      ConfigError::BuildToolNotConfigured => {
        write!(f, "Build tool path not configured.")
      }
      ConfigError::WrongPhase { expected, actual } => {
        write!(f, "Operation requires phase {}, but the run is in phase {}", expected, actual)
      }
    }
  }
}

/// Project descriptor errors
#[derive(Debug)]
pub enum DescriptorError {
  /// The descriptor is not a recognized document at all
  Unparsable { message: String },

  /// The descriptor parsed, but its root element is not a project
  UnsupportedFormat { path: PathBuf, root: String },
}

impl fmt::Display for DescriptorError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DescriptorError::Unparsable { message } => {
        write!(f, "Unparsable project descriptor: {}", message)
      }
      DescriptorError::UnsupportedFormat { path, root } => {
        write!(
          f,
          "Unsupported file format for {}; root node was {}.",
          path.display(),
          root
        )
      }
    }
  }
}

/// External build failures
#[derive(Debug)]
pub enum BuildError {
  /// The build tool exited with a nonzero code
  ToolFailed {
    descriptor: PathBuf,
    exit_code: i32,
  },

  /// The build tool could not be launched at all
  ToolNotLaunched { tool: PathBuf, message: String },
}

impl BuildError {
  fn help_message(&self) -> Option<String> {
    match self {
      BuildError::ToolNotLaunched { tool, .. } => Some(format!(
        "Check that the configured build tool exists and is executable: {}",
        tool.display()
      )),
      BuildError::ToolFailed { .. } => None,
    }
  }
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::ToolFailed { descriptor, exit_code } => {
        write!(
          f,
          "The build process exited with code {} for {}.",
          exit_code,
          descriptor.display()
        )
      }
      BuildError::ToolNotLaunched { tool, message } => {
        write!(f, "Failed to launch build tool {}: {}", tool.display(), message)
      }
    }
  }
}

/// Result type alias for relpack
pub type PackResult<T> = Result<T, PackError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> PackResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> PackResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<PackError>,
{
  fn context(self, ctx: impl Into<String>) -> PackResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> PackResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &PackError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

//! Release version handling
//!
//! Wraps `semver::Version` with the derived version strings that get stamped
//! into project descriptors.

use crate::core::error::{ConfigError, PackError, PackResult};
use std::fmt;

/// The version a release run is building
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion(semver::Version);

impl ReleaseVersion {
  /// Parse a release version from its command-line form
  pub fn parse(text: &str) -> PackResult<Self> {
    let version = semver::Version::parse(text).map_err(|e| {
      PackError::Config(ConfigError::InvalidVersion {
        message: format!("'{}': {}", text, e),
      })
    })?;
    Ok(ReleaseVersion(version))
  }

  /// Whether this release counts as a pre-release
  ///
  /// Anything below 1.0.0 is treated as pre-release, as is any version
  /// carrying a pre-release label.
  pub fn is_prerelease(&self) -> bool {
    self.0.major == 0 || !self.0.pre.is_empty()
  }

  /// The `AssemblyVersion` form: major.minor
  pub fn assembly_version(&self) -> String {
    format!("{}.{}", self.0.major, self.0.minor)
  }

  /// The `FileVersion` form: major.minor.patch.0
  pub fn file_version(&self) -> String {
    format!("{}.{}.{}.0", self.0.major, self.0.minor, self.0.patch)
  }
}

impl fmt::Display for ReleaseVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

//! Keyword templating for release notes and public-info text files
//!
//! Text between a pair of delimiters is treated as a keyword candidate.
//! Known keywords are expanded and their delimiter pair is consumed;
//! unknown segments pass through with the delimiters dropped.

use crate::core::version::ReleaseVersion;
use chrono::Utc;

/// Expand `VERSION`/`DATE`/`DATETIME` keywords in a templated file
pub fn expand_keywords(contents: &str, delimiter: char, version: &ReleaseVersion) -> String {
  let parts: Vec<&str> = contents.split(delimiter).collect();
  let mut result = String::with_capacity(contents.len());

  let mut i = 0;
  while i < parts.len() {
    let expanded = match parts[i] {
      "VERSION" => Some(version.to_string()),
      "DATE" => Some(Utc::now().format("%Y-%m-%d").to_string()),
      "DATETIME" => Some(Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()),
      _ => None,
    };

    match expanded {
      Some(value) => {
        result.push_str(&value);
        // The segment after a keyword is plain text; consume it so the
        // closing delimiter does not open a new candidate.
        if i + 1 < parts.len() {
          i += 1;
          result.push_str(parts[i]);
        }
      }
      None => result.push_str(parts[i]),
    }
    i += 1;
  }

  result
}

#[cfg(test)]
mod tests {
  use super::*;

  fn version() -> ReleaseVersion {
    ReleaseVersion::parse("2.3.1-beta").unwrap()
  }

  #[test]
  fn test_version_keyword_expansion() {
    let out = expand_keywords("Release $VERSION$ is out.", '$', &version());
    assert_eq!(out, "Release 2.3.1-beta is out.");
  }

  #[test]
  fn test_date_keyword_expansion() {
    let out = expand_keywords("Built on $DATE$.", '$', &version());
    let today = Utc::now().format("%Y-%m-%d").to_string();
    assert_eq!(out, format!("Built on {}.", today));
  }

  #[test]
  fn test_plain_text_untouched() {
    let out = expand_keywords("No keywords here.", '$', &version());
    assert_eq!(out, "No keywords here.");
  }

  #[test]
  fn test_unknown_segment_passes_through_without_delimiters() {
    let out = expand_keywords("a$b$c", '$', &version());
    assert_eq!(out, "abc");
  }

  #[test]
  fn test_alternate_delimiter() {
    let out = expand_keywords("v = %VERSION%", '%', &version());
    assert_eq!(out, "v = 2.3.1-beta");
  }
}

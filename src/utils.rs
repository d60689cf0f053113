//! Utility functions for file-name handling

/// File extension of a name, lowercased, including the leading dot
pub fn extension_of(file_name: &str) -> String {
  match file_name.rfind('.') {
    Some(idx) if idx > 0 => file_name[idx..].to_ascii_lowercase(),
    _ => String::new(),
  }
}

/// File name without its final extension
pub fn file_stem_of(file_name: &str) -> &str {
  match file_name.rfind('.') {
    Some(idx) if idx > 0 => &file_name[..idx],
    _ => file_name,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extension_of() {
    assert_eq!(extension_of("Lib.csproj"), ".csproj");
    assert_eq!(extension_of("archive.TAR"), ".tar");
    assert_eq!(extension_of("README"), "");
    assert_eq!(extension_of(".gitignore"), "");
  }

  #[test]
  fn test_file_stem_of() {
    assert_eq!(file_stem_of("Lib.csproj"), "Lib");
    assert_eq!(file_stem_of("README"), "README");
    assert_eq!(file_stem_of(".gitignore"), ".gitignore");
  }

}

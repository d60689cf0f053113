//! Subdirectory-sequence path algebra
//!
//! All identity computation works on sequences of folder names relative to a
//! scan root, with no separators implied. The same resolution routine serves
//! logical-name computation and project-reference decoding.

/// Resolve a relative reference string against a base subdirectory sequence
///
/// Splits the reference on both separator styles. `.` is a no-op, `..` pops
/// the working sequence. Popping an already empty sequence makes the
/// reference unresolvable: `None` is returned, never an error and never a
/// negative-depth path.
pub fn resolve_relative(base: &[String], reference: &str) -> Option<Vec<String>> {
  let mut path: Vec<String> = base.to_vec();

  for part in reference.split(['/', '\\']) {
    match part {
      "" | "." => {}
      ".." => {
        path.pop()?;
      }
      other => path.push(other.to_string()),
    }
  }

  Some(path)
}

/// The canonical identity form: every segment prefixed with "/"
pub fn identity<S: AsRef<str>>(segments: &[S]) -> String {
  let mut result = String::new();
  for segment in segments {
    result.push('/');
    result.push_str(segment.as_ref());
  }
  result
}

/// The logical name of a file: subdirectories joined with "/" plus file name
pub fn logical_name(sub_directories: &[String], file_name: &str) -> String {
  let mut result = String::new();
  for dir in sub_directories {
    result.push_str(dir);
    result.push('/');
  }
  result.push_str(file_name);
  result
}

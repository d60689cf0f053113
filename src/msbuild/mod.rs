//! MSBuild descriptor document handling
//!
//! Project descriptors, help-builder projects and the version stamp all go
//! through the same small DOM layer. Elements are matched by local name so
//! both namespaced legacy documents and SDK-style documents work.

use crate::core::error::{DescriptorError, PackError, PackResult, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};
use xmltree::{Element, XMLNode};

/// Property-group children that mark the descriptive metadata group
const METADATA_MARKERS: [&str; 3] = ["Title", "Description", "HelpTitle"];

/// Load a descriptor document and verify its root element
pub fn load_descriptor(path: &Path) -> PackResult<Element> {
  let content = fs::read(path).with_context(|| format!("Failed to read descriptor {}", path.display()))?;
  let root = Element::parse(content.as_slice())
    .map_err(PackError::from)
    .with_context(|| format!("Failed to parse descriptor {}", path.display()))?;

  if root.name != "Project" {
    return Err(PackError::Descriptor(DescriptorError::UnsupportedFormat {
      path: path.to_path_buf(),
      root: root.name,
    }));
  }

  Ok(root)
}

/// Write a descriptor document to a file
pub fn save_descriptor(root: &Element, path: &Path) -> PackResult<()> {
  let file = fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
  root
    .write(file)
    .map_err(PackError::from)
    .with_context(|| format!("Failed to write descriptor {}", path.display()))
}

/// Concatenated text content of an element
pub fn text_of(element: &Element) -> String {
  let mut text = String::new();
  for child in &element.children {
    match child {
      XMLNode::Text(t) => text.push_str(t),
      XMLNode::CData(t) => text.push_str(t),
      _ => {}
    }
  }
  text
}

/// Replace the text content of an element
pub fn set_text(element: &mut Element, value: &str) {
  element.children.clear();
  element.children.push(XMLNode::Text(value.to_string()));
}

/// Create an element carrying the same namespace binding as a sibling
pub fn element_like(prototype: &Element, name: &str) -> Element {
  let mut element = Element::new(name);
  element.prefix = prototype.prefix.clone();
  element.namespace = prototype.namespace.clone();
  element
}

/// Child elements with the given local name
pub fn children_named<'a>(parent: &'a Element, name: &str) -> impl Iterator<Item = &'a Element> {
  parent
    .children
    .iter()
    .filter_map(XMLNode::as_element)
    .filter(move |e| e.name == name)
}

/// Text values of `Project/PropertyGroup/<name>` elements, in document order
pub fn property_values(root: &Element, name: &str) -> Vec<String> {
  let mut values = Vec::new();
  for group in children_named(root, "PropertyGroup") {
    for element in children_named(group, name) {
      values.push(text_of(element));
    }
  }
  values
}

/// Set `Project/PropertyGroup/<name>` to a value
///
/// Every existing element of that name is overwritten. When none exists, the
/// element is appended to the first property group carrying descriptive
/// metadata, or to a newly appended group.
pub fn write_metadata_element(root: &mut Element, name: &str, value: &str) {
  let mut found = false;
  for node in &mut root.children {
    if let XMLNode::Element(group) = node
      && group.name == "PropertyGroup"
    {
      for child in &mut group.children {
        if let XMLNode::Element(element) = child
          && element.name == name
        {
          set_text(element, value);
          found = true;
        }
      }
    }
  }
  if found {
    return;
  }

  let mut new_child = element_like(root, name);
  set_text(&mut new_child, value);

  for node in &mut root.children {
    if let XMLNode::Element(group) = node
      && group.name == "PropertyGroup"
      && METADATA_MARKERS.iter().any(|m| children_named(group, m).next().is_some())
    {
      group.children.push(XMLNode::Element(new_child));
      return;
    }
  }

  let mut new_group = element_like(root, "PropertyGroup");
  new_group.children.push(XMLNode::Element(new_child));
  root.children.push(XMLNode::Element(new_group));
}

/// A descriptor backed up aside before an in-place rewrite
///
/// Acquiring the backup copies the original; [`Backup::restore`] puts it
/// back and removes the copy. Teardown restores every backup it reached;
/// there is no cross-file transaction.
#[derive(Debug)]
pub struct Backup {
  original: PathBuf,
  backup: PathBuf,
}

impl Backup {
  /// Copy `path` aside, returning the guard for later restoration
  pub fn create(path: &Path) -> PackResult<Self> {
    let backup = backup_path(path);
    fs::copy(path, &backup).with_context(|| format!("Failed to back up {}", path.display()))?;
    Ok(Self {
      original: path.to_path_buf(),
      backup,
    })
  }

  /// Put the original back in place and drop the backup copy
  pub fn restore(self) -> PackResult<()> {
    fs::remove_file(&self.original).with_context(|| format!("Failed to remove rewritten {}", self.original.display()))?;
    fs::rename(&self.backup, &self.original)
      .with_context(|| format!("Failed to restore backup {}", self.backup.display()))
  }
}

fn backup_path(path: &Path) -> PathBuf {
  let mut name = path.as_os_str().to_os_string();
  name.push(".bak");
  PathBuf::from(name)
}

//! Sample-project reference rewriting
//!
//! When sample code ships in a binary release, references to projects whose
//! sources are not shipped alongside are converted from project references
//! into binary references against the built output assemblies. One binary
//! reference is synthesized per target framework of the sample project, in
//! document order, replacing the original reference node.

use crate::core::diagnostics::Diagnostics;
use crate::model::project::ProjectOutputInfo;
use crate::msbuild;
use crate::scan::path as scan_path;
use std::collections::{BTreeMap, BTreeSet};
use xmltree::{Element, XMLNode};

/// Rewrite the `ProjectReference` nodes of a sample descriptor document
///
/// `local_path` is the sample project's full subdirectory chain,
/// `shipped_sources` the identities packaged with the samples, and
/// `built_outputs` the identity → output lookup from the primary scan.
pub fn rewrite_project_references(
  root: &mut Element,
  identity: &str,
  local_path: &[String],
  own_frameworks: &[String],
  shipped_sources: &BTreeSet<String>,
  built_outputs: &BTreeMap<String, ProjectOutputInfo>,
  diagnostics: &mut Diagnostics,
) {
  for node in &mut root.children {
    let XMLNode::Element(group) = node else { continue };
    if group.name != "ItemGroup" {
      continue;
    }

    let mut i = 0;
    while i < group.children.len() {
      let replacements = group.children[i].as_element().and_then(|element| {
        rewrite_one(
          element,
          identity,
          local_path,
          own_frameworks,
          shipped_sources,
          built_outputs,
          diagnostics,
        )
      });

      match replacements {
        Some(new_elements) => {
          let count = new_elements.len();
          group.children.splice(i..i + 1, new_elements.into_iter().map(XMLNode::Element));
          i += count;
        }
        None => i += 1,
      }
    }
  }
}

/// Decide the replacement for a single item; `None` leaves the node as-is
fn rewrite_one(
  element: &Element,
  identity: &str,
  local_path: &[String],
  own_frameworks: &[String],
  shipped_sources: &BTreeSet<String>,
  built_outputs: &BTreeMap<String, ProjectOutputInfo>,
  diagnostics: &mut Diagnostics,
) -> Option<Vec<Element>> {
  if element.name != "ProjectReference" {
    return None;
  }
  let raw_path = element.attributes.get("Include").map(String::as_str).unwrap_or_default();
  if raw_path.is_empty() {
    return None;
  }

  let Some(resolved) = scan_path::resolve_relative(local_path, raw_path) else {
    diagnostics.problem(format!(
      "Unresolvable project reference '{}' in {}; leaving it untouched.",
      raw_path, identity
    ));
    return None;
  };
  let referenced_id = scan_path::identity(&resolved);

  // Both sides ship as sources: nothing to rewrite.
  if shipped_sources.contains(&referenced_id) {
    return None;
  }

  let Some(output) = built_outputs.get(&referenced_id) else {
    diagnostics.problem(format!(
      "Project {} references {}, which is neither packaged nor a known build output.",
      identity, referenced_id
    ));
    return None;
  };

  let Some(assembly_name) = output.assembly_name.as_deref() else {
    diagnostics.problem(format!(
      "Project {} references {}, whose assembly name is unknown; leaving the reference untouched.",
      identity, referenced_id
    ));
    return None;
  };

  if own_frameworks.is_empty() {
    diagnostics.problem(format!(
      "Project {} declares no target frameworks; cannot rewrite its reference to {}.",
      identity, referenced_id
    ));
    return None;
  }

  let mut new_elements = Vec::with_capacity(own_frameworks.len());
  for target in own_frameworks {
    let mut reference = msbuild::element_like(element, "Reference");
    if own_frameworks.len() > 1 {
      reference
        .attributes
        .insert("Condition".to_string(), format!("'$(TargetFramework)' == '{}'", target));
    }
    reference.attributes.insert("Include".to_string(), assembly_name.to_string());

    // One marker per segment of the project identity: the sample sources sit
    // that many levels below the binary archive root.
    let mut hint_path = "../".repeat(local_path.len() + 1);
    if output.target_frameworks.iter().any(|t| t == target) {
      if output.target_frameworks.len() > 1 {
        hint_path.push_str(target);
        hint_path.push('/');
      }
    } else {
      diagnostics.problem(format!(
        "Project {} targets {}, but references project {} that does not support that target.",
        identity, target, output.identity
      ));
    }
    hint_path.push_str(assembly_name);
    hint_path.push_str(".dll");

    let mut hint_element = msbuild::element_like(element, "HintPath");
    msbuild::set_text(&mut hint_element, &hint_path);
    reference.children.push(XMLNode::Element(hint_element));

    new_elements.push(reference);
  }

  Some(new_elements)
}

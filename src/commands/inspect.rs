//! The `inspect` command: discovery and analysis inventory

use crate::commands::pack::build_context;
use crate::core::diagnostics::MessageKind;
use crate::core::error::PackResult;
use crate::model::file::FileKind;
use crate::model::tree::ProjectTree;
use std::path::PathBuf;

pub fn run_inspect(version: String, config_file: Option<PathBuf>, directory: Option<PathBuf>) -> PackResult<()> {
  let mut ctx = build_context(&version, config_file, directory, None)?;

  let mut tree = ProjectTree::new();
  let result = tree.find_contents(&mut ctx).and_then(|_| tree.analyze_contents(&mut ctx));

  match &result {
    Ok(_) => print_inventory(&tree),
    Err(err) => ctx.diagnostics.report(MessageKind::Failure, err.to_string()),
  }
  ctx.diagnostics.print_summary();
  result
}

fn print_inventory(tree: &ProjectTree) {
  println!("Modules ({}):", tree.modules().modules().len());
  for module in tree.modules().modules() {
    println!(
      "  {} ({}, {} file(s))",
      module.name(),
      module.folder().display(),
      module.files().len()
    );
    for project in module.all_projects() {
      let assembly = project.assembly_name.as_deref().unwrap_or("<ambiguous>");
      println!(
        "    {}: {} -> {} [{}]",
        project.project_name,
        project.identity,
        assembly,
        project.target_frameworks.join(", ")
      );
    }
  }

  println!("Solutions ({}):", tree.solutions().file_count());
  for file in tree.solutions().files() {
    if let FileKind::Solution(state) = file.kind() {
      println!("  {} ({} project(s))", file.logical_name(), state.included_projects.len());
    }
  }

  println!("Release notes: {}", tree.release_notes().file_count());
  println!("Help sources:  {}", tree.help_sources().file_count());
  println!("Key files:     {}", tree.key_files().file_count());
}

//! Archive assembly
//!
//! The model side flattens collections into an ordered manifest of
//! (source path, entry name) pairs; this module turns a manifest into a
//! single archive file. Entry names always use forward slashes.

use crate::core::config::ArchiveKind;
use crate::core::error::{PackResult, ResultExt};
use crate::core::version::ReleaseVersion;
use crate::ui::progress::PackProgress;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

/// One archive entry: where the bytes live and what the entry is called
pub type ManifestEntry = (PathBuf, String);

/// Release archive file name: `<name>-<version><extension>`
pub fn archive_file_name(name: &str, version: &ReleaseVersion, kind: ArchiveKind) -> String {
  format!("{}-{}{}", name, version, kind.file_extension())
}

/// Write a complete archive from an ordered manifest
pub fn pack_archive(path: &Path, kind: ArchiveKind, manifest: &[ManifestEntry]) -> PackResult<()> {
  let mut progress = PackProgress::new(manifest.len(), path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default());

  match kind {
    ArchiveKind::Zip => pack_zip(path, manifest, &mut progress),
    ArchiveKind::TarGz => pack_tar_gz(path, manifest, &mut progress),
  }
}

fn pack_zip(path: &Path, manifest: &[ManifestEntry], progress: &mut PackProgress) -> PackResult<()> {
  let file = File::create(path).with_context(|| format!("Failed to create archive {}", path.display()))?;
  let mut writer = zip::ZipWriter::new(file);
  let options = SimpleFileOptions::default();

  for (source, entry_name) in manifest {
    writer
      .start_file(entry_name.as_str(), options)
      .with_context(|| format!("Failed to start entry {}", entry_name))?;
    let mut source_file =
      File::open(source).with_context(|| format!("Failed to open {} for archiving", source.display()))?;
    io::copy(&mut source_file, &mut writer).with_context(|| format!("Failed to archive {}", source.display()))?;
    progress.inc();
  }

  writer.finish().with_context(|| format!("Failed to finish archive {}", path.display()))?;
  Ok(())
}

fn pack_tar_gz(path: &Path, manifest: &[ManifestEntry], progress: &mut PackProgress) -> PackResult<()> {
  let file = File::create(path).with_context(|| format!("Failed to create archive {}", path.display()))?;
  let encoder = GzEncoder::new(file, Compression::default());
  let mut builder = tar::Builder::new(encoder);

  for (source, entry_name) in manifest {
    builder
      .append_path_with_name(source, entry_name)
      .with_context(|| format!("Failed to archive {}", source.display()))?;
    progress.inc();
  }

  let encoder = builder
    .into_inner()
    .with_context(|| format!("Failed to finish archive {}", path.display()))?;
  encoder
    .finish()
    .with_context(|| format!("Failed to finish archive {}", path.display()))?;
  Ok(())
}

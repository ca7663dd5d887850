//! Input directory scanning.
//!
//! The input directory is expected to be flat: each entry is either a binary
//! whose name encodes its target, or a directory named after the target that
//! holds exactly one binary. Entries whose names carry no target are logged
//! and skipped.

use crate::error::{ReleaserError, Result};
use crate::platform::{Target, classify};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use std::fs;

/// A binary found in the input directory together with its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryArtifact {
    /// Path of the binary to copy into the platform package.
    pub source_path: Utf8PathBuf,
    /// Name of the scanned entry the target was read from.
    pub file_name: String,
    /// The platform/architecture pair parsed from `file_name`.
    pub target: Target,
}

/// Scan `input_dir` for platform binaries, in file-name order.
///
/// # Errors
///
/// Returns [`ReleaserError::ScanFailed`] if a directory cannot be read,
/// [`ReleaserError::AmbiguousBinaryDirectory`] if a target subdirectory holds
/// more than one file, and [`ReleaserError::NoBinariesFound`] if nothing in
/// the directory could be classified.
pub fn scan_input_dir(input_dir: &Utf8Path) -> Result<Vec<BinaryArtifact>> {
    let mut artifacts = Vec::new();

    for entry in sorted_entries(input_dir)? {
        debug!("checking file {}", entry.file_name);
        let Some(target) = classify(&entry.file_name) else {
            warn!("no os/arch found for {}", entry.file_name);
            continue;
        };

        let source_path = if entry.is_dir {
            match single_file_in_dir(&entry.path)? {
                Some(path) => path,
                None => {
                    warn!("could not find bin file in dir {}", entry.path);
                    continue;
                }
            }
        } else {
            entry.path
        };

        debug!("found {target} binary at {source_path}");
        artifacts.push(BinaryArtifact {
            source_path,
            file_name: entry.file_name,
            target,
        });
    }

    if artifacts.is_empty() {
        return Err(ReleaserError::NoBinariesFound {
            input_dir: input_dir.to_owned(),
        });
    }
    Ok(artifacts)
}

struct ScannedEntry {
    path: Utf8PathBuf,
    file_name: String,
    is_dir: bool,
}

fn sorted_entries(dir: &Utf8Path) -> Result<Vec<ScannedEntry>> {
    let scan_failed = |source| ReleaserError::ScanFailed {
        path: dir.to_owned(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(scan_failed)? {
        let entry = entry.map_err(scan_failed)?;
        let Ok(file_name) = entry.file_name().into_string() else {
            warn!("skipping non UTF-8 entry in {dir}");
            continue;
        };
        let path = dir.join(&file_name);
        entries.push(ScannedEntry {
            is_dir: path.is_dir(),
            path,
            file_name,
        });
    }
    entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(entries)
}

/// Resolve the binary inside a target subdirectory.
///
/// Nested directories are ignored. Returns `Ok(None)` when the directory holds
/// no files.
fn single_file_in_dir(dir: &Utf8Path) -> Result<Option<Utf8PathBuf>> {
    let files: Vec<ScannedEntry> = sorted_entries(dir)?
        .into_iter()
        .filter(|entry| !entry.is_dir)
        .collect();

    match files.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(only.path.clone())),
        many => Err(ReleaserError::AmbiguousBinaryDirectory {
            dir: dir.to_owned(),
            candidates: many
                .iter()
                .map(|entry| entry.file_name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

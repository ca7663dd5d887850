//! Filesystem writer for generated packages.
//!
//! The output directory is replaced wholesale on every run: an existing
//! directory is removed and recreated before any package is written. A failure
//! part-way through leaves whatever was already written in place.

use crate::error::{ReleaserError, Result};
use crate::package_set::{
    DispatcherPackage, LAUNCHER_FILE_NAME, MANIFEST_FILE_NAME, PackageSet, PlatformPackage,
};
use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use serde::Serialize;
use std::fs;

/// Launcher script shipped in every dispatcher package.
pub const LAUNCHER_SCRIPT: &str = include_str!("../templates/run.js");

/// Directories produced by [`write_package_set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPackages {
    /// One directory per platform package, in package-set order.
    pub platform_dirs: Vec<Utf8PathBuf>,
    /// The dispatcher package directory.
    pub dispatcher_dir: Utf8PathBuf,
}

impl WrittenPackages {
    /// Package directories in publish order: platform packages first, so the
    /// dispatcher's optional dependencies exist before it is published.
    pub fn publish_order(&self) -> impl Iterator<Item = &Utf8Path> {
        self.platform_dirs
            .iter()
            .map(Utf8PathBuf::as_path)
            .chain(std::iter::once(self.dispatcher_dir.as_path()))
    }
}

/// Remove `output_dir` if it exists and create it afresh.
///
/// # Errors
///
/// Returns [`ReleaserError::OutputDirectory`] if the directory cannot be
/// removed or created.
pub fn prepare_output_dir(output_dir: &Utf8Path) -> Result<()> {
    let output_error = |source| ReleaserError::OutputDirectory {
        path: output_dir.to_owned(),
        source,
    };

    if output_dir.exists() {
        fs::remove_dir_all(output_dir).map_err(output_error)?;
    }
    fs::create_dir_all(output_dir).map_err(output_error)
}

/// Write every package in `set` under a freshly prepared `output_dir`.
///
/// # Errors
///
/// Returns [`ReleaserError::OutputDirectory`] if the output directory cannot
/// be prepared, [`ReleaserError::WriteFailed`] or
/// [`ReleaserError::CopyFailed`] if a package cannot be written, and
/// [`ReleaserError::Serialization`] if a manifest cannot be encoded.
pub fn write_package_set(output_dir: &Utf8Path, set: &PackageSet) -> Result<WrittenPackages> {
    info!("creating output directory: {output_dir}");
    prepare_output_dir(output_dir)?;

    let platform_dirs = set
        .platform_packages
        .iter()
        .map(|package| write_platform_package(output_dir, package))
        .collect::<Result<Vec<_>>>()?;
    let dispatcher_dir = write_dispatcher_package(output_dir, &set.dispatcher)?;

    Ok(WrittenPackages {
        platform_dirs,
        dispatcher_dir,
    })
}

fn write_platform_package(output_dir: &Utf8Path, package: &PlatformPackage) -> Result<Utf8PathBuf> {
    let name = package.full_name();
    let dir = output_dir.join(&package.dir_name);
    info!("[{name}] creating package at {dir}");
    create_package_dir(&dir)?;

    info!("[{name}] creating {MANIFEST_FILE_NAME}");
    write_manifest(&dir, &package.manifest)?;

    info!("[{name}] copying binary file to {}", package.binary_file_name);
    let from = &package.artifact.source_path;
    let to = dir.join(&package.binary_file_name);
    fs::copy(from, &to).map_err(|source| ReleaserError::CopyFailed {
        from: from.clone(),
        to,
        source,
    })?;

    Ok(dir)
}

fn write_dispatcher_package(
    output_dir: &Utf8Path,
    package: &DispatcherPackage,
) -> Result<Utf8PathBuf> {
    let name = package.full_name();
    let dir = output_dir.join(&package.dir_name);
    info!("[{name}] creating main package at {dir}");
    create_package_dir(&dir)?;

    info!("[{name}] creating {MANIFEST_FILE_NAME}");
    write_manifest(&dir, &package.manifest)?;

    info!("[{name}] creating {LAUNCHER_FILE_NAME}");
    let launcher = dir.join(LAUNCHER_FILE_NAME);
    write_file(&launcher, LAUNCHER_SCRIPT)?;
    make_executable(&launcher)?;

    Ok(dir)
}

fn create_package_dir(dir: &Utf8Path) -> Result<()> {
    fs::create_dir(dir).map_err(|source| ReleaserError::WriteFailed {
        path: dir.to_owned(),
        source,
    })
}

/// Write `manifest` as two-space indented JSON with a trailing newline.
fn write_manifest(dir: &Utf8Path, manifest: &impl Serialize) -> Result<()> {
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    write_file(&dir.join(MANIFEST_FILE_NAME), &json)
}

fn write_file(path: &Utf8Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| ReleaserError::WriteFailed {
        path: path.to_owned(),
        source,
    })
}

#[cfg(unix)]
fn make_executable(path: &Utf8Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|source| {
        ReleaserError::WriteFailed {
            path: path.to_owned(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn make_executable(_path: &Utf8Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;

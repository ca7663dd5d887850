//! End-to-end release flow.
//!
//! Scans the input directory, builds the package set, writes it to disk and,
//! when requested, publishes every package. All validation and scanning
//! happens before the output directory is touched, so a run that finds
//! nothing to package leaves the filesystem unchanged.

use crate::config::ReleaseRequest;
use crate::error::Result;
use crate::package_set::build_package_set;
use crate::publish::{Publisher, ensure_credential_file, publish_all};
use crate::scanner::scan_input_dir;
use crate::writer::{WrittenPackages, write_package_set};
use camino::{Utf8Path, Utf8PathBuf};
use log::info;

/// What a release run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// Directory the binaries were read from.
    pub input_dir: Utf8PathBuf,
    /// Package directories written to the output directory.
    pub packages: WrittenPackages,
    /// Credential file created for publishing, if one was needed.
    pub credential_file: Option<Utf8PathBuf>,
    /// Number of packages published; zero when publishing is disabled.
    pub published: usize,
}

/// Run a release for `request`.
///
/// `working_dir` is where the registry credential file is created when
/// publishing.
///
/// # Errors
///
/// Returns the first error raised by validation, scanning, package
/// construction, writing or publishing. Packages written before a failure
/// stay on disk, and packages published before a failure stay published.
pub fn run_release(
    request: &ReleaseRequest,
    publisher: &dyn Publisher,
    working_dir: &Utf8Path,
) -> Result<ReleaseOutcome> {
    request.validate()?;
    info!(
        "creating release {} for {} ({})",
        request.package_version,
        request.package_name(),
        request.name
    );

    let input_dir = request.resolve_input_dir()?;
    info!("reading binary files from: {input_dir}");
    let artifacts = scan_input_dir(&input_dir)?;
    let set = build_package_set(request, &artifacts)?;
    let packages = write_package_set(&request.output_path, &set)?;

    if !request.publish {
        info!("skipping npm publish step");
        return Ok(ReleaseOutcome {
            input_dir,
            packages,
            credential_file: None,
            published: 0,
        });
    }

    let credential_file = ensure_credential_file(working_dir, &request.publish_registry)?;
    let published = publish_all(publisher, packages.publish_order())?;
    info!("done.");

    Ok(ReleaseOutcome {
        input_dir,
        packages,
        credential_file,
        published,
    })
}

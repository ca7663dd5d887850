//! Package set construction.
//!
//! Turns classified binaries into one platform package each plus the
//! dispatcher package that depends on all of them. Naming follows
//! `{prefix}{packageName}-{platform}-{arch}` for platform packages and
//! `{prefix}{packageName}` for the dispatcher; directory names on disk never
//! carry the prefix.

use crate::config::ReleaseRequest;
use crate::error::{ReleaserError, Result};
use crate::manifest::{DispatcherManifest, PlatformManifest, PublishConfig};
use crate::scanner::BinaryArtifact;
use std::collections::{BTreeMap, HashMap};

/// File name of every generated manifest.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// File name of the dispatcher's launcher script.
pub const LAUNCHER_FILE_NAME: &str = "run.js";

/// A package wrapping one platform binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformPackage {
    /// Directory name under the output directory (unprefixed).
    pub dir_name: String,
    /// Binary file name inside the package; `.exe`-suffixed on Windows.
    pub binary_file_name: String,
    /// The binary this package ships.
    pub artifact: BinaryArtifact,
    /// The package's `package.json`.
    pub manifest: PlatformManifest,
}

impl PlatformPackage {
    /// Published package name, including the prefix.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.manifest.name
    }
}

/// The package users install, which pulls in the right platform package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherPackage {
    /// Directory name under the output directory.
    pub dir_name: String,
    /// The package's `package.json`.
    pub manifest: DispatcherManifest,
}

impl DispatcherPackage {
    /// Published package name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.manifest.name
    }
}

/// Every package produced by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSet {
    /// Platform packages in scan order.
    pub platform_packages: Vec<PlatformPackage>,
    /// The dispatcher package.
    pub dispatcher: DispatcherPackage,
}

/// Build the package set for `artifacts`.
///
/// # Errors
///
/// Returns [`ReleaserError::MissingVersion`] or
/// [`ReleaserError::MissingBinaryName`] for an incomplete request,
/// [`ReleaserError::EmptyArtifactSet`] when `artifacts` is empty, and
/// [`ReleaserError::DuplicateTarget`] when two artifacts share a target.
///
/// # Examples
///
/// ```
/// use npm_binary_releaser::cli::ReleaseArgs;
/// use npm_binary_releaser::config::{CiEnvironment, FileConfig, resolve};
/// use npm_binary_releaser::package_set::build_package_set;
/// use npm_binary_releaser::platform::Target;
/// use npm_binary_releaser::scanner::BinaryArtifact;
///
/// let args = ReleaseArgs {
///     name: Some("tool".to_owned()),
///     package_version: Some("1.0.0".to_owned()),
///     package_name_prefix: Some("@acme/".to_owned()),
///     ..ReleaseArgs::default()
/// };
/// let request = resolve(&args, FileConfig::default(), &CiEnvironment::default());
/// let artifacts = vec![BinaryArtifact {
///     source_path: "bin/tool_windows_amd64.exe".into(),
///     file_name: "tool_windows_amd64.exe".to_owned(),
///     target: Target::new("win32", "x64"),
/// }];
///
/// let set = build_package_set(&request, &artifacts)?;
/// let windows = set.platform_packages.first().expect("one platform package");
/// assert_eq!(windows.full_name(), "@acme/tool-win32-x64");
/// assert_eq!(windows.binary_file_name, "tool-win32-x64.exe");
/// assert_eq!(set.dispatcher.full_name(), "@acme/tool");
/// # Ok::<(), npm_binary_releaser::error::ReleaserError>(())
/// ```
pub fn build_package_set(
    request: &ReleaseRequest,
    artifacts: &[BinaryArtifact],
) -> Result<PackageSet> {
    request.validate()?;
    if artifacts.is_empty() {
        return Err(ReleaserError::EmptyArtifactSet);
    }
    reject_duplicate_targets(artifacts)?;

    let platform_packages: Vec<PlatformPackage> = artifacts
        .iter()
        .map(|artifact| platform_package(request, artifact))
        .collect();

    let optional_dependencies = platform_packages
        .iter()
        .map(|package| {
            (
                package.full_name().to_owned(),
                request.package_version.clone(),
            )
        })
        .collect();

    Ok(PackageSet {
        dispatcher: dispatcher_package(request, optional_dependencies),
        platform_packages,
    })
}

fn reject_duplicate_targets(artifacts: &[BinaryArtifact]) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for artifact in artifacts {
        let target = artifact.target.to_string();
        if let Some(first) = seen.get(&target) {
            return Err(ReleaserError::DuplicateTarget {
                target,
                first: (*first).to_owned(),
                second: artifact.file_name.clone(),
            });
        }
        seen.insert(target, &artifact.file_name);
    }
    Ok(())
}

fn platform_package(request: &ReleaseRequest, artifact: &BinaryArtifact) -> PlatformPackage {
    let target = &artifact.target;
    let dir_name = format!("{}-{target}", request.package_name());
    let full_name = format!("{}{dir_name}", request.package_name_prefix);
    let binary_file_name = if target.is_windows() {
        format!("{dir_name}.exe")
    } else {
        dir_name.clone()
    };

    let manifest = PlatformManifest {
        name: full_name,
        version: request.package_version.clone(),
        metadata: request.metadata.clone(),
        os: vec![target.platform().to_owned()],
        cpu: vec![target.arch().to_owned()],
        main: binary_file_name.clone(),
        files: vec![binary_file_name.clone()],
        prefer_unplugged: true,
        publish_config: PublishConfig::public(&request.publish_registry),
    };

    PlatformPackage {
        dir_name,
        binary_file_name,
        artifact: artifact.clone(),
        manifest,
    }
}

fn dispatcher_package(
    request: &ReleaseRequest,
    optional_dependencies: BTreeMap<String, String>,
) -> DispatcherPackage {
    let strip_prefix =
        request.no_prefix_for_main_package && !request.package_name_prefix.is_empty();
    let (name, bin_pkg_prefix) = if strip_prefix {
        (
            request.package_name().to_owned(),
            Some(request.package_name_prefix.clone()),
        )
    } else {
        (
            format!("{}{}", request.package_name_prefix, request.package_name()),
            None,
        )
    };

    let manifest = DispatcherManifest {
        name,
        version: request.package_version.clone(),
        metadata: request.metadata.clone(),
        bin_pkg_prefix,
        bin: BTreeMap::from([(request.name.clone(), format!("./{LAUNCHER_FILE_NAME}"))]),
        files: vec![LAUNCHER_FILE_NAME.to_owned()],
        optional_dependencies,
        publish_config: PublishConfig::public(&request.publish_registry),
    };

    DispatcherPackage {
        dir_name: request.package_name().to_owned(),
        manifest,
    }
}

#[cfg(test)]
#[path = "package_set_tests.rs"]
mod tests;

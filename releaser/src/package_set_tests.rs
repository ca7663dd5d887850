//! Unit tests for package set construction.

use super::*;
use crate::cli::ReleaseArgs;
use crate::config::{CiEnvironment, FileConfig, resolve};
use crate::platform::Target;
use rstest::{fixture, rstest};

fn artifact(file_name: &str, platform: &str, arch: &str) -> BinaryArtifact {
    BinaryArtifact {
        source_path: format!("bin/{file_name}").into(),
        file_name: file_name.to_owned(),
        target: Target::new(platform, arch),
    }
}

fn request_with(prefix: &str, no_prefix_for_main_package: bool) -> ReleaseRequest {
    let args = ReleaseArgs {
        name: Some("tool".to_owned()),
        package_version: Some("2.1.0".to_owned()),
        package_name_prefix: Some(prefix.to_owned()),
        license: Some("MIT".to_owned()),
        no_prefix_for_main_package,
        ..ReleaseArgs::default()
    };
    resolve(&args, FileConfig::default(), &CiEnvironment::default())
}

#[fixture]
fn request() -> ReleaseRequest {
    request_with("@acme/", false)
}

#[fixture]
fn artifacts() -> Vec<BinaryArtifact> {
    vec![
        artifact("tool_darwin_arm64", "darwin", "arm64"),
        artifact("tool_linux_amd64", "linux", "x64"),
        artifact("tool_windows_386.exe", "win32", "ia32"),
    ]
}

#[rstest]
fn one_platform_package_per_artifact(request: ReleaseRequest, artifacts: Vec<BinaryArtifact>) {
    let set = build_package_set(&request, &artifacts).expect("package set builds");

    let names: Vec<&str> = set.platform_packages.iter().map(PlatformPackage::full_name).collect();
    assert_eq!(
        names,
        vec!["@acme/tool-darwin-arm64", "@acme/tool-linux-x64", "@acme/tool-win32-ia32"]
    );
    assert_eq!(set.dispatcher.manifest.optional_dependencies.len(), 3);
    assert!(
        set.dispatcher
            .manifest
            .optional_dependencies
            .iter()
            .all(|(name, version)| version == "2.1.0" && names.contains(&name.as_str()))
    );
}

#[rstest]
fn only_windows_binaries_get_exe_suffix(request: ReleaseRequest, artifacts: Vec<BinaryArtifact>) {
    let set = build_package_set(&request, &artifacts).expect("package set builds");

    for package in &set.platform_packages {
        let is_windows = package.artifact.target.is_windows();
        assert_eq!(package.binary_file_name.ends_with(".exe"), is_windows);
        assert_eq!(package.manifest.main, package.binary_file_name);
        assert_eq!(package.manifest.files, vec![package.binary_file_name.clone()]);
    }
}

#[rstest]
fn platform_manifest_restricts_os_and_cpu(
    request: ReleaseRequest,
    artifacts: Vec<BinaryArtifact>,
) {
    let set = build_package_set(&request, &artifacts).expect("package set builds");
    let linux = set.platform_packages.get(1).expect("linux package");

    assert_eq!(linux.dir_name, "tool-linux-x64");
    assert_eq!(linux.manifest.os, vec!["linux"]);
    assert_eq!(linux.manifest.cpu, vec!["x64"]);
    assert!(linux.manifest.prefer_unplugged);
    assert_eq!(linux.manifest.metadata.license, "MIT");
    assert_eq!(linux.manifest.publish_config.access, "public");
    assert_eq!(
        linux.manifest.publish_config.registry,
        "https://registry.npmjs.org/"
    );
}

#[rstest]
fn dispatcher_carries_prefix_by_default(request: ReleaseRequest, artifacts: Vec<BinaryArtifact>) {
    let set = build_package_set(&request, &artifacts).expect("package set builds");

    assert_eq!(set.dispatcher.full_name(), "@acme/tool");
    assert_eq!(set.dispatcher.dir_name, "tool");
    assert_eq!(set.dispatcher.manifest.bin_pkg_prefix, None);
    assert_eq!(
        set.dispatcher.manifest.bin.get("tool").map(String::as_str),
        Some("./run.js")
    );
    assert_eq!(set.dispatcher.manifest.files, vec!["run.js"]);
}

#[rstest]
fn no_prefix_for_main_package_records_stripped_prefix(artifacts: Vec<BinaryArtifact>) {
    let request = request_with("@acme/", true);
    let set = build_package_set(&request, &artifacts).expect("package set builds");

    assert_eq!(set.dispatcher.full_name(), "tool");
    assert_eq!(set.dispatcher.manifest.bin_pkg_prefix.as_deref(), Some("@acme/"));
    assert!(
        set.platform_packages
            .iter()
            .all(|package| package.full_name().starts_with("@acme/tool-"))
    );
}

#[rstest]
fn no_prefix_flag_without_prefix_is_a_no_op(artifacts: Vec<BinaryArtifact>) {
    let request = request_with("", true);
    let set = build_package_set(&request, &artifacts).expect("package set builds");

    assert_eq!(set.dispatcher.full_name(), "tool");
    assert_eq!(set.dispatcher.manifest.bin_pkg_prefix, None);
}

#[rstest]
fn package_name_overrides_binary_name_in_package_names(artifacts: Vec<BinaryArtifact>) {
    let args = ReleaseArgs {
        name: Some("tool".to_owned()),
        package_name: Some("tool-cli".to_owned()),
        package_version: Some("1.0.0".to_owned()),
        ..ReleaseArgs::default()
    };
    let request = resolve(&args, FileConfig::default(), &CiEnvironment::default());
    let set = build_package_set(&request, &artifacts).expect("package set builds");

    assert_eq!(set.dispatcher.full_name(), "tool-cli");
    assert!(set.dispatcher.manifest.bin.contains_key("tool"));
    let darwin = set.platform_packages.first().expect("darwin package");
    assert_eq!(darwin.full_name(), "tool-cli-darwin-arm64");
}

#[rstest]
fn empty_package_name_falls_back_to_binary_name(artifacts: Vec<BinaryArtifact>) {
    let request = ReleaseRequest {
        package_name: String::new(),
        ..request_with("", false)
    };
    let set = build_package_set(&request, &artifacts).expect("package set builds");

    assert_eq!(set.dispatcher.dir_name, "tool");
    assert_eq!(set.dispatcher.full_name(), "tool");
    let dir_names: Vec<&str> = set
        .platform_packages
        .iter()
        .map(|package| package.dir_name.as_str())
        .collect();
    assert_eq!(
        dir_names,
        vec!["tool-darwin-arm64", "tool-linux-x64", "tool-win32-ia32"]
    );
    assert!(set.dispatcher.manifest.optional_dependencies.contains_key("tool-linux-x64"));
}

#[rstest]
fn rejects_empty_artifact_list(request: ReleaseRequest) {
    let err = build_package_set(&request, &[]).expect_err("no artifacts");
    assert!(matches!(err, ReleaserError::EmptyArtifactSet));
}

#[rstest]
#[case::missing_version(
    ReleaseRequest { package_version: String::new(), ..request_with("@acme/", false) },
    "version"
)]
#[case::missing_name(
    ReleaseRequest { name: String::new(), ..request_with("@acme/", false) },
    "name"
)]
fn rejects_incomplete_request(
    #[case] request: ReleaseRequest,
    #[case] field: &str,
    artifacts: Vec<BinaryArtifact>,
) {
    let err = build_package_set(&request, &artifacts).expect_err("incomplete request");
    assert!(err.to_string().contains(field), "unexpected error: {err}");
}

#[rstest]
fn rejects_duplicate_targets(request: ReleaseRequest) {
    let artifacts = vec![
        artifact("tool_linux_amd64", "linux", "x64"),
        artifact("tool-linux-amd64.bak", "linux", "x64"),
    ];
    let err = build_package_set(&request, &artifacts).expect_err("duplicate target");
    assert!(matches!(
        err,
        ReleaserError::DuplicateTarget { ref target, .. } if target == "linux-x64"
    ));
}

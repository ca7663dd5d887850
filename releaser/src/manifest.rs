//! `package.json` models for the generated packages.
//!
//! Two shapes are emitted: one per platform binary, restricted via `os` and
//! `cpu` so npm only installs it on matching hosts, and one dispatcher that
//! lists every platform package as an optional dependency and exposes the
//! launcher script as its `bin`.
//!
//! Maps are [`BTreeMap`]s so keys serialize in sorted order and identical
//! inputs produce identical files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Access level requested when publishing.
pub const PUBLIC_ACCESS: &str = "public";

/// The `publishConfig` block shared by both manifest shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Registry the package is published to.
    pub registry: String,
    /// Publish access level; always `public`.
    pub access: String,
}

impl PublishConfig {
    /// Create a public publish config for `registry`.
    #[must_use]
    pub fn public(registry: impl Into<String>) -> Self {
        Self {
            registry: registry.into(),
            access: PUBLIC_ACCESS.to_owned(),
        }
    }
}

/// Optional descriptive fields copied verbatim into every manifest.
///
/// Empty values are omitted from the serialized JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Package description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// SPDX license identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license: String,
    /// Project homepage URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub homepage: String,
    /// Source repository URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repository: String,
}

/// Manifest of a single platform package.
///
/// # Examples
///
/// ```
/// use npm_binary_releaser::manifest::{PackageMetadata, PlatformManifest, PublishConfig};
///
/// let manifest = PlatformManifest {
///     name: "@acme/tool-linux-x64".to_owned(),
///     version: "1.2.3".to_owned(),
///     metadata: PackageMetadata::default(),
///     os: vec!["linux".to_owned()],
///     cpu: vec!["x64".to_owned()],
///     main: "tool-linux-x64".to_owned(),
///     files: vec!["tool-linux-x64".to_owned()],
///     prefer_unplugged: true,
///     publish_config: PublishConfig::public("https://registry.npmjs.org/"),
/// };
/// let json = serde_json::to_value(&manifest).expect("serializable");
/// assert_eq!(json["preferUnplugged"], true);
/// assert!(json.get("license").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformManifest {
    /// Full package name, including any scope prefix.
    pub name: String,
    /// Package version.
    pub version: String,
    /// Optional descriptive fields.
    #[serde(flatten)]
    pub metadata: PackageMetadata,
    /// Platforms the package installs on.
    pub os: Vec<String>,
    /// Architectures the package installs on.
    pub cpu: Vec<String>,
    /// Entry point; the binary itself.
    pub main: String,
    /// Files included in the published tarball.
    pub files: Vec<String>,
    /// Asks Yarn PnP to unpack the package so the binary is executable.
    pub prefer_unplugged: bool,
    /// Registry and access settings.
    pub publish_config: PublishConfig,
}

/// Manifest of the dispatcher package users install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatcherManifest {
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: String,
    /// Optional descriptive fields.
    #[serde(flatten)]
    pub metadata: PackageMetadata,
    /// Prefix stripped from `name` that platform package names still carry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_pkg_prefix: Option<String>,
    /// Executable name mapped to the launcher script.
    pub bin: BTreeMap<String, String>,
    /// Files included in the published tarball.
    pub files: Vec<String>,
    /// Platform package names mapped to their pinned versions.
    pub optional_dependencies: BTreeMap<String, String>,
    /// Registry and access settings.
    pub publish_config: PublishConfig,
}

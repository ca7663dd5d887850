//! Release configuration.
//!
//! A [`ReleaseRequest`] is resolved once, before any work starts, from four
//! layers in decreasing priority: command-line flags, the
//! `.npm-binary-releaser.yaml` file in the working directory, defaults derived
//! from the CI environment, and built-in defaults. The resolved value is
//! immutable and handed to the rest of the crate by reference.

use crate::cli::ReleaseArgs;
use crate::error::{ReleaserError, Result};
use crate::manifest::PackageMetadata;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;

/// Name of the optional configuration file.
pub const CONFIG_FILE_NAME: &str = ".npm-binary-releaser.yaml";

/// Output directory used when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "./generated-packages";

/// Registry used when none is configured.
pub const DEFAULT_PUBLISH_REGISTRY: &str = "https://registry.npmjs.org/";

/// Input directories probed, in order, when no input path is configured.
pub const DEFAULT_INPUT_DIRS: &[&str] = &["./bin", "./dist"];

const DEFAULT_GITHUB_SERVER: &str = "https://github.com";

/// Fully resolved inputs for one release run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRequest {
    /// Candidate input directories; the first existing one is scanned.
    pub input_paths: Vec<Utf8PathBuf>,
    /// Directory the packages are generated into.
    pub output_path: Utf8PathBuf,
    /// Name of the executable exposed by the dispatcher package.
    pub name: String,
    /// Base name shared by all generated packages; see
    /// [`ReleaseRequest::package_name`] for the effective value.
    pub package_name: String,
    /// Prefix (usually an npm scope such as `@acme/`) for package names.
    pub package_name_prefix: String,
    /// Version stamped on every generated package.
    pub package_version: String,
    /// Descriptive fields copied into every manifest.
    #[serde(flatten)]
    pub metadata: PackageMetadata,
    /// Registry packages are published to.
    pub publish_registry: String,
    /// Whether to run `npm publish` after generating the packages.
    pub publish: bool,
    /// Drop the prefix from the dispatcher package name only.
    pub no_prefix_for_main_package: bool,
}

impl ReleaseRequest {
    /// Check the fields every release needs.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaserError::MissingVersion`] or
    /// [`ReleaserError::MissingBinaryName`] when the corresponding value is
    /// empty.
    pub fn validate(&self) -> Result<()> {
        if self.package_version.is_empty() {
            return Err(ReleaserError::MissingVersion);
        }
        if self.name.is_empty() {
            return Err(ReleaserError::MissingBinaryName);
        }
        Ok(())
    }

    /// Base name shared by all generated packages, falling back to the
    /// binary name when no package name is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use npm_binary_releaser::cli::ReleaseArgs;
    /// use npm_binary_releaser::config::{CiEnvironment, FileConfig, resolve};
    ///
    /// let args = ReleaseArgs {
    ///     name: Some("tool".to_owned()),
    ///     ..ReleaseArgs::default()
    /// };
    /// let mut request = resolve(&args, FileConfig::default(), &CiEnvironment::default());
    /// request.package_name.clear();
    /// assert_eq!(request.package_name(), "tool");
    /// ```
    #[must_use]
    pub fn package_name(&self) -> &str {
        if self.package_name.is_empty() {
            &self.name
        } else {
            &self.package_name
        }
    }

    /// Return the first input candidate that is an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaserError::InputDirectoryNotFound`] listing every
    /// candidate when none exists.
    pub fn resolve_input_dir(&self) -> Result<Utf8PathBuf> {
        self.input_paths
            .iter()
            .find(|candidate| candidate.is_dir())
            .cloned()
            .ok_or_else(|| ReleaserError::InputDirectoryNotFound {
                candidates: self
                    .input_paths
                    .iter()
                    .map(|candidate| candidate.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Render the request as YAML for the `config` subcommand.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaserError::ConfigRender`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Settings read from [`CONFIG_FILE_NAME`]. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    /// Input directory.
    pub input_path: Option<Utf8PathBuf>,
    /// Output directory.
    pub output_path: Option<Utf8PathBuf>,
    /// Binary name.
    pub name: Option<String>,
    /// Package base name.
    pub package_name: Option<String>,
    /// Package name prefix.
    pub package_name_prefix: Option<String>,
    /// SPDX license.
    pub license: Option<String>,
    /// Homepage URL.
    pub homepage: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Repository URL.
    pub repository: Option<String>,
    /// Registry URL.
    pub publish_registry: Option<String>,
    /// Publish after generating.
    pub publish: Option<bool>,
    /// Keep the dispatcher name unprefixed.
    pub no_prefix_for_main_package: Option<bool>,
}

impl FileConfig {
    /// Load [`CONFIG_FILE_NAME`] from `dir`, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaserError::InvalidConfigFile`] when the file exists but
    /// cannot be read or is not valid YAML for this schema.
    pub fn load(dir: &Utf8Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(|e| ReleaserError::InvalidConfigFile {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&contents).map_err(|e| ReleaserError::InvalidConfigFile {
            path,
            reason: e.to_string(),
        })
    }
}

/// Defaults derived from the GitHub Actions environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiEnvironment {
    /// `owner/name` from `GITHUB_REPOSITORY`.
    pub repository: Option<String>,
    /// Base URL from `GITHUB_SERVER_URL`.
    pub server_url: Option<String>,
}

impl CiEnvironment {
    /// Read the CI variables from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            repository: non_empty("GITHUB_REPOSITORY"),
            server_url: non_empty("GITHUB_SERVER_URL"),
        }
    }

    /// Repository name without its owner.
    fn repo_name(&self) -> Option<&str> {
        self.repository
            .as_deref()
            .and_then(|full| full.rsplit_once('/'))
            .map(|(_, name)| name)
            .filter(|name| !name.is_empty())
    }

    fn repo_url(&self) -> Option<String> {
        let repository = self
            .repository
            .as_deref()
            .filter(|_| self.repo_name().is_some())?;
        let server = self
            .server_url
            .as_deref()
            .unwrap_or(DEFAULT_GITHUB_SERVER)
            .trim_end_matches('/');
        Some(format!("{server}/{repository}"))
    }

    fn homepage(&self) -> Option<String> {
        self.repo_url()
    }

    fn repository_url(&self) -> Option<String> {
        self.repo_url().map(|url| format!("git+{url}.git"))
    }
}

/// Resolve a [`ReleaseRequest`] from flags, file settings and CI defaults.
///
/// # Examples
///
/// ```
/// use npm_binary_releaser::cli::ReleaseArgs;
/// use npm_binary_releaser::config::{CiEnvironment, FileConfig, resolve};
///
/// let args = ReleaseArgs {
///     name: Some("tool".to_owned()),
///     package_version: Some("1.0.0".to_owned()),
///     ..ReleaseArgs::default()
/// };
/// let request = resolve(&args, FileConfig::default(), &CiEnvironment::default());
/// assert_eq!(request.package_name, "tool");
/// assert_eq!(request.input_paths.len(), 2);
/// ```
#[must_use]
pub fn resolve(args: &ReleaseArgs, file: FileConfig, ci: &CiEnvironment) -> ReleaseRequest {
    let name = pick(args.name.clone(), file.name)
        .or_else(|| ci.repo_name().map(str::to_owned))
        .unwrap_or_default();
    let package_name = pick(args.package_name.clone(), file.package_name)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| name.clone());

    let input_paths = match pick(args.input_path.clone(), file.input_path) {
        Some(path) => vec![path],
        None => DEFAULT_INPUT_DIRS
            .iter()
            .copied()
            .map(Utf8PathBuf::from)
            .collect(),
    };

    let metadata = PackageMetadata {
        description: pick(args.description.clone(), file.description).unwrap_or_default(),
        license: pick(args.license.clone(), file.license).unwrap_or_default(),
        homepage: pick(args.homepage.clone(), file.homepage)
            .or_else(|| ci.homepage())
            .unwrap_or_default(),
        repository: pick(args.repository.clone(), file.repository)
            .or_else(|| ci.repository_url())
            .unwrap_or_default(),
    };

    ReleaseRequest {
        input_paths,
        output_path: pick(args.output_path.clone(), file.output_path)
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT_DIR)),
        name,
        package_name,
        package_name_prefix: pick(args.package_name_prefix.clone(), file.package_name_prefix)
            .unwrap_or_default(),
        package_version: args.package_version.clone().unwrap_or_default(),
        metadata,
        publish_registry: pick(args.publish_registry.clone(), file.publish_registry)
            .unwrap_or_else(|| DEFAULT_PUBLISH_REGISTRY.to_owned()),
        publish: args.publish || file.publish.unwrap_or(false),
        no_prefix_for_main_package: args.no_prefix_for_main_package
            || file.no_prefix_for_main_package.unwrap_or(false),
    }
}

fn pick<T>(flag: Option<T>, file: Option<T>) -> Option<T> {
    flag.or(file)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

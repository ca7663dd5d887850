//! Error types for the npm binary releaser.
//!
//! Every fatal condition surfaces as a [`ReleaserError`] variant carrying the
//! path or value involved, so the single diagnostic line printed by the CLI
//! is enough to act on. Files that do not look like platform binaries are not
//! errors; the scanner logs and skips them.

use camino::Utf8PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can abort a release run.
#[derive(Debug, Error)]
pub enum ReleaserError {
    /// No package version was supplied.
    #[error("package version is missing; pass --package-version")]
    MissingVersion,

    /// No binary name was supplied and none could be derived.
    #[error("binary name is missing; pass --name")]
    MissingBinaryName,

    /// Neither the configured input path nor any default candidate exists.
    #[error("no input directory found (tried: {candidates})")]
    InputDirectoryNotFound {
        /// Comma-separated list of the paths that were probed.
        candidates: String,
    },

    /// The configuration file exists but could not be read or parsed.
    #[error("invalid config file {path}: {reason}")]
    InvalidConfigFile {
        /// Path to the offending file.
        path: Utf8PathBuf,
        /// Description of the read or parse failure.
        reason: String,
    },

    /// The input directory yielded no classifiable binaries.
    #[error("no binary files found at {input_dir}")]
    NoBinariesFound {
        /// The scanned input directory.
        input_dir: Utf8PathBuf,
    },

    /// The package set builder was handed no artifacts.
    #[error("cannot build packages from an empty artifact list")]
    EmptyArtifactSet,

    /// Two scanned entries resolve to the same platform package.
    #[error("{first} and {second} both target {target}")]
    DuplicateTarget {
        /// The shared platform/architecture pair.
        target: String,
        /// Entry that claimed the target first.
        first: String,
        /// Entry that collided with it.
        second: String,
    },

    /// A platform subdirectory holds more than one candidate binary.
    #[error("{dir} contains more than one file ({candidates}); expected exactly one binary")]
    AmbiguousBinaryDirectory {
        /// The subdirectory being resolved.
        dir: Utf8PathBuf,
        /// Comma-separated names of the files found.
        candidates: String,
    },

    /// Reading the input directory failed.
    #[error("failed to scan {path}")]
    ScanFailed {
        /// The directory being read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The output directory could not be removed or recreated.
    #[error("failed to prepare output directory {path}")]
    OutputDirectory {
        /// The output directory.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing a generated file or package directory failed.
    #[error("failed to write {path}")]
    WriteFailed {
        /// The file or directory being written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Copying a binary into its package directory failed.
    #[error("failed to copy {from} to {to}")]
    CopyFailed {
        /// Source binary.
        from: Utf8PathBuf,
        /// Destination inside the package directory.
        to: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A manifest could not be serialized to JSON.
    #[error("failed to serialize package.json: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The resolved configuration could not be rendered as YAML.
    #[error("failed to render configuration: {0}")]
    ConfigRender(#[from] serde_yaml::Error),

    /// The registry credential file could not be written.
    #[error("failed to write credential file {path}")]
    CredentialFile {
        /// Path of the credential file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The publish command could not be started.
    #[error("failed to run npm publish in {dir}")]
    PublishSpawn {
        /// The package directory being published.
        dir: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The publish command exited unsuccessfully.
    #[error("npm publish failed in {dir} ({status})")]
    PublishFailed {
        /// The package directory being published.
        dir: Utf8PathBuf,
        /// Exit status reported by the command.
        status: ExitStatus,
    },

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`ReleaserError`].
pub type Result<T> = std::result::Result<T, ReleaserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_version_mentions_flag() {
        let msg = ReleaserError::MissingVersion.to_string();
        assert!(msg.contains("--package-version"));
    }

    #[test]
    fn no_binaries_found_includes_input_dir() {
        let err = ReleaserError::NoBinariesFound {
            input_dir: Utf8PathBuf::from("./dist"),
        };
        assert_eq!(err.to_string(), "no binary files found at ./dist");
    }

    #[test]
    fn ambiguous_directory_lists_candidates() {
        let err = ReleaserError::AmbiguousBinaryDirectory {
            dir: Utf8PathBuf::from("bin/app_linux_amd64"),
            candidates: "app, app.sig".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("bin/app_linux_amd64"));
        assert!(msg.contains("app, app.sig"));
    }

    #[test]
    fn copy_failed_preserves_source() {
        let err = ReleaserError::CopyFailed {
            from: Utf8PathBuf::from("a"),
            to: Utf8PathBuf::from("b"),
            source: std::io::Error::other("disk full"),
        };
        assert!(err.to_string().contains("failed to copy a to b"));
        assert!(std::error::Error::source(&err).is_some());
    }
}

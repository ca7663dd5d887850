//! Publishing generated packages to an npm registry.
//!
//! Publishing shells out to `npm publish` once per package directory, with the
//! command's output forwarded line by line into the log. The process runner
//! and the publisher are both traits so the release flow can be exercised
//! without npm installed.

use crate::error::{ReleaserError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use std::fs;
use std::io::{BufRead, BufReader};
use std::process::{Command, ExitStatus, Stdio};

/// Program invoked to publish a package.
pub const NPM_COMMAND: &str = "npm";

/// Name of the registry credential file written before publishing.
pub const CREDENTIAL_FILE_NAME: &str = ".npmrc";

/// Environment variable pointing npm at an explicit user config file.
pub const USER_CONFIG_ENV: &str = "NPM_CONFIG_USERCONFIG";

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs `cmd` with `args` to completion and returns its exit status.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised when the command cannot be started or
    /// waited on.
    fn run(&self, cmd: &str, args: &[String]) -> std::io::Result<ExitStatus>;
}

/// Executes commands on the host system, logging each line they print as
/// `[publish] <line>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[String]) -> std::io::Result<ExitStatus> {
        run_forwarding(cmd, args, &|line| info!("{line}"))
    }
}

/// Prefix added to every line a publish subprocess prints.
pub const PUBLISH_LINE_PREFIX: &str = "[publish] ";

/// Run `cmd` to completion, handing each line it prints on stdout or stderr
/// to `sink` with [`PUBLISH_LINE_PREFIX`] prepended.
fn run_forwarding(
    cmd: &str,
    args: &[String],
    sink: &(dyn Fn(&str) + Sync),
) -> std::io::Result<ExitStatus> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // stderr drains on its own thread so a full pipe cannot stall stdout.
    std::thread::scope(|scope| {
        if let Some(stderr) = stderr {
            scope.spawn(move || forward_lines(BufReader::new(stderr), sink));
        }
        if let Some(stdout) = stdout {
            forward_lines(BufReader::new(stdout), sink);
        }
    });
    child.wait()
}

fn forward_lines(reader: impl BufRead, sink: &(dyn Fn(&str) + Sync)) {
    for line in reader.lines().map_while(std::result::Result::ok) {
        sink(&format!("{PUBLISH_LINE_PREFIX}{line}"));
    }
}

/// Publishes a single generated package directory.
#[cfg_attr(test, mockall::automock)]
pub trait Publisher {
    /// Publish the package in `package_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the package could not be published.
    fn publish(&self, package_dir: &Utf8Path) -> Result<()>;
}

/// Publishes packages with `npm publish <dir>`.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use npm_binary_releaser::publish::{NpmPublisher, Publisher};
///
/// let publisher: NpmPublisher = NpmPublisher::default();
/// publisher.publish(Utf8Path::new("generated-packages/my-cli"))?;
/// # Ok::<(), npm_binary_releaser::error::ReleaserError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct NpmPublisher<E = SystemCommandExecutor> {
    executor: E,
}

impl<E: CommandExecutor> NpmPublisher<E> {
    /// Create a publisher running npm through `executor`.
    #[must_use]
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E: CommandExecutor> Publisher for NpmPublisher<E> {
    fn publish(&self, package_dir: &Utf8Path) -> Result<()> {
        let dir = absolute_dir(package_dir)?;
        info!("running npm publish in {dir}");

        let status = self
            .executor
            .run(NPM_COMMAND, &["publish".to_owned(), dir.to_string()])
            .map_err(|source| ReleaserError::PublishSpawn {
                dir: dir.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ReleaserError::PublishFailed { dir, status })
        }
    }
}

fn absolute_dir(dir: &Utf8Path) -> Result<Utf8PathBuf> {
    let absolute = std::path::absolute(dir)?;
    Utf8PathBuf::from_path_buf(absolute)
        .map_err(|path| ReleaserError::NonUtf8Path(path.display().to_string()))
}

/// Publish every directory in order, stopping at the first failure.
///
/// Returns the number of packages published.
///
/// # Errors
///
/// Returns the first error reported by `publisher`; later directories are not
/// attempted.
pub fn publish_all<'a>(
    publisher: &dyn Publisher,
    package_dirs: impl IntoIterator<Item = &'a Utf8Path>,
) -> Result<usize> {
    let mut published = 0;
    for dir in package_dirs {
        publisher.publish(dir)?;
        published += 1;
    }
    Ok(published)
}

/// Write a registry credential file into `working_dir` unless npm is already
/// configured.
///
/// Nothing is written when [`USER_CONFIG_ENV`] is set or a
/// [`CREDENTIAL_FILE_NAME`] file already exists. The written file reads the
/// token from `NPM_TOKEN` at publish time. Returns the path of the file when
/// one was created.
///
/// # Errors
///
/// Returns [`ReleaserError::CredentialFile`] if the file cannot be written.
pub fn ensure_credential_file(
    working_dir: &Utf8Path,
    registry: &str,
) -> Result<Option<Utf8PathBuf>> {
    if std::env::var(USER_CONFIG_ENV).is_ok_and(|value| !value.is_empty()) {
        return Ok(None);
    }
    let path = working_dir.join(CREDENTIAL_FILE_NAME);
    if path.exists() {
        return Ok(None);
    }

    let host = registry_host(registry);
    info!("creating {CREDENTIAL_FILE_NAME} for {host}");
    fs::write(&path, format!("//{host}:_authToken=${{NPM_TOKEN}}\n")).map_err(|source| {
        ReleaserError::CredentialFile {
            path: path.clone(),
            source,
        }
    })?;
    Ok(Some(path))
}

fn registry_host(registry: &str) -> &str {
    registry
        .strip_prefix("https://")
        .or_else(|| registry.strip_prefix("http://"))
        .unwrap_or(registry)
}

#[cfg(test)]
#[path = "publish_tests.rs"]
mod tests;

//! Shared test utilities for the releaser crate.

use crate::error::{ReleaserError, Result};
use crate::publish::Publisher;
use camino::{Utf8Path, Utf8PathBuf};
use std::cell::RefCell;
use std::process::ExitStatus;

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// A `Publisher` that records the directories it is asked to publish.
///
/// Optionally fails on the n-th call (zero-based) with a `PublishFailed`
/// error, so tests can check that publishing stops at the first failure.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    published: RefCell<Vec<Utf8PathBuf>>,
    fail_at: Option<usize>,
}

impl RecordingPublisher {
    /// Creates a publisher that accepts every package.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a publisher that fails on call number `index` (zero-based).
    #[must_use]
    pub fn failing_at(index: usize) -> Self {
        Self {
            published: RefCell::default(),
            fail_at: Some(index),
        }
    }

    /// Directories passed to `publish`, in call order, including a failed one.
    #[must_use]
    pub fn published(&self) -> Vec<Utf8PathBuf> {
        self.published.borrow().clone()
    }
}

impl Publisher for RecordingPublisher {
    fn publish(&self, package_dir: &Utf8Path) -> Result<()> {
        let mut published = self.published.borrow_mut();
        let index = published.len();
        published.push(package_dir.to_owned());

        if self.fail_at == Some(index) {
            return Err(ReleaserError::PublishFailed {
                dir: package_dir.to_owned(),
                status: exit_status(1),
            });
        }
        Ok(())
    }
}

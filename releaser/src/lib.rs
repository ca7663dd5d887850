//! npm binary releaser library.
//!
//! This crate turns a directory of platform-specific executables into npm
//! packages: one package per operating system and architecture, plus a
//! dispatcher package that depends on all of them optionally and launches
//! whichever one npm installed. It is used by the `npm-binary-releaser` CLI
//! binary and can be driven programmatically for testing or custom release
//! workflows.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Release configuration resolution
//! - [`error`] - Semantic error types
//! - [`logging`] - `tracing-subscriber` setup for the binary
//! - [`manifest`] - `package.json` models
//! - [`package_set`] - Package naming and manifest construction
//! - [`platform`] - File name classification into npm platform/arch pairs
//! - [`publish`] - npm publishing and registry credentials
//! - [`release`] - End-to-end release orchestration
//! - [`scanner`] - Input directory scanning
//! - [`writer`] - Package directory generation

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod package_set;
pub mod platform;
pub mod publish;
pub mod release;
pub mod scanner;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod writer;

//! CLI argument definitions for the npm binary releaser.
//!
//! Every release flag is optional at parse time so that values missing from
//! the command line can still be supplied by the configuration file or the CI
//! environment; see [`crate::config::resolve`].

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Release platform binaries to npm.
#[derive(Parser, Debug)]
#[command(name = "npm-binary-releaser")]
#[command(version, about)]
#[command(long_about = concat!(
    "Release platform binaries to npm.\n\n",
    "Scans an input directory for binaries whose names encode an operating system ",
    "and architecture (for example `tool_linux_amd64` or `tool_windows_386.exe`), ",
    "wraps each one in its own platform package, and generates a dispatcher package ",
    "that installs the matching binary and launches it.\n\n",
    "Settings not given on the command line are read from `.npm-binary-releaser.yaml` ",
    "in the working directory, then from the GitHub Actions environment.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Generate packages from ./bin or ./dist:\n",
    "    $ npm-binary-releaser -n my-cli -r 1.2.3\n\n",
    "  Generate scoped packages and publish them:\n",
    "    $ npm-binary-releaser -n my-cli -p @my-org/ -r 1.2.3 --publish\n\n",
    "  Show the resolved configuration:\n",
    "    $ npm-binary-releaser config --validate -r 1.2.3",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Release arguments, shared by every subcommand.
    #[command(flatten)]
    pub release: ReleaseArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the resolved configuration as YAML.
    Config(ConfigArgs),
}

/// Arguments for the config command.
#[derive(Parser, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Fail if the resolved configuration could not run a release.
    #[arg(long)]
    pub validate: bool,
}

/// Arguments describing a release.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseArgs {
    /// Directory holding the binaries [default: ./bin, then ./dist].
    #[arg(short, long, value_name = "DIR", global = true)]
    pub input_path: Option<Utf8PathBuf>,

    /// Directory the packages are generated into [default: ./generated-packages].
    #[arg(short, long, value_name = "DIR", global = true)]
    pub output_path: Option<Utf8PathBuf>,

    /// Name of the binary, e.g. my-cool-cli.
    #[arg(short, long, global = true)]
    pub name: Option<String>,

    /// Prefix for every package name, e.g. @my-org/.
    #[arg(short = 'p', long, value_name = "PREFIX", global = true)]
    pub package_name_prefix: Option<String>,

    /// Version of the generated packages.
    #[arg(short = 'r', long, value_name = "VERSION", global = true)]
    pub package_version: Option<String>,

    /// Package base name [default: the binary name].
    #[arg(long, global = true)]
    pub package_name: Option<String>,

    /// SPDX license of the packages, e.g. MIT.
    #[arg(long, global = true)]
    pub license: Option<String>,

    /// Package homepage.
    #[arg(long, value_name = "URL", global = true)]
    pub homepage: Option<String>,

    /// Package description.
    #[arg(long, global = true)]
    pub description: Option<String>,

    /// Package repository.
    #[arg(long, value_name = "URL", global = true)]
    pub repository: Option<String>,

    /// npm registry endpoint [default: https://registry.npmjs.org/].
    #[arg(long, value_name = "URL", global = true)]
    pub publish_registry: Option<String>,

    /// Run npm publish for every generated package.
    #[arg(long, global = true)]
    pub publish: bool,

    /// Leave the package name prefix off the main package.
    #[arg(long, global = true)]
    pub no_prefix_for_main_package: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet",
        global = true
    )]
    pub verbosity: u8,

    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbosity", global = true)]
    pub quiet: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

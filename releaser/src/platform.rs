//! Platform and architecture inference from binary file names.
//!
//! Cross-compilation toolchains name their outputs after the target they were
//! built for (`myapp_linux_amd64`, `myapp-windows-386.exe`). This module finds
//! the first `<platform><sep><arch>` token pair in such a name and maps it onto
//! the `process.platform` / `process.arch` vocabulary that npm matches against
//! the `os` and `cpu` fields of a `package.json`.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Platform and architecture tokens, longest alternatives first so that
/// `amd64p32` wins over `amd64` and `mips64le` over `mips64`.
const TARGET_PATTERN: &str = concat!(
    "(?i)",
    "(android|darwin|dragonfly|freebsd|linux|nacl|netbsd|openbsd|plan9|solaris|windows)",
    "[_-]",
    "(i?386|amd64p32|amd64|arm64|arm|mips64le|mips64|mipsle|mips|ppc64le|ppc64|s390x|x86_64)",
);

/// The npm platform name used for Windows packages.
pub const WINDOWS_PLATFORM: &str = "win32";

/// A normalized platform/architecture pair.
///
/// # Examples
///
/// ```
/// use npm_binary_releaser::platform::classify;
///
/// let target = classify("myapp_linux_amd64").expect("recognized");
/// assert_eq!(target.platform(), "linux");
/// assert_eq!(target.arch(), "x64");
/// assert_eq!(target.to_string(), "linux-x64");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Target {
    platform: String,
    arch: String,
}

impl Target {
    /// Create a target from already-normalized components.
    #[must_use]
    pub fn new(platform: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            arch: arch.into(),
        }
    }

    /// The npm platform name (`linux`, `darwin`, `win32`, ...).
    #[must_use]
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// The npm architecture name (`x64`, `arm64`, `ia32`, ...).
    #[must_use]
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Whether binaries for this target need an `.exe` suffix.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.platform == WINDOWS_PLATFORM
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.platform, self.arch)
    }
}

fn target_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(TARGET_PATTERN).expect("target pattern is a valid regex"))
}

/// Extract the target encoded in `file_name`.
///
/// Matching is case-insensitive and takes the first occurrence anywhere in
/// the name. Returns `None` when no platform token is immediately followed by
/// `_` or `-` and an architecture token.
#[must_use]
pub fn classify(file_name: &str) -> Option<Target> {
    let captures = target_regex().captures(file_name)?;
    let platform = captures.get(1)?.as_str().to_ascii_lowercase();
    let arch = captures.get(2)?.as_str().to_ascii_lowercase();
    Some(Target {
        platform: node_platform(&platform).to_owned(),
        arch: node_arch(&arch).to_owned(),
    })
}

fn node_platform(platform: &str) -> &str {
    match platform {
        "windows" => WINDOWS_PLATFORM,
        "solaris" => "sunos",
        other => other,
    }
}

fn node_arch(arch: &str) -> &str {
    match arch {
        "386" | "i386" => "ia32",
        "amd64" => "x64",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::linux_amd64("myapp_linux_amd64", "linux", "x64")]
    #[case::windows_386("myapp-windows-386.exe", "win32", "ia32")]
    #[case::solaris("myapp_solaris_arm64", "sunos", "arm64")]
    #[case::darwin_arm64("myapp_darwin_arm64", "darwin", "arm64")]
    #[case::i386_alias("myapp_linux_i386", "linux", "ia32")]
    #[case::x86_64_passthrough("myapp-linux-x86_64", "linux", "x86_64")]
    #[case::amd64p32("app_linux_amd64p32", "linux", "amd64p32")]
    #[case::mips64le("app_linux_mips64le", "linux", "mips64le")]
    #[case::mipsle("app_linux_mipsle", "linux", "mipsle")]
    #[case::ppc64le("app_linux_ppc64le", "linux", "ppc64le")]
    #[case::s390x("app-linux-s390x", "linux", "s390x")]
    #[case::plan9("app_plan9_arm", "plan9", "arm")]
    fn classifies_known_targets(
        #[case] name: &str,
        #[case] platform: &str,
        #[case] arch: &str,
    ) {
        let target = classify(name).expect("name should classify");
        assert_eq!(target.platform(), platform);
        assert_eq!(target.arch(), arch);
    }

    #[rstest]
    #[case::upper("MYAPP_LINUX_AMD64")]
    #[case::mixed("MyApp-Linux-Amd64")]
    fn classification_ignores_case(#[case] name: &str) {
        assert_eq!(classify(name), Some(Target::new("linux", "x64")));
    }

    #[rstest]
    #[case::no_target("myapp.txt")]
    #[case::platform_only("myapp_linux")]
    #[case::wrong_separator("myapp_linux.amd64")]
    #[case::unknown_platform("myapp_beos_amd64")]
    #[case::empty("")]
    fn unrecognized_names_return_none(#[case] name: &str) {
        assert_eq!(classify(name), None);
    }

    #[test]
    fn first_occurrence_wins() {
        let target = classify("tool_darwin_arm64_linux_amd64").expect("recognized");
        assert_eq!(target, Target::new("darwin", "arm64"));
    }

    #[rstest]
    #[case::windows(Target::new("win32", "x64"), true)]
    #[case::linux(Target::new("linux", "x64"), false)]
    fn windows_detection(#[case] target: Target, #[case] expected: bool) {
        assert_eq!(target.is_windows(), expected);
    }
}

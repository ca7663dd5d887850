//! npm binary releaser CLI entrypoint.
//!
//! Resolves the release configuration from flags, the configuration file and
//! the CI environment, then either prints it (`config`) or runs a release.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use npm_binary_releaser::cli::{Cli, Command, ConfigArgs};
use npm_binary_releaser::config::{CiEnvironment, FileConfig, ReleaseRequest, resolve};
use npm_binary_releaser::error::{ReleaserError, Result};
use npm_binary_releaser::logging;
use npm_binary_releaser::publish::NpmPublisher;
use npm_binary_releaser::release::run_release;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    if let Err(err) = logging::init(logging::level_for(cli.release.verbosity, cli.release.quiet)) {
        write_stderr_line(&mut stderr, err);
    }

    let mut stdout = std::io::stdout();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    let working_dir = current_dir()?;
    let request = resolve_request(cli, &working_dir)?;

    match &cli.command {
        Some(Command::Config(args)) => print_config(&request, args, stdout),
        None => {
            let publisher: NpmPublisher = NpmPublisher::default();
            run_release(&request, &publisher, &working_dir).map(|_| ())
        }
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let dir = std::env::current_dir()?;
    Utf8PathBuf::from_path_buf(dir)
        .map_err(|path| ReleaserError::NonUtf8Path(path.display().to_string()))
}

fn resolve_request(cli: &Cli, working_dir: &Utf8Path) -> Result<ReleaseRequest> {
    let file = FileConfig::load(working_dir)?;
    Ok(resolve(&cli.release, file, &CiEnvironment::from_env()))
}

fn print_config(request: &ReleaseRequest, args: &ConfigArgs, stdout: &mut dyn Write) -> Result<()> {
    if args.validate {
        request.validate()?;
        request.resolve_input_dir()?;
    }
    stdout.write_all(request.to_yaml()?.as_bytes())?;
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("{}{err}", logging::LOG_PREFIX));
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use npm_binary_releaser::cli::ReleaseArgs;
    use rstest::rstest;
    use tempfile::TempDir;

    fn request_for(root: &Utf8Path, args: ReleaseArgs) -> ReleaseRequest {
        let args = ReleaseArgs {
            input_path: Some(root.join("bin")),
            ..args
        };
        resolve(&args, FileConfig::default(), &CiEnvironment::default())
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = ReleaserError::NoBinariesFound {
            input_dir: Utf8PathBuf::from("./dist"),
        };

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert_eq!(
            stderr_text,
            "[npm-binary-releaser]: no binary files found at ./dist\n"
        );
    }

    #[test]
    fn config_prints_yaml_without_validation() {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 temp dir");
        let request = request_for(root, ReleaseArgs::default());

        let mut stdout = Vec::new();
        print_config(&request, &ConfigArgs::default(), &mut stdout).expect("config prints");

        let yaml = String::from_utf8(stdout).expect("yaml is UTF-8");
        assert!(yaml.contains("outputPath:"));
        assert!(yaml.contains("./generated-packages"));
        assert!(yaml.contains("registry.npmjs.org"));
    }

    #[rstest]
    #[case::missing_version(ReleaseArgs { name: Some("tool".to_owned()), ..ReleaseArgs::default() })]
    #[case::missing_input_dir(ReleaseArgs {
        name: Some("tool".to_owned()),
        package_version: Some("1.0.0".to_owned()),
        ..ReleaseArgs::default()
    })]
    fn config_validate_reports_unusable_requests(#[case] args: ReleaseArgs) {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 temp dir");
        let request = request_for(root, args);

        let mut stdout = Vec::new();
        let result = print_config(&request, &ConfigArgs { validate: true }, &mut stdout);

        assert!(result.is_err());
        assert!(stdout.is_empty());
    }

    #[test]
    fn config_validate_accepts_complete_request() {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 temp dir");
        std::fs::create_dir(root.join("bin")).expect("mkdir bin");
        let args = ReleaseArgs {
            name: Some("tool".to_owned()),
            package_version: Some("1.0.0".to_owned()),
            ..ReleaseArgs::default()
        };
        let request = request_for(root, args);

        let mut stdout = Vec::new();
        print_config(&request, &ConfigArgs { validate: true }, &mut stdout)
            .expect("valid request");

        assert!(!stdout.is_empty());
    }
}

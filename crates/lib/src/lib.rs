//! # Build tool for system containers
//!
//! This crate scaffolds and drives builds of system container images: it
//! generates a Dockerfile plus the manifest, systemd unit, init script and
//! OCI runtime config template such an image ships, and hands image builds
//! and exports to a docker compatible engine or to buildah.

pub mod cli;
mod dockerfile;
pub mod executor;
mod generate_files;
pub mod keyvalue;
pub mod manager;
pub mod manifest;
pub mod ocitools;
mod templates;
mod utils;

use anyhow::Result;

use cli::{BuildOpts, Opt, TarOpts};
use executor::{CommandExecutor, HostExecutor};

fn build(executor: &mut dyn CommandExecutor, opts: &BuildOpts) -> Result<()> {
    let path = sysbuildah_utils::resolve_path(&opts.path)?;
    opts.manager
        .manager()
        .build(executor, &opts.invocation, &path, &opts.tag)?;
    tracing::info!("Built {}", opts.tag);
    Ok(())
}

fn tar(executor: &mut dyn CommandExecutor, opts: &TarOpts) -> Result<()> {
    opts.manager
        .manager()
        .tar(executor, &opts.invocation, &opts.image, None)?;
    tracing::info!("Exported {}", opts.image);
    Ok(())
}

/// Execute `opt`, running external tools through `executor`.
pub fn run_with(executor: &mut dyn CommandExecutor, opt: &Opt) -> Result<()> {
    match opt {
        Opt::GenerateFiles(opts) => generate_files::generate_files(executor, opts),
        Opt::GenerateDockerfile(opts) => dockerfile::generate_dockerfile(opts),
        Opt::Build(opts) => build(executor, opts),
        Opt::Tar(opts) => tar(executor, opts),
    }
}

/// Execute `opt` on the host.
pub fn run(opt: &Opt) -> Result<()> {
    run_with(&mut HostExecutor, opt)
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;
    use crate::executor::testutil::RecordingExecutor;

    fn opt(args: &[&str]) -> Opt {
        Cli::try_parse_from(std::iter::once("system-buildah").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn test_run_build() {
        let td = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(td.path().canonicalize().unwrap()).unwrap();
        let mut ex = RecordingExecutor::new();
        run_with(
            &mut ex,
            &opt(&["build", "--tlsverify", "-H", "example.org", "-p", path.as_str(), "a"]),
        )
        .unwrap();
        assert_eq!(
            ex.only_argv(),
            ["docker", "--tlsverify", "--host=example.org", "build", "-t", "a", "."]
        );
        assert_eq!(ex.calls[0].cwd.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_run_build_relative() {
        let mut ex = RecordingExecutor::new();
        run_with(&mut ex, &opt(&["build", "--manager", "buildah", "a"])).unwrap();
        assert_eq!(ex.only_argv(), ["buildah", "bud", "-t", "a", "."]);
        let cwd = ex.calls[0].cwd.as_ref().unwrap();
        assert!(cwd.is_absolute());
        assert_eq!(
            cwd.as_std_path(),
            std::env::current_dir().unwrap().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_run_tar() {
        let mut ex = RecordingExecutor::new();
        run_with(&mut ex, &opt(&["tar", "--host", "example.org", "a:a"])).unwrap();
        assert_eq!(
            ex.only_argv(),
            ["docker", "--host=example.org", "save", "-o", "a-a.tar", "a:a"]
        );
        assert_eq!(ex.calls[0].cwd, None);
    }

    #[test]
    fn test_run_generate_dockerfile() {
        let td = tempfile::tempdir().unwrap();
        let out = Utf8PathBuf::try_from(td.path().to_path_buf()).unwrap();
        let mut ex = RecordingExecutor::new();
        run_with(
            &mut ex,
            &opt(&["generate-dockerfile", "-o", out.as_str(), "-A", "bad", "myimage"]),
        )
        .unwrap();
        assert!(ex.calls.is_empty());
        let written = std::fs::read_to_string(out.join("Dockerfile")).unwrap();
        assert!(written.contains("name=\"myimage\""));
        assert!(!written.contains("hostfs"));
    }
}

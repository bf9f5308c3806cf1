//! Moby/Docker specific manager.

use std::process::Command;

use anyhow::{Context, Result};
use camino::Utf8Path;

use super::{tar_name, ImageManager, InvocationOpts};
use crate::executor::CommandExecutor;

const DOCKER: &str = "docker";

/// Works with moby/docker.
#[derive(Debug, Default, Clone, Copy)]
pub struct Moby;

impl Moby {
    /// Build the engine commandline, adding the remote host and TLS switches.
    ///
    /// Each switch is inserted directly after the executable, so with both
    /// set the result is `docker --tlsverify --host=<host> <subcommand>...`.
    fn command(opts: &InvocationOpts, subcommand: &[&str]) -> Command {
        let mut argv = vec![DOCKER.to_string()];
        argv.extend(subcommand.iter().map(|s| s.to_string()));
        if let Some(host) = opts.host.as_deref() {
            argv.insert(1, format!("--host={host}"));
        }
        if opts.tlsverify {
            argv.insert(1, "--tlsverify".to_string());
        }
        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..]);
        cmd
    }
}

impl ImageManager for Moby {
    fn build(
        &self,
        executor: &mut dyn CommandExecutor,
        opts: &InvocationOpts,
        path: &Utf8Path,
        tag: &str,
    ) -> Result<()> {
        let mut cmd = Self::command(opts, &["build", "-t", tag, "."]);
        cmd.current_dir(path);
        executor
            .execute(&mut cmd)
            .with_context(|| format!("Can not build image {tag}"))
    }

    fn tar(
        &self,
        executor: &mut dyn CommandExecutor,
        opts: &InvocationOpts,
        image: &str,
        output_dir: Option<&Utf8Path>,
    ) -> Result<()> {
        let tar = tar_name(image);
        let mut cmd = Self::command(opts, &["save", "-o", tar.as_str(), image]);
        if let Some(dir) = output_dir {
            cmd.current_dir(dir);
        }
        executor
            .execute(&mut cmd)
            .with_context(|| format!("Unable to export {image} to a tar"))
    }
}

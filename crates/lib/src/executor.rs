//! Running external tools.

use std::process::Command;

use anyhow::Result;
use sysbuildah_utils::CommandRunExt;

/// Something which can run a fully constructed external command.
///
/// Everything that shells out goes through this so the exact commandline
/// can be checked without the tools being installed.
pub trait CommandExecutor {
    /// Run `cmd` to completion; an unsuccessful exit is an error.
    fn execute(&mut self, cmd: &mut Command) -> Result<()>;
}

/// Runs commands on the host with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostExecutor;

impl CommandExecutor for HostExecutor {
    fn execute(&mut self, cmd: &mut Command) -> Result<()> {
        cmd.log_debug().run_inherited_with_cmd_context()
    }
}

//! The main entrypoint for system-buildah, which just performs global
//! initialization and then calls out into the library.

use anyhow::Result;
use clap::Parser;
use system_buildah_lib::cli::Cli;

fn run() -> Result<()> {
    let cli = Cli::parse();
    sysbuildah_utils::initialize_tracing(cli.log_level.level_filter());
    tracing::trace!("starting {}", env!("CARGO_PKG_NAME"));
    system_buildah_lib::run(&cli.command)
}

fn main() {
    sysbuildah_utils::run_main(run)
}

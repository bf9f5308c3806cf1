//! Managers for building and exporting images.
//!
//! Two backends exist: [`moby::Moby`] drives a Docker compatible engine and
//! is the default, [`buildah::Buildah`] drives the rootless `buildah` tool
//! and is experimental. Both only construct a commandline and hand it to a
//! [`CommandExecutor`].

use anyhow::Result;
use camino::Utf8Path;

use crate::executor::CommandExecutor;

mod buildah;
mod moby;

pub use buildah::Buildah;
pub use moby::Moby;

/// Which tool to use for image work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ManagerKind {
    /// A moby/docker compatible engine
    #[default]
    Moby,
    /// The buildah tool (experimental)
    Buildah,
}

impl ManagerKind {
    /// Construct the manager for this kind.
    pub fn manager(self) -> Box<dyn ImageManager> {
        match self {
            ManagerKind::Moby => Box::new(Moby),
            ManagerKind::Buildah => {
                tracing::warn!("The buildah manager is experimental!");
                Box::new(Buildah)
            }
        }
    }
}

/// Extra switches for the engine, supplied on the command line.
///
/// These are spliced in directly after the engine executable, ahead of the
/// engine subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq, clap::Args)]
pub struct InvocationOpts {
    /// Remote Docker host to connect to (Docker specific)
    #[clap(short = 'H', long)]
    pub host: Option<String>,

    /// Enable TLS Verification (Docker specific)
    #[clap(long)]
    pub tlsverify: bool,
}

/// Image build and export operations common to all backends.
pub trait ImageManager: std::fmt::Debug {
    /// Build the image described by the Dockerfile in `path`, tagging it `tag`.
    fn build(
        &self,
        executor: &mut dyn CommandExecutor,
        opts: &InvocationOpts,
        path: &Utf8Path,
        tag: &str,
    ) -> Result<()>;

    /// Export `image` to `<normalized image>.tar`, written in `output_dir`
    /// or the current directory.
    fn tar(
        &self,
        executor: &mut dyn CommandExecutor,
        opts: &InvocationOpts,
        image: &str,
        output_dir: Option<&Utf8Path>,
    ) -> Result<()>;
}

/// Replace characters which are problematic in file names.
pub fn normalize_filename(image: &str) -> String {
    image.replace(':', "-").replace('/', "-")
}

/// The archive name `tar` produces for `image`.
pub(crate) fn tar_name(image: &str) -> String {
    format!("{}.tar", normalize_filename(image))
}

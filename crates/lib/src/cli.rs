//! # system-buildah command line
//!
//! Argument definitions for every subcommand.

use camino::Utf8PathBuf;
use clap::Parser;
use serde::Serialize;
use tracing::level_filters::LevelFilter;

use crate::manager::{InvocationOpts, ManagerKind};

/// Build and export system container images.
#[derive(Debug, Parser, PartialEq, Eq)]
#[clap(name = sysbuildah_utils::NAME, version)]
pub struct Cli {
    /// Logging verbosity; `RUST_LOG` takes precedence when set
    #[clap(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// The operation to perform
    #[clap(subcommand)]
    pub command: Opt,
}

/// How much to log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Everything, including every spawned command
    Debug,
    /// Progress messages
    #[default]
    Info,
    /// Only problems
    Warn,
    /// Only errors
    Fatal,
}

impl LogLevel {
    /// The corresponding tracing filter.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Fatal => LevelFilter::ERROR,
        }
    }
}

/// Subcommands.
#[derive(Debug, clap::Subcommand, PartialEq, Eq)]
pub enum Opt {
    /// Create the files a system container image ships
    ///
    /// Writes manifest.json, service.template, init.sh and
    /// config.json.template into the output directory.
    GenerateFiles(GenerateFilesOpts),

    /// Create a Dockerfile for a system container image
    GenerateDockerfile(GenerateDockerfileOpts),

    /// Build a system container image
    Build(BuildOpts),

    /// Export a system container image to a tar archive
    Tar(TarOpts),
}

/// Options for `generate-files`.
#[derive(Debug, Parser, PartialEq, Eq)]
pub struct GenerateFilesOpts {
    /// Description of container
    #[clap(short, long, default_value = "UNKNOWN")]
    pub description: String,

    /// Options to pass to ocitools generate. Example: -c "--cwd=/tmp --os=linux"
    #[clap(short, long, allow_hyphen_values = true)]
    pub config: Option<String>,

    /// Default manifest values in the form of key=value
    #[clap(short = 'D', long = "default", action = clap::ArgAction::Append)]
    pub defaults: Vec<String>,

    /// Path to write the new files
    pub output: Utf8PathBuf,
}

/// Which audiences an image may be distributed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Not to be distributed
    #[default]
    Private,
    /// Only from the authoritative source
    AuthoritativeSourceOnly,
    /// Limited distribution
    Restricted,
    /// Anyone
    Public,
}

/// Options for `generate-dockerfile`.
#[derive(Debug, Parser, PartialEq, Eq)]
pub struct GenerateDockerfileOpts {
    /// Path to write the new Dockerfile
    #[clap(short, long, default_value = ".")]
    pub output: Utf8PathBuf,

    /// Base image to build upon
    #[clap(short, long, default_value = "centos:latest")]
    pub from_base: String,

    /// Maintainer of the image
    #[clap(short, long, default_value = "UNKNOWN")]
    pub maintainer: String,

    /// License of the image
    #[clap(short, long, default_value = "UNKNOWN")]
    pub license: String,

    /// Summary of the image
    #[clap(short = 'S', long, default_value = "UNKNOWN")]
    pub summary: String,

    /// Version of the image
    #[clap(short, long, default_value = "1")]
    pub version: String,

    /// Help text for the image
    #[clap(short = 'H', long, default_value = "No help")]
    pub help_text: String,

    /// Architecture of the image
    #[clap(short, long, default_value = "x86_64")]
    pub architecture: String,

    /// Scope of the image
    #[clap(short, long, value_enum, default_value_t)]
    pub scope: Scope,

    /// Add a host file in the form of local=host
    #[clap(short = 'A', long, action = clap::ArgAction::Append)]
    pub add_file: Vec<String>,

    /// Name for the new system container image
    pub name: String,
}

/// Options for `build`.
#[derive(Debug, Parser, PartialEq, Eq)]
pub struct BuildOpts {
    #[clap(flatten)]
    #[allow(missing_docs)]
    pub invocation: InvocationOpts,

    /// Tool used to build the image
    #[clap(long, value_enum, default_value_t)]
    pub manager: ManagerKind,

    /// Path to the Dockerfile directory
    #[clap(short, long, default_value = ".")]
    pub path: Utf8PathBuf,

    /// Tag for the new image
    pub tag: String,
}

/// Options for `tar`.
#[derive(Debug, Parser, PartialEq, Eq)]
pub struct TarOpts {
    #[clap(flatten)]
    #[allow(missing_docs)]
    pub invocation: InvocationOpts,

    /// Tool used to export the image
    #[clap(long, value_enum, default_value_t)]
    pub manager: ManagerKind,

    /// Name of the image
    pub image: String,
}

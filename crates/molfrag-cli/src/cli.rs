use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "molfrag CLI - Build and query repositories of charged molecular fragments for partial-charge assignment.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a fragment aggregate for a query molecule against a reference repository.
    Generate(GenerateArgs),
    /// Answer a needle substructure query against a stored aggregate.
    Find(FindArgs),
    /// List the reference repositories available under a repository root.
    Repos(ReposArgs),
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the directory containing the reference repositories.
    #[arg(long, required = true, value_name = "PATH")]
    pub repo_root: PathBuf,

    /// Path to the aggregate cache directory.
    #[arg(long, required = true, value_name = "PATH")]
    pub cache_dir: PathBuf,

    /// Path to the external fragment-partitioning tool binary.
    #[arg(long, required = true, value_name = "PATH")]
    pub tool: PathBuf,

    /// Repository to build against when the request does not name one.
    #[arg(short, long, value_name = "NAME")]
    pub repository: Option<String>,

    /// Shell size to use when the request does not set one.
    #[arg(short, long, value_name = "NUM")]
    pub shell_size: Option<u32>,

    /// Width of the worker pool driving tool invocations.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub pool_width: Option<usize>,

    /// Per-invocation tool timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to the request JSON, or '-' to read it from stdin.
    #[arg(value_name = "REQUEST")]
    pub request: String,
}

/// Arguments for the `find` subcommand.
#[derive(Args, Debug)]
pub struct FindArgs {
    /// Path to the aggregate cache directory.
    #[arg(long, required = true, value_name = "PATH")]
    pub cache_dir: PathBuf,

    /// Path to the request JSON, or '-' to read it from stdin.
    #[arg(value_name = "REQUEST")]
    pub request: String,
}

/// Arguments for the `repos` subcommand.
#[derive(Args, Debug)]
pub struct ReposArgs {
    /// Path to the directory containing the reference repositories.
    #[arg(long, required = true, value_name = "PATH")]
    pub repo_root: PathBuf,
}

use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self},
    prelude::*,
};

/// Maps the `-v`/`-q` flags to a log level. Quiet wins over any
/// verbosity; the default only surfaces warnings so the stdout JSON
/// response stays the dominant output of a plain invocation.
fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global tracing subscriber.
///
/// Every subcommand prints its JSON response on stdout, so all
/// diagnostics go to stderr (and optionally to `log_file`); stdout is
/// reserved for machine-readable output and stays pipeable. The file
/// layer keeps thread ids because builds fan out across a worker pool.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let diagnostics_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(level_for(verbosity, quiet))
        .with(diagnostics_layer);

    match log_file {
        Some(path) => {
            let file = File::create(&path).map_err(CliError::Io)?;
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_thread_ids(true)
                .with_target(true);
            subscriber.with(file_layer).init();
        }
        None => subscriber.init(),
    }

    Ok(())
}

use crate::core::models::molecule::MoleculeError;
use crate::core::typing::TypingError;
use std::path::PathBuf;
use thiserror::Error;

/// Rejection of a request before any external process is spawned.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing query data")]
    MissingData,

    #[error("Query data not in JSON format ({0})")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid molecule: {0}")]
    Molecule(#[from] MoleculeError),

    #[error("Provided repository ({0}) does not exist")]
    UnknownRepository(String),

    #[error("Shell size needs to be a positive integer")]
    InvalidShellSize,

    #[error("OFF not set")]
    MissingKey,

    #[error("Needle not set")]
    MissingNeedle,
}

/// Failure of a repository build: classification, tool invocation, tool
/// output, or persistence. The first invocation failure aborts the
/// whole batch.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Could not resolve all element types: {source}")]
    UnknownElement {
        #[from]
        source: TypingError,
    },

    #[error("Failed to invoke fragment tool for reference {reference_id}: {source}")]
    Spawn {
        reference_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Fragment tool reported an error for reference {reference_id}: {stderr}")]
    Tool {
        reference_id: String,
        stderr: String,
    },

    #[error("Fragment tool timed out after {seconds} s for reference {reference_id}")]
    Timeout { reference_id: String, seconds: u64 },

    #[error("Fragment tool returned invalid data for reference {reference_id}: {source}")]
    InvalidOutput {
        reference_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to load a persisted aggregate record.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not find fragment file {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid fragment file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Query-time failure of the matcher, distinct from a load failure so
/// callers can tell a missing record from a bad query.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("Could not load fragments: {source}")]
    Load {
        #[from]
        source: LoadError,
    },
}

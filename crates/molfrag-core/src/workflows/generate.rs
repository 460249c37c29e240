//! The build workflow: validate, classify, fan out, aggregate, cache.
//!
//! [`run`] is the typed entry point for library users; [`handle`] is the
//! boundary entry point mirroring the wire contract: JSON request text
//! in, `{off, missingAtoms}` or `{error}` out, with no error ever
//! escaping past it.

use crate::core::models::molecule::Molecule;
use crate::core::typing;
use crate::engine::cache::CacheStore;
use crate::engine::config::BuildConfig;
use crate::engine::error::{GeneratorError, ValidationError};
use crate::engine::generator;
use crate::engine::registry::{BuildRegistry, Flight};
use crate::engine::repository::Repository;
use crate::engine::tool::FragmentTool;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// A build request as it arrives over the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub molecule: Molecule,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub shell_size: Option<u32>,
    #[serde(default)]
    pub molecule_id: Option<u64>,
}

/// A successful build: the cache key the aggregate was stored under and
/// the query atoms no fragment covered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub off: String,
    pub missing_atoms: BTreeSet<u32>,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

/// The boundary response shape: exactly one of the two forms.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GenerateResponse {
    Ok {
        off: String,
        #[serde(rename = "missingAtoms")]
        missing_atoms: Vec<u32>,
    },
    Err {
        error: String,
    },
}

/// Boundary entry point: parses and validates the request text, then
/// delegates to [`run`]. All failures come back as `{error}`.
pub fn handle(
    data: Option<&str>,
    config: &BuildConfig,
    store: &CacheStore,
    registry: &BuildRegistry,
    tool: &dyn FragmentTool,
) -> GenerateResponse {
    let outcome = parse_request(data)
        .map_err(GenerateError::from)
        .and_then(|request| run(&request, config, store, registry, tool));

    match outcome {
        Ok(outcome) => GenerateResponse::Ok {
            off: outcome.off,
            missing_atoms: outcome.missing_atoms.into_iter().collect(),
        },
        Err(e) => GenerateResponse::Err {
            error: e.to_string(),
        },
    }
}

fn parse_request(data: Option<&str>) -> Result<GenerateRequest, ValidationError> {
    let data = match data {
        Some(text) if !text.is_empty() => text,
        _ => return Err(ValidationError::MissingData),
    };
    let request: GenerateRequest = serde_json::from_str(data)?;
    Ok(request)
}

/// Builds (or returns the cached) aggregate for a validated request.
///
/// Validation and classification happen before any process is spawned.
/// With a numeric molecule id the cache key is deterministic: an
/// existing, parsable record short-circuits the build with zero tool
/// invocations, and concurrent builds of the same key are collapsed to
/// one through the registry. Without a molecule id every build gets a
/// fresh unique key.
#[instrument(skip_all, name = "generate_workflow")]
pub fn run(
    request: &GenerateRequest,
    config: &BuildConfig,
    store: &CacheStore,
    registry: &BuildRegistry,
    tool: &dyn FragmentTool,
) -> Result<BuildOutcome, GenerateError> {
    request
        .molecule
        .validate()
        .map_err(ValidationError::Molecule)?;

    let repository_name = request
        .repository
        .clone()
        .unwrap_or_else(|| config.default_repository.clone());
    if !Repository::exists(&config.repo_root, &repository_name) {
        return Err(ValidationError::UnknownRepository(repository_name).into());
    }

    let shell_size = request.shell_size.unwrap_or(config.default_shell_size);
    if shell_size == 0 {
        return Err(ValidationError::InvalidShellSize.into());
    }

    let typed = typing::classify_molecule(&request.molecule).map_err(GeneratorError::from)?;

    match request.molecule_id {
        Some(molecule_id) => {
            let key = CacheStore::key_for(&repository_name, shell_size, molecule_id);
            loop {
                if let Ok(existing) = store.load(&key) {
                    info!(key = %key, "Cache hit, skipping build");
                    return Ok(BuildOutcome {
                        off: key,
                        missing_atoms: existing.missing_atoms,
                    });
                }

                match registry.begin(&key) {
                    Flight::Leader => {
                        // Double-checked: a previous leader may have
                        // stored the record between our cache miss and
                        // winning the flight.
                        let result = match store.load(&key) {
                            Ok(existing) => Ok(BuildOutcome {
                                off: key.clone(),
                                missing_atoms: existing.missing_atoms,
                            }),
                            Err(_) => build_and_store(
                                &key,
                                config,
                                store,
                                tool,
                                &repository_name,
                                shell_size,
                                &typed,
                            ),
                        };
                        registry.finish(&key);
                        return result;
                    }
                    follower => {
                        debug!(key = %key, "Awaiting in-flight build for the same key");
                        registry.wait(&follower);
                        // The leader has finished (or failed); re-check
                        // the cache and, if need be, lead a retry.
                    }
                }
            }
        }
        None => {
            let key = store.unique_key(&repository_name, shell_size);
            build_and_store(&key, config, store, tool, &repository_name, shell_size, &typed)
        }
    }
}

fn build_and_store(
    key: &str,
    config: &BuildConfig,
    store: &CacheStore,
    tool: &dyn FragmentTool,
    repository_name: &str,
    shell_size: u32,
    typed: &typing::TypedMolecule,
) -> Result<BuildOutcome, GenerateError> {
    let repository = Repository::scan(&config.repo_root, repository_name)
        .map_err(GeneratorError::Io)?;

    let aggregate =
        generator::build_aggregate(tool, &repository, shell_size, typed, config.pool_width)?;

    store.store(key, &aggregate).map_err(GeneratorError::Io)?;

    Ok(BuildOutcome {
        off: key.to_string(),
        missing_atoms: aggregate.missing_atoms,
    })
}

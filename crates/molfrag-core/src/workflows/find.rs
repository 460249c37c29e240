//! The query workflow: validate the needle request, load the cached
//! aggregate, and return the matching fragments with reconstructed
//! bonds.

use crate::core::models::fragment::MatchedFragment;
use crate::core::models::molecule::Molecule;
use crate::engine::cache::CacheStore;
use crate::engine::error::{FinderError, ValidationError};
use crate::engine::finder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::instrument;

/// A needle query as it arrives over the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct FindRequest {
    pub off: String,
    pub needle: Vec<u32>,
    pub molecule: Molecule,
}

#[derive(Debug, Error)]
pub enum FindError {
    #[error("Invalid query: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Finder(#[from] FinderError),
}

/// The boundary response shape: exactly one of the two forms.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FindResponse {
    Ok { fragments: Vec<MatchedFragment> },
    Err { error: String },
}

/// Boundary entry point: JSON request text in, `{fragments}` or
/// `{error}` out.
pub fn handle(data: Option<&str>, store: &CacheStore) -> FindResponse {
    let result = parse_request(data)
        .map_err(FindError::from)
        .and_then(|request| run(&request, store));

    match result {
        Ok(fragments) => FindResponse::Ok { fragments },
        Err(e) => FindResponse::Err {
            error: e.to_string(),
        },
    }
}

fn parse_request(data: Option<&str>) -> Result<FindRequest, ValidationError> {
    let data = match data {
        Some(text) if !text.is_empty() => text,
        _ => return Err(ValidationError::MissingData),
    };
    let request: FindRequest = serde_json::from_str(data)?;
    Ok(request)
}

/// Runs a validated needle query. No match is not an error: an empty
/// result is a successful response.
#[instrument(skip_all, name = "find_workflow", fields(off = %request.off))]
pub fn run(request: &FindRequest, store: &CacheStore) -> Result<Vec<MatchedFragment>, FindError> {
    if request.off.is_empty() {
        return Err(ValidationError::MissingKey.into());
    }
    if request.needle.is_empty() {
        return Err(ValidationError::MissingNeedle.into());
    }
    request
        .molecule
        .validate()
        .map_err(ValidationError::Molecule)?;

    let needle: BTreeSet<u32> = request.needle.iter().copied().collect();
    let fragments = finder::find_fragments(store, &request.off, &needle, &request.molecule)?;
    Ok(fragments)
}

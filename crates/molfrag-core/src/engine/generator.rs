//! The repository build: bounded parallel fan-out of tool invocations
//! over every reference molecule, aggregation of the results, and the
//! missing-atom computation.
//!
//! The query's exchange artifact is written once to a named temp file
//! before the fan-out and is read-only from then on; it is dropped (and
//! deleted) only after the last worker has completed. Results keep the
//! repository listing order regardless of completion order. The first
//! failed invocation aborts the batch; sibling invocations drain and
//! their results are discarded.

use super::error::GeneratorError;
use super::repository::Repository;
use super::tool::FragmentTool;
use crate::core::io::lgf;
use crate::core::models::fragment::{Aggregate, MoleculeFragmentSet};
use crate::core::typing::TypedMolecule;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::io::{self, Write};
use tracing::{debug, info, instrument};

/// Default width of the worker pool driving tool invocations.
pub const DEFAULT_POOL_WIDTH: usize = 16;

/// Runs one full build of `repository` against an already classified
/// query molecule.
#[instrument(skip_all, fields(repository = %repository.name, shell_size = shell_size))]
pub fn build_aggregate(
    tool: &dyn FragmentTool,
    repository: &Repository,
    shell_size: u32,
    query: &TypedMolecule,
    pool_width: usize,
) -> Result<Aggregate, GeneratorError> {
    info!(
        references = repository.references.len(),
        pool_width, "Starting repository build"
    );

    let mut artifact = tempfile::NamedTempFile::new()?;
    artifact.write_all(lgf::to_exchange_string(query).as_bytes())?;
    artifact.flush()?;

    let molecule_sets = fan_out(tool, repository, shell_size, &artifact, pool_width)?;
    let missing_atoms = missing_atoms(query, &molecule_sets);

    info!(
        molecules = molecule_sets.len(),
        missing = missing_atoms.len(),
        "Repository build finished"
    );

    Ok(Aggregate {
        molecule_sets,
        missing_atoms,
    })
}

fn fan_out(
    tool: &dyn FragmentTool,
    repository: &Repository,
    shell_size: u32,
    artifact: &tempfile::NamedTempFile,
    pool_width: usize,
) -> Result<Vec<MoleculeFragmentSet>, GeneratorError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(pool_width.max(1))
        .build()
        .map_err(|e| GeneratorError::Io(io::Error::other(e)))?;

    // Collecting into Result keeps listing order on success and stops
    // handing out new work after the first error.
    let molecule_sets: Vec<MoleculeFragmentSet> = pool.install(|| {
        repository
            .references
            .par_iter()
            .map(|reference| {
                tool.partition(shell_size, &reference.id, artifact.path(), &reference.path)
            })
            .collect::<Result<Vec<_>, _>>()
    })?;

    let non_empty: Vec<MoleculeFragmentSet> = molecule_sets
        .into_iter()
        .filter(|set| !set.fragments.is_empty())
        .collect();

    debug!(kept = non_empty.len(), "Dropped empty fragment sets");
    Ok(non_empty)
}

/// The query atoms no returned fragment covers, as primary or as paired
/// id. Disjoint from the covered set by construction.
fn missing_atoms(query: &TypedMolecule, molecule_sets: &[MoleculeFragmentSet]) -> BTreeSet<u32> {
    let covered: BTreeSet<u32> = molecule_sets
        .iter()
        .flat_map(|set| &set.fragments)
        .flat_map(|fragment| fragment.covered_ids())
        .collect();

    query
        .atom_ids()
        .into_iter()
        .filter(|id| !covered.contains(id))
        .collect()
}

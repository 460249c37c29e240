//! Substructure queries against a cached aggregate.
//!
//! A needle matches a fragment when the fragment's primary atom ids are
//! a superset of the needle. Bonds of a match are not taken from the
//! reference molecule (the aggregate retains no reference bond data);
//! they are re-derived against the caller-supplied query molecule.

use super::cache::CacheStore;
use super::error::FinderError;
use crate::core::models::fragment::{Fragment, MatchedAtom, MatchedFragment};
use crate::core::models::molecule::Molecule;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Loads the aggregate under `key` and returns every fragment matching
/// `needle`, in aggregate order. An empty result is a valid, successful
/// response.
#[instrument(skip(store, query))]
pub fn find_fragments(
    store: &CacheStore,
    key: &str,
    needle: &BTreeSet<u32>,
    query: &Molecule,
) -> Result<Vec<MatchedFragment>, FinderError> {
    let aggregate = store.load(key)?;

    let mut matches = Vec::new();
    for molecule_set in &aggregate.molecule_sets {
        for fragment in &molecule_set.fragments {
            if fragment.primary_ids().is_superset(needle) {
                matches.push(reconstruct(&molecule_set.reference_id, fragment, query));
            }
        }
    }

    debug!(matches = matches.len(), "Needle query finished");
    Ok(matches)
}

fn reconstruct(reference_id: &str, fragment: &Fragment, query: &Molecule) -> MatchedFragment {
    let atoms: Vec<MatchedAtom> = fragment
        .pairs
        .iter()
        .map(|pair| MatchedAtom {
            id: pair.id1,
            charge: pair.charge,
            paired_id: pair.id2,
        })
        .collect();

    let covered = fragment.covered_ids();
    let bonds = query
        .bonds()
        .iter()
        .filter(|bond| covered.contains(&bond.a1) && covered.contains(&bond.a2))
        .copied()
        .collect();

    MatchedFragment {
        reference_id: reference_id.to_string(),
        atoms,
        bonds,
    }
}

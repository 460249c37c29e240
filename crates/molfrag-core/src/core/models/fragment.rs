use super::molecule::Bond;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One matched atom of a fragment: a primary atom id, the id of an
/// attached hydrogen it is paired with (or the primary id itself when
/// unpaired), and a partial charge.
///
/// Historical producers sometimes omit `id2`; deserialization fills it
/// with `id1` so the rest of the system only ever sees the full triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FragmentPair {
    pub id1: u32,
    pub id2: u32,
    pub charge: f64,
}

impl<'de> Deserialize<'de> for FragmentPair {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            id1: u32,
            id2: Option<u32>,
            charge: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(FragmentPair {
            id1: raw.id1,
            id2: raw.id2.unwrap_or(raw.id1),
            charge: raw.charge,
        })
    }
}

/// A bounded cluster of paired atoms anchored on one matched query atom
/// within a reference molecule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub pairs: Vec<FragmentPair>,
}

impl Fragment {
    /// The primary atom ids of this fragment, the set a needle is
    /// matched against.
    pub fn primary_ids(&self) -> BTreeSet<u32> {
        self.pairs.iter().map(|p| p.id1).collect()
    }

    /// All atom ids this fragment covers, primaries and paired
    /// hydrogens alike.
    pub fn covered_ids(&self) -> BTreeSet<u32> {
        self.pairs.iter().flat_map(|p| [p.id1, p.id2]).collect()
    }
}

/// All fragments one reference molecule yielded for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoleculeFragmentSet {
    pub reference_id: String,
    pub fragments: Vec<Fragment>,
}

/// The persisted result of one repository build: every non-empty
/// per-molecule fragment set plus the query atoms no fragment covered.
///
/// Written once under its cache key and treated as immutable afterwards;
/// the matcher only ever reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub molecule_sets: Vec<MoleculeFragmentSet>,
    pub missing_atoms: BTreeSet<u32>,
}

/// A single atom of a query result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedAtom {
    pub id: u32,
    pub charge: f64,
    pub paired_id: u32,
}

/// A fragment that matched a needle, with its bonds reconstructed
/// against the caller's query molecule. Built per query, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedFragment {
    pub reference_id: String,
    pub atoms: Vec<MatchedAtom>,
    pub bonds: Vec<Bond>,
}

//! # Atom Type Classification
//!
//! Maps each atom of a query molecule to the numeric type code consumed
//! by the external fragment-partitioning tool, using only the atom's
//! element and its 1- and 2-hop bonding environment.
//!
//! The rule table is a fixed contract with the tool's force-field typing
//! and is evaluated in a fixed order; several rules depend on bond
//! declaration order (e.g. hydrogen looks at its *first* bonded atom),
//! so classification is deterministic for a given molecule but sensitive
//! to how the caller listed its bonds. Unsupported elements fail with an
//! error naming the element rather than defaulting, so callers can
//! report exactly what blocked classification.

use super::models::molecule::{AROMATIC_BOND, Atom, Bond, DOUBLE_BOND, Molecule};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypingError {
    #[error("Encountered element of type {element} (atom {atom_id})")]
    UnknownElement { element: String, atom_id: u32 },
}

/// An atom that has been assigned its external-tool type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedAtom {
    pub id: u32,
    pub type_code: u8,
}

/// A fully classified molecule, ready for exchange-format encoding.
///
/// Atoms appear in the same order as in the source molecule; bonds are
/// carried over untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedMolecule {
    pub atoms: Vec<TypedAtom>,
    pub bonds: Vec<Bond>,
}

impl TypedMolecule {
    pub fn atom_ids(&self) -> Vec<u32> {
        self.atoms.iter().map(|a| a.id).collect()
    }
}

/// Classifies a single atom. Pure: reads the molecule's bond graph and
/// mutates nothing.
pub fn classify_atom(molecule: &Molecule, atom: &Atom) -> Result<u8, TypingError> {
    let neighbors = molecule.bonded_atoms(atom.id, None);

    let code = match atom.element.as_str() {
        "C" => {
            if count_element(&neighbors, "H") == 0 {
                13
            } else {
                12
            }
        }
        "H" => match neighbors.first() {
            Some(first) if first.element == "C" => 20,
            _ => 21,
        },
        "O" => {
            if neighbors.len() > 1 && count_element(&neighbors, "C") == neighbors.len() {
                4
            } else if neighbors.len() > 1 {
                3
            } else if neighbors.first().is_some_and(|only| {
                count_element(&molecule.bonded_atoms(only.id, Some(DOUBLE_BOND)), "O") > 1
            }) {
                2
            } else {
                1
            }
        }
        "N" => {
            if neighbors.len() > 3 {
                8
            } else if neighbors.len() == 1 {
                9
            } else if molecule.bonded_atoms(atom.id, Some(AROMATIC_BOND)).len() > 1 {
                9
            } else if count_element(&neighbors, "H") < 2 {
                6
            } else {
                7
            }
        }
        "S" => {
            if neighbors.len() > 2 {
                42
            } else {
                23
            }
        }
        "P" => 30,
        "Si" => 31,
        "F" => 32,
        "Cl" => 33,
        "Br" => 34,
        _ => {
            return Err(TypingError::UnknownElement {
                element: atom.element.clone(),
                atom_id: atom.id,
            });
        }
    };

    Ok(code)
}

/// Classifies every atom of the molecule, failing on the first atom
/// whose element is not in the rule table.
pub fn classify_molecule(molecule: &Molecule) -> Result<TypedMolecule, TypingError> {
    let atoms = molecule
        .atoms()
        .iter()
        .map(|atom| {
            classify_atom(molecule, atom).map(|type_code| TypedAtom {
                id: atom.id,
                type_code,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TypedMolecule {
        atoms,
        bonds: molecule.bonds().to_vec(),
    })
}

fn count_element(atoms: &[&Atom], element: &str) -> usize {
    atoms.iter().filter(|a| a.element == element).count()
}

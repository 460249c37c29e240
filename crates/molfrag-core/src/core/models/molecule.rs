use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bond type code for aromatic bonds in the query wire format.
pub const AROMATIC_BOND: u8 = 5;
/// Bond type code for double bonds in the query wire format.
pub const DOUBLE_BOND: u8 = 2;

/// An atom of a query molecule, identified by a caller-assigned id.
///
/// The element is kept as the raw string from the wire format; the
/// classifier decides which elements are supported and fails loudly on
/// the rest instead of defaulting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    pub id: u32,
    pub element: String,
}

/// An undirected bond between two atom ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    pub a1: u32,
    pub a2: u32,
    #[serde(rename = "bondType")]
    pub bond_type: u8,
}

impl Bond {
    pub fn is_aromatic(&self) -> bool {
        self.bond_type == AROMATIC_BOND
    }

    /// Returns the endpoint opposite to `id`, or `None` if `id` is not
    /// an endpoint of this bond.
    pub fn partner(&self, id: u32) -> Option<u32> {
        if self.a1 == id {
            Some(self.a2)
        } else if self.a2 == id {
            Some(self.a1)
        } else {
            None
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("Duplicate atom id: {0}")]
    DuplicateAtomId(u32),
    #[error("Bond ({a1}, {a2}) references unknown atom id {missing}")]
    DanglingBond { a1: u32, a2: u32, missing: u32 },
}

/// An in-memory molecular graph: a list of atoms and the bonds between
/// them.
///
/// Adjacency is answered by linear scans over the bond list. Molecules
/// in this system are tens to low hundreds of atoms, so no precomputed
/// index is kept; scan results follow bond declaration order, which the
/// classifier relies on for its first-neighbor rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
}

impl Molecule {
    /// Builds a molecule and checks its structural invariants: atom ids
    /// are unique and every bond endpoint resolves to a known atom.
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Result<Self, MoleculeError> {
        let mol = Self { atoms, bonds };
        mol.check()?;
        Ok(mol)
    }

    fn check(&self) -> Result<(), MoleculeError> {
        for (i, atom) in self.atoms.iter().enumerate() {
            if self.atoms[..i].iter().any(|a| a.id == atom.id) {
                return Err(MoleculeError::DuplicateAtomId(atom.id));
            }
        }
        for bond in &self.bonds {
            for endpoint in [bond.a1, bond.a2] {
                if self.atom(endpoint).is_none() {
                    return Err(MoleculeError::DanglingBond {
                        a1: bond.a1,
                        a2: bond.a2,
                        missing: endpoint,
                    });
                }
            }
        }
        Ok(())
    }

    /// Re-validates a molecule that arrived through deserialization,
    /// which bypasses [`Molecule::new`].
    pub fn validate(&self) -> Result<(), MoleculeError> {
        self.check()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Exact id lookup.
    pub fn atom(&self, id: u32) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.id == id)
    }

    /// All atoms connected to `id`, optionally restricted to bonds of a
    /// given type. Duplicate bonds are a caller error and are not
    /// normalized here.
    pub fn bonded_atoms(&self, id: u32, bond_type: Option<u8>) -> Vec<&Atom> {
        self.bonds
            .iter()
            .filter(|b| bond_type.is_none_or(|t| b.bond_type == t))
            .filter_map(|b| b.partner(id))
            .filter_map(|partner| self.atom(partner))
            .collect()
    }

    /// The ids of all atoms, in declaration order.
    pub fn atom_ids(&self) -> Vec<u32> {
        self.atoms.iter().map(|a| a.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(id: u32, element: &str) -> Atom {
        Atom {
            id,
            element: element.to_string(),
        }
    }

    fn bond(a1: u32, a2: u32, bond_type: u8) -> Bond {
        Bond { a1, a2, bond_type }
    }

    #[test]
    fn new_rejects_duplicate_atom_ids() {
        let result = Molecule::new(vec![atom(1, "C"), atom(1, "H")], vec![]);
        assert_eq!(result.unwrap_err(), MoleculeError::DuplicateAtomId(1));
    }

    #[test]
    fn new_rejects_bonds_with_unknown_endpoints() {
        let result = Molecule::new(vec![atom(1, "C")], vec![bond(1, 9, 1)]);
        assert_eq!(
            result.unwrap_err(),
            MoleculeError::DanglingBond {
                a1: 1,
                a2: 9,
                missing: 9
            }
        );
    }

    #[test]
    fn atom_lookup_finds_existing_and_misses_absent() {
        let mol = Molecule::new(vec![atom(1, "C"), atom(2, "H")], vec![]).unwrap();
        assert_eq!(mol.atom(2).unwrap().element, "H");
        assert!(mol.atom(3).is_none());
    }

    #[test]
    fn bonded_atoms_follows_bond_declaration_order() {
        let mol = Molecule::new(
            vec![atom(1, "C"), atom(2, "H"), atom(3, "O"), atom(4, "N")],
            vec![bond(3, 1, 1), bond(1, 2, 1), bond(4, 1, 2)],
        )
        .unwrap();

        let neighbors: Vec<u32> = mol.bonded_atoms(1, None).iter().map(|a| a.id).collect();
        assert_eq!(neighbors, vec![3, 2, 4]);
    }

    #[test]
    fn bonded_atoms_honors_bond_type_filter() {
        let mol = Molecule::new(
            vec![atom(1, "C"), atom(2, "O"), atom(3, "O")],
            vec![bond(1, 2, DOUBLE_BOND), bond(1, 3, 1)],
        )
        .unwrap();

        let doubles: Vec<u32> = mol
            .bonded_atoms(1, Some(DOUBLE_BOND))
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(doubles, vec![2]);
    }

    #[test]
    fn aromatic_bond_detection_uses_type_five() {
        assert!(bond(1, 2, AROMATIC_BOND).is_aromatic());
        assert!(!bond(1, 2, 1).is_aromatic());
    }

    #[test]
    fn deserializes_wire_format() {
        let json = r#"{
            "atoms": [{"id": 1, "element": "C"}, {"id": 2, "element": "H"}],
            "bonds": [{"a1": 1, "a2": 2, "bondType": 1}]
        }"#;
        let mol: Molecule = serde_json::from_str(json).unwrap();
        mol.validate().unwrap();
        assert_eq!(mol.atoms().len(), 2);
        assert_eq!(mol.bonds()[0].bond_type, 1);
    }
}

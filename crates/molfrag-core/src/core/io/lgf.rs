//! Writer for the external partitioning tool's graph exchange format: a
//! plain-text node table followed by an edge table.
//!
//! Only encoding is supported; the tool's *results* come back as JSON
//! and are decoded by the engine. The geometry and charge columns are
//! placeholders the tool ignores on input, but the column layout
//! (including the trailing tab per data row) is a byte-level contract
//! and must not be "cleaned up".

use crate::core::typing::TypedMolecule;
use std::io::{self, Write};

/// Writes the node and edge tables for a classified molecule.
pub fn write_exchange(molecule: &TypedMolecule, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "@nodes")?;
    writeln!(
        writer,
        "partial_charge\tlabel\tlabel2\tatomType\tcoordX\tcoordY\tcoordZ\tinitColor\t"
    )?;
    for atom in &molecule.atoms {
        writeln!(writer, "0\t{}\tX\t{}\t0\t0\t0\t0\t", atom.id, atom.type_code)?;
    }

    writeln!(writer, "@edges")?;
    writeln!(writer, "\t\tlabel")?;
    for (index, bond) in molecule.bonds.iter().enumerate() {
        writeln!(writer, "{}\t{}\t{}\t", bond.a1, bond.a2, index)?;
    }

    Ok(())
}

/// Convenience wrapper returning the exchange text as a `String`.
pub fn to_exchange_string(molecule: &TypedMolecule) -> String {
    let mut buffer = Vec::new();
    // Writing to a Vec<u8> cannot fail.
    write_exchange(molecule, &mut buffer).expect("in-memory write");
    String::from_utf8(buffer).expect("exchange text is ASCII")
}

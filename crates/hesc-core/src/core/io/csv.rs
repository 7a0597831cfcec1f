use super::traits::{ExportError, StructureWriter};
use crate::core::models::structure::DecodedStructure;
use serde::Serialize;
use std::io::Write;

/// Writes a decoded structure as a flat CSV table with one row per atom.
pub struct CsvFile;

#[derive(Debug, Serialize)]
struct AtomRow<'a> {
    model: usize,
    chain: &'a str,
    group: &'a str,
    group_number: i32,
    insertion_code: char,
    polymer_type: u8,
    atom: &'a str,
    serial: usize,
    alt_loc: char,
    element: &'a str,
    x: f64,
    y: f64,
    z: f64,
    occupancy: f64,
    b_factor: f64,
}

impl StructureWriter for CsvFile {
    fn write_to(structure: &DecodedStructure, writer: &mut impl Write) -> Result<(), ExportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for (model, chain, group, atom) in structure.atoms_in_order() {
            csv_writer.serialize(AtomRow {
                model: model.index,
                chain: &chain.id,
                group: &group.name,
                group_number: group.number,
                insertion_code: group.insertion_code,
                polymer_type: group.polymer_type.code(),
                atom: &atom.name,
                serial: atom.serial,
                alt_loc: atom.alt_loc,
                element: &atom.element,
                x: atom.position.x,
                y: atom.position.y,
                z: atom.position.z,
                occupancy: atom.occupancy,
                b_factor: atom.b_factor,
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

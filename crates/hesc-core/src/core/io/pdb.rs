use super::traits::{ExportError, StructureWriter};
use crate::core::models::structure::{DecodedAtom, DecodedGroup, DecodedStructure};
use crate::core::utils::identifiers::{guess_element, is_standard_residue};
use std::io::Write;

const MAX_SERIAL: usize = 99_999;

/// Writes a decoded structure as PDB coordinate records.
pub struct PdbFile;

/// Pads an atom name into the four-column PDB field, with one-letter elements starting
/// in the second column.
fn atom_name_field(name: &str, element: &str) -> String {
    if name.len() < 4 && element.len() < 2 {
        format!(" {:<3}", name)
    } else {
        format!("{:<4}", name)
    }
}

fn format_atom_line(chain_id: &str, group: &DecodedGroup, atom: &DecodedAtom) -> String {
    let standard = is_standard_residue(&group.name);
    let record_type = if standard { "ATOM" } else { "HETATM" };
    let element = if atom.element.is_empty() {
        guess_element(&atom.name, standard)
    } else {
        atom.element.clone()
    };
    let chain_char = chain_id.chars().next().unwrap_or(' ');

    format!(
        "{:<6}{:>5} {}{:1}{:>3} {:1}{:>4}{:1}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
        record_type,
        atom.serial % (MAX_SERIAL + 1),
        atom_name_field(&atom.name, &element),
        atom.alt_loc,
        group.name,
        chain_char,
        group.number,
        group.insertion_code,
        atom.position.x,
        atom.position.y,
        atom.position.z,
        atom.occupancy,
        atom.b_factor,
        element
    )
}

impl StructureWriter for PdbFile {
    fn write_to(structure: &DecodedStructure, writer: &mut impl Write) -> Result<(), ExportError> {
        writeln!(writer, "REMARK   1 GENERATED BY HESC DECODER")?;
        let multi_model = structure.models().len() > 1;

        for model in structure.models() {
            if multi_model {
                writeln!(writer, "MODEL     {:>4}", model.index + 1)?;
            }
            for (_, chain) in structure.chains_in_model(model) {
                let mut last: Option<(&DecodedGroup, usize)> = None;
                for (_, group) in structure.groups_in_chain(chain) {
                    for (_, atom) in structure.atoms_in_group(group) {
                        writeln!(writer, "{}", format_atom_line(&chain.id, group, atom))?;
                        last = Some((group, atom.serial));
                    }
                }
                if let Some((group, serial)) = last {
                    writeln!(
                        writer,
                        "TER   {:>5}      {:>3} {:1}{:>4}{:1}",
                        (serial + 1) % (MAX_SERIAL + 1),
                        group.name,
                        chain.id.chars().next().unwrap_or(' '),
                        group.number,
                        group.insertion_code
                    )?;
                }
            }
            if multi_model {
                writeln!(writer, "ENDMDL")?;
            }
        }

        writeln!(writer, "END")?;
        Ok(())
    }
}

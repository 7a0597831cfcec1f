use phf::{Set, phf_set};

static STANDARD_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    "SEC", "PYL", "UNK",
    "A", "C", "G", "U", "I", "N",
    "DA", "DC", "DG", "DT", "DI", "DU", "DN",
};

static TWO_LETTER_ELEMENTS: Set<&'static str> = phf_set! {
    "FE", "ZN", "MG", "MN", "CA", "CL", "BR", "NA", "CU", "CO", "NI", "CD", "HG", "SE",
};

/// Whether a residue name belongs to the standard polymer residues (written as ATOM).
pub fn is_standard_residue(residue_name: &str) -> bool {
    STANDARD_RESIDUE_NAMES.contains(residue_name.trim())
}

/// Best-effort element symbol for an atom whose element field is blank.
///
/// Atom names of standard residues start with their element letter (`CA` is an
/// alpha carbon); for hetero groups a two-letter metal or halogen name is kept whole.
pub fn guess_element(atom_name: &str, standard_residue: bool) -> String {
    let name = atom_name.trim().trim_start_matches(|c: char| c.is_ascii_digit());
    let upper = name.to_ascii_uppercase();
    if !standard_residue {
        if let Some(prefix) = upper.get(..2).filter(|p| TWO_LETTER_ELEMENTS.contains(*p)) {
            return prefix.to_string();
        }
    }
    upper
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_string())
        .unwrap_or_default()
}

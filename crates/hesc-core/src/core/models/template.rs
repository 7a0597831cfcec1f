use crate::core::codec::constants::{NUCLEOTIDE_BOND_LENGTH, PEPTIDE_BOND_LENGTH};
use std::fmt;
use thiserror::Error;

/// Bit flags attached to a group template on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GroupFlags(u8);

impl GroupFlags {
    pub const AMINO_ACID: u8 = 1;
    pub const NUCLEOTIDE: u8 = 1 << 1;
    pub const NON_POLYMER: u8 = 1 << 2;
    pub const HEAD: u8 = 1 << 3;
    pub const TAIL: u8 = 1 << 4;

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_amino_acid(&self) -> bool {
        self.0 & Self::AMINO_ACID != 0
    }

    pub fn is_nucleotide(&self) -> bool {
        self.0 & Self::NUCLEOTIDE != 0
    }

    pub fn is_non_polymer(&self) -> bool {
        self.0 & Self::NON_POLYMER != 0
    }

    /// The group carries the atom that bonds to the previous group (N or P).
    pub fn has_head(&self) -> bool {
        self.0 & Self::HEAD != 0
    }

    /// The group carries the atom that bonds to the next group (C or O3').
    pub fn has_tail(&self) -> bool {
        self.0 & Self::TAIL != 0
    }

    pub fn polymer_type(&self) -> PolymerType {
        if self.is_amino_acid() {
            PolymerType::AminoAcid
        } else if self.is_nucleotide() {
            PolymerType::Nucleotide
        } else {
            PolymerType::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolymerType {
    #[default]
    Other,
    AminoAcid,
    Nucleotide,
}

impl PolymerType {
    /// Numeric code reported to sinks (0 other, 1 amino acid, 2 nucleotide).
    pub fn code(&self) -> u8 {
        match self {
            PolymerType::Other => 0,
            PolymerType::AminoAcid => 1,
            PolymerType::Nucleotide => 2,
        }
    }

    /// Bond length between the previous group's tail atom and this group's head atom.
    pub fn linkage_bond_length(&self) -> i32 {
        match self {
            PolymerType::AminoAcid => PEPTIDE_BOND_LENGTH,
            PolymerType::Nucleotide => NUCLEOTIDE_BOND_LENGTH,
            PolymerType::Other => 0,
        }
    }

    pub fn tail_atom_name(&self) -> Option<&'static str> {
        match self {
            PolymerType::AminoAcid => Some("C"),
            PolymerType::Nucleotide => Some("O3'"),
            PolymerType::Other => None,
        }
    }
}

impl fmt::Display for PolymerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PolymerType::Other => "Other",
                PolymerType::AminoAcid => "AminoAcid",
                PolymerType::Nucleotide => "Nucleotide",
            }
        )
    }
}

/// One atom of a group template, with the bond used to predict its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateAtom {
    pub name: String,               // Atom name, padding removed (e.g., "CA", "O3'")
    pub element: String,            // Element symbol (e.g., "C", "FE")
    pub alt_loc: char,              // Alternate location indicator, ' ' if none
    pub predecessor: Option<usize>, // Earlier atom of the same group this atom is bonded to
    pub bond_length: i32,           // Nominal bond length to `predecessor` in wire units
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error(
        "Atom {atom} of group template '{group}' refers to atom {predecessor}, which is not decoded before it"
    )]
    ForwardPredecessor {
        group: String,
        atom: usize,
        predecessor: usize,
    },
}

/// De-duplicated description of one distinct group shape, shared by all its instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTemplate {
    pub name: String,
    pub insertion_code: char,
    pub flags: GroupFlags,
    atoms: Vec<TemplateAtom>,
}

impl GroupTemplate {
    /// Builds a template, rejecting bond tables that point at the atom itself or later atoms.
    pub fn new(
        name: &str,
        insertion_code: char,
        flags: GroupFlags,
        atoms: Vec<TemplateAtom>,
    ) -> Result<Self, TemplateError> {
        for (k, atom) in atoms.iter().enumerate() {
            if let Some(predecessor) = atom.predecessor {
                if predecessor >= k {
                    return Err(TemplateError::ForwardPredecessor {
                        group: name.to_string(),
                        atom: k,
                        predecessor,
                    });
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            insertion_code,
            flags,
            atoms,
        })
    }

    pub fn atoms(&self) -> &[TemplateAtom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn polymer_type(&self) -> PolymerType {
        self.flags.polymer_type()
    }

    /// Whether atom `k` is the polymer tail atom (C or O3') of this group.
    pub fn is_tail_atom(&self, k: usize) -> bool {
        self.atoms
            .get(k)
            .zip(self.flags.polymer_type().tail_atom_name())
            .is_some_and(|(atom, tail)| atom.name == tail)
    }
}

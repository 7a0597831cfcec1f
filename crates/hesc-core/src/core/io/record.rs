use std::fmt;

/// How a record announces the size of its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthForm {
    /// One length byte follows the tag.
    Short,
    /// A 4-byte big-endian length follows the tag.
    Long,
    /// No length and no body.
    None,
}

/// The closed set of record kinds a HESC stream may contain.
///
/// Short-form records use lower-case tags, long-form records upper-case ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordTag {
    Structure,
    Model,
    Chain,
    Group,
    GroupInfo,
    Sequence,
    Coordinates,
    BFactor,
    Occupancy,
    End,
}

impl RecordTag {
    pub const ALL: [RecordTag; 10] = [
        RecordTag::Structure,
        RecordTag::Model,
        RecordTag::Chain,
        RecordTag::Group,
        RecordTag::GroupInfo,
        RecordTag::Sequence,
        RecordTag::Coordinates,
        RecordTag::BFactor,
        RecordTag::Occupancy,
        RecordTag::End,
    ];

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b's' => Some(RecordTag::Structure),
            b'm' => Some(RecordTag::Model),
            b'c' => Some(RecordTag::Chain),
            b'g' => Some(RecordTag::Group),
            b'I' => Some(RecordTag::GroupInfo),
            b'Q' => Some(RecordTag::Sequence),
            b'X' => Some(RecordTag::Coordinates),
            b'T' => Some(RecordTag::BFactor),
            b'O' => Some(RecordTag::Occupancy),
            b'e' => Some(RecordTag::End),
            _ => None,
        }
    }

    pub fn byte(self) -> u8 {
        match self {
            RecordTag::Structure => b's',
            RecordTag::Model => b'm',
            RecordTag::Chain => b'c',
            RecordTag::Group => b'g',
            RecordTag::GroupInfo => b'I',
            RecordTag::Sequence => b'Q',
            RecordTag::Coordinates => b'X',
            RecordTag::BFactor => b'T',
            RecordTag::Occupancy => b'O',
            RecordTag::End => b'e',
        }
    }

    pub fn length_form(self) -> LengthForm {
        match self {
            RecordTag::Structure | RecordTag::Model | RecordTag::Chain | RecordTag::Group => {
                LengthForm::Short
            }
            RecordTag::GroupInfo
            | RecordTag::Sequence
            | RecordTag::Coordinates
            | RecordTag::BFactor
            | RecordTag::Occupancy => LengthForm::Long,
            RecordTag::End => LengthForm::None,
        }
    }

    /// Body length of records whose layout is fixed.
    pub fn fixed_length(self) -> Option<u8> {
        match self {
            RecordTag::Structure => Some(5),
            RecordTag::Model => Some(4),
            RecordTag::Chain => Some(12),
            _ => None,
        }
    }
}

impl fmt::Display for RecordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordTag::Structure => "STRUCTURE",
            RecordTag::Model => "MODEL",
            RecordTag::Chain => "CHAIN",
            RecordTag::Group => "GROUP",
            RecordTag::GroupInfo => "GINFO",
            RecordTag::Sequence => "SEQUENCE",
            RecordTag::Coordinates => "COORD",
            RecordTag::BFactor => "BFACTOR",
            RecordTag::Occupancy => "OCCUPANCY",
            RecordTag::End => "END",
        };
        write!(f, "{} ('{}')", name, self.byte() as char)
    }
}

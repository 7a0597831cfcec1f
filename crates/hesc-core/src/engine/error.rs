use thiserror::Error;

use crate::core::io::container::{ContainerError, FormatVersion};
use crate::core::io::record::RecordTag;
use crate::core::io::wire::WireError;
use crate::core::models::template::TemplateError;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("I/O error at byte {offset}: {source}")]
    Io {
        offset: u64,
        source: std::io::Error,
    },

    #[error("Stream truncated at byte {offset}: needed {needed} more byte(s)")]
    Truncated { offset: u64, needed: u64 },

    #[error("Unknown record tag 0x{tag:02x} at byte {offset}")]
    UnknownTag { tag: u8, offset: u64 },

    #[error("Invalid file format: magic number is {found:?}, expected \"HESC\"")]
    BadMagic { found: [u8; 4] },

    #[error("Unsupported format version {found} (supported: {supported})")]
    UnsupportedVersion {
        found: FormatVersion,
        supported: String,
    },

    #[error("Unsupported compression method {0}")]
    UnsupportedCompression(u8),

    #[error("Malformed {record} record at byte {offset}: {reason}")]
    MalformedRecord {
        record: RecordTag,
        offset: u64,
        reason: String,
    },

    #[error("{record} record at byte {offset} is out of order: {reason}")]
    MisplacedRecord {
        record: RecordTag,
        offset: u64,
        reason: &'static str,
    },

    #[error("Group instance {group} refers to template {template}, which was never registered")]
    UnknownTemplate { group: usize, template: i32 },

    #[error("Invalid bond table: {source}")]
    InvalidPredecessor {
        #[from]
        source: TemplateError,
    },

    #[error("No chain count registered for model {model}")]
    MissingModel { model: usize },

    #[error("No chain registered at index {index}")]
    MissingChain { index: usize },

    #[error("No group instance registered at index {index}")]
    MissingGroup { index: usize },

    #[error("B-factor record ran out of values at atom {atom}")]
    BFactorExhausted { atom: usize },

    #[error("Occupancy record ran out of values at atom {atom}")]
    OccupancyExhausted { atom: usize },
}

impl From<WireError> for DecodeError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::Io { offset, source } => DecodeError::Io { offset, source },
            WireError::Truncated { offset, needed } => DecodeError::Truncated { offset, needed },
        }
    }
}

impl From<ContainerError> for DecodeError {
    fn from(err: ContainerError) -> Self {
        match err {
            ContainerError::Wire(wire) => wire.into(),
            ContainerError::BadMagic { found } => DecodeError::BadMagic { found },
            ContainerError::UnsupportedVersion { found, supported } => {
                DecodeError::UnsupportedVersion { found, supported }
            }
            ContainerError::UnsupportedCompression(method) => {
                DecodeError::UnsupportedCompression(method)
            }
        }
    }
}

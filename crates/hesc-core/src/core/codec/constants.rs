//! Numeric constants of the HESC wire format.

/// Factor converting coordinates in Angstroms to the integers stored on the wire.
pub const XYZ_SCALE: f64 = 1000.0;

/// Factor converting occupancy and B-factor values to the integers stored on the wire.
pub const BO_SCALE: f64 = 100.0;

/// Occupancy used when the stream carries no occupancy record (1.00 after scaling).
pub const DEFAULT_OCCUPANCY: i32 = 100;

/// Standard peptide bond length (C - N) in wire units.
pub const PEPTIDE_BOND_LENGTH: i32 = 1325;

/// Standard phosphodiester linkage length (O3' - P) in wire units.
pub const NUCLEOTIDE_BOND_LENGTH: i32 = 1600;

/// Largest genuine value a 16-bit slot may carry.
pub const SHORT_MAX_VALUE: i32 = i16::MAX as i32 - 5;

/// Largest genuine value a 32-bit slot may carry.
pub const INT_MAX_VALUE: i32 = i32::MAX - 5;

const SHORT_WIDTH_CODE: i32 = 2;
const INT_WIDTH_CODE: i32 = 4;
const PACKED_WIDTH_CODE: i32 = 5;

/// 16-bit sentinel: following values are plain 32-bit integers.
pub const SHORT_TO_INT_MARKER: i32 = SHORT_MAX_VALUE + INT_WIDTH_CODE;
/// 16-bit sentinel: following values are packed triples.
pub const SHORT_TO_PACKED_MARKER: i32 = SHORT_MAX_VALUE + PACKED_WIDTH_CODE;

/// 32-bit sentinel: following values are 16-bit integers.
pub const INT_TO_SHORT_MARKER: i32 = INT_MAX_VALUE + SHORT_WIDTH_CODE;
/// 32-bit sentinel: following values are plain 32-bit integers.
pub const INT_TO_INT_MARKER: i32 = INT_MAX_VALUE + INT_WIDTH_CODE;
/// 32-bit sentinel: following values are packed triples.
pub const INT_TO_PACKED_MARKER: i32 = INT_MAX_VALUE + PACKED_WIDTH_CODE;

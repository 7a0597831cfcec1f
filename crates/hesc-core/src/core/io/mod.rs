//! Provides the byte-level plumbing of a HESC stream and the text exporters for its output.
//!
//! Reading is split into three layers: [`container`] sniffs gzip and validates the file
//! header, [`wire`] reads big-endian primitives while tracking the stream offset, and
//! [`record`] names the tagged records the engine dispatches on. Decoded structures leave
//! through the [`traits::StructureSink`] callbacks and can be written out as PDB or CSV.

pub mod collector;
pub mod container;
pub mod csv;
pub mod pdb;
pub mod record;
pub mod traits;
pub mod wire;

//! # HESC Decoder Library
//!
//! Decoding of the High Efficiency Structure Codec (HESC), a compact binary encoding of
//! macromolecular structures: models, chains, groups (residues), and atoms with their
//! coordinates, occupancies, and B-factors.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split throughout:
//!
//! - **[`core`]: The Foundation.** Stateless codecs (zig-zag, spherical delta packing, the
//!   adaptive-width integer stream), the topology and output data models, and byte-level I/O
//!   including the container header, the sink interface, and PDB/CSV exporters.
//!
//! - **[`engine`]: The Logic Core.** The stateful single pass over a record stream. The
//!   record interpreter registers templates and group instances, then the coordinate
//!   accumulator rebuilds absolute positions from chained deltas and pushes each atom to a
//!   sink.
//!
//! - **[`workflows`]: The Public API.** Entry points that open a (possibly gzip-compressed)
//!   container, validate its header, run the engine, and report a summary.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
pub(crate) mod testing;

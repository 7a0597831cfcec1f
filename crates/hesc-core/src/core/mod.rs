//! # Core Module
//!
//! The stateless foundation of the HESC decoder: wire codecs, the data model of a
//! structure's topology and decoded output, and byte-level I/O.
//!
//! ## Architecture
//!
//! - **Codecs** ([`codec`]) - Zig-zag mapping, the spherical delta codec, and the adaptive-width
//!   integer stream
//! - **Data Model** ([`models`]) - Group templates, topology tables, and the owned
//!   `DecodedStructure`
//! - **I/O** ([`io`]) - Container header and gzip handling, the big-endian wire reader, record
//!   tags, the sink interface, and PDB/CSV exporters
//! - **Utilities** ([`utils`]) - Residue and element name lookups
//!
//! Nothing in this module keeps state across calls; the per-decode state lives in
//! [`crate::engine`].

pub mod codec;
pub mod io;
pub mod models;
pub mod utils;

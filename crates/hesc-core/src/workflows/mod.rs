//! # Workflows Module
//!
//! One-call entry points that join the container layer, the decode engine, and a sink.
//!
//! - **Decode Workflow** ([`decode`]) - Decodes a HESC container from a reader, a byte
//!   slice, or a file path, either into a caller-supplied [`StructureSink`] or into an owned
//!   [`DecodedStructure`], and returns a [`decode::DecodeSummary`].
//!
//! [`StructureSink`]: crate::core::io::traits::StructureSink
//! [`DecodedStructure`]: crate::core::models::structure::DecodedStructure

pub mod decode;

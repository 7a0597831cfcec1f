//! The two bit-level codecs of the HESC format.
//!
//! - [`spherical`] packs a bonded coordinate offset into one 32-bit word.
//! - [`adaptive`] reads signed integers whose wire width switches in-band.
//! - [`zigzag`] is the signed/unsigned bijection both rely on.
//! - [`constants`] holds the scales, bond lengths, and sentinel values of the format.

pub mod adaptive;
pub mod constants;
pub mod spherical;
pub mod zigzag;

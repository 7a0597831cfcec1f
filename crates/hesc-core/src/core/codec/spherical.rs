//! Packing of a bonded coordinate offset into a single 32-bit word.
//!
//! For two atoms a known distance `D` apart, `dz` is almost determined by `dx`, `dy` and
//! `D`. The packed word therefore stores `dx`, `dy`, the small residual between the
//! predicted and the actual `|dz|`, and the sign of `dz`:
//!
//! | bits   | field                 |
//! |--------|-----------------------|
//! | 0..12  | zig-zag `dx`          |
//! | 12..24 | zig-zag `dy`          |
//! | 24..31 | zig-zag residual      |
//! | 31     | zig-zag sign (0 / -1) |
//!
//! `D` itself is never stored; the decoder must be handed the exact same value.

use super::zigzag;
use thiserror::Error;

const DELTA_BITS: u32 = 12;
const RESIDUAL_BITS: u32 = 7;

const DELTA_MIN: i32 = -(1 << (DELTA_BITS - 1));
const DELTA_MAX: i32 = (1 << (DELTA_BITS - 1)) - 1;
const RESIDUAL_MIN: i64 = -(1 << (RESIDUAL_BITS - 1));
const RESIDUAL_MAX: i64 = (1 << (RESIDUAL_BITS - 1)) - 1;

const DELTA_MASK: u32 = (1 << DELTA_BITS) - 1;
const RESIDUAL_MASK: u32 = (1 << RESIDUAL_BITS) - 1;

const DY_SHIFT: u32 = DELTA_BITS;
const RESIDUAL_SHIFT: u32 = 2 * DELTA_BITS;
const SIGN_SHIFT: u32 = RESIDUAL_SHIFT + RESIDUAL_BITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PackError {
    #[error("Offset component {axis} = {value} does not fit in 12 bits")]
    DeltaOutOfRange { axis: char, value: i32 },

    #[error("Offset ({dx}, {dy}) is longer than the bond length {distance}")]
    NegativeRadicand { distance: i32, dx: i32, dy: i32 },

    #[error("Residual {residual} between predicted and actual dz does not fit in 7 bits")]
    ResidualOutOfRange { residual: i64 },
}

/// Rounded length of the `z` leg of a right triangle with hypotenuse `distance`.
///
/// Returns `None` when `dx² + dy²` already exceeds `distance²`.
fn predicted_dz(distance: i32, dx: i32, dy: i32) -> Option<i64> {
    let (d, x, y) = (distance as i64, dx as i64, dy as i64);
    let radicand = d * d - x * x - y * y;
    if radicand < 0 {
        return None;
    }
    Some((radicand as f64).sqrt().round() as i64)
}

/// Packs `(dx, dy, dz)` into one word, using `distance` as the bond-length constraint.
pub fn encode(distance: i32, dx: i32, dy: i32, dz: i32) -> Result<u32, PackError> {
    if !(DELTA_MIN..=DELTA_MAX).contains(&dx) {
        return Err(PackError::DeltaOutOfRange { axis: 'x', value: dx });
    }
    if !(DELTA_MIN..=DELTA_MAX).contains(&dy) {
        return Err(PackError::DeltaOutOfRange { axis: 'y', value: dy });
    }

    let predicted =
        predicted_dz(distance, dx, dy).ok_or(PackError::NegativeRadicand { distance, dx, dy })?;
    let residual = predicted - (dz as i64).abs();
    if !(RESIDUAL_MIN..=RESIDUAL_MAX).contains(&residual) {
        return Err(PackError::ResidualOutOfRange { residual });
    }

    let sign = if dz < 0 { -1 } else { 0 };

    Ok(zigzag::encode(dx)
        | (zigzag::encode(dy) << DY_SHIFT)
        | (zigzag::encode(residual as i32) << RESIDUAL_SHIFT)
        | (zigzag::encode(sign) << SIGN_SHIFT))
}

/// Unpacks a word produced by [`encode`] with the same `distance`.
///
/// Never fails: a corrupted word decodes to some offset, which cannot be detected here.
pub fn decode(distance: i32, word: u32) -> (i32, i32, i32) {
    let dx = zigzag::decode(word & DELTA_MASK);
    let dy = zigzag::decode((word >> DY_SHIFT) & DELTA_MASK);
    let residual = zigzag::decode((word >> RESIDUAL_SHIFT) & RESIDUAL_MASK);
    let negative = zigzag::decode(word >> SIGN_SHIFT) != 0;

    let predicted = predicted_dz(distance, dx, dy).unwrap_or(0);
    let magnitude = (predicted - residual as i64) as i32;
    let dz = if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    };
    (dx, dy, dz)
}

//! Builders for hand-made HESC streams used as test fixtures.

use crate::core::codec::adaptive::WidthMode;
use crate::core::codec::constants::{
    INT_TO_INT_MARKER, INT_TO_PACKED_MARKER, INT_TO_SHORT_MARKER, SHORT_MAX_VALUE,
    SHORT_TO_INT_MARKER, SHORT_TO_PACKED_MARKER,
};
use crate::core::codec::spherical;
use crate::core::io::container::MAGIC;

pub(crate) struct FixtureAtom {
    pub name: &'static str,
    pub element: &'static str,
    pub alt_loc: u8,
    pub predecessor: i16,
    pub bond_length: i16,
}

pub(crate) fn atom(name: &'static str, predecessor: i16, bond_length: i16) -> FixtureAtom {
    FixtureAtom {
        name,
        element: &name[..1],
        alt_loc: b' ',
        predecessor,
        bond_length,
    }
}

pub(crate) struct FixtureGroup {
    pub name: &'static str,
    pub insertion_code: u8,
    pub flags: u8,
    pub atoms: Vec<FixtureAtom>,
}

fn padded<const N: usize>(text: &str) -> [u8; N] {
    let mut out = [b' '; N];
    for (slot, byte) in out.iter_mut().zip(text.bytes()) {
        *slot = byte;
    }
    out
}

/// Writes records in wire order. Nothing is validated, so malformed streams can be built too.
#[derive(Default)]
pub(crate) struct StreamWriter {
    buf: Vec<u8>,
}

impl StreamWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, major: u8, minor: u8, compression: u8) -> Self {
        self.buf.extend_from_slice(MAGIC);
        self.buf.extend_from_slice(&[major, minor, compression]);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn structure(mut self, model_count: i32, homogeneous: bool) -> Self {
        self.buf.extend_from_slice(&[b's', 5]);
        self.buf.extend_from_slice(&model_count.to_be_bytes());
        self.buf.push(homogeneous as u8);
        self
    }

    pub fn model(mut self, chain_count: i32) -> Self {
        self.buf.extend_from_slice(&[b'm', 4]);
        self.buf.extend_from_slice(&chain_count.to_be_bytes());
        self
    }

    pub fn chain(mut self, id: &str, sequence_index: i32, group_count: i32) -> Self {
        self.buf.extend_from_slice(&[b'c', 12]);
        self.buf.extend_from_slice(&sequence_index.to_be_bytes());
        self.buf.extend_from_slice(&padded::<4>(id));
        self.buf.extend_from_slice(&group_count.to_be_bytes());
        self
    }

    pub fn group(mut self, template: i32) -> Self {
        self.buf.extend_from_slice(&[b'g', 4]);
        self.buf.extend_from_slice(&template.to_be_bytes());
        self
    }

    pub fn numbered_group(mut self, template: i32, number: i32) -> Self {
        self.buf.extend_from_slice(&[b'g', 8]);
        self.buf.extend_from_slice(&template.to_be_bytes());
        self.buf.extend_from_slice(&number.to_be_bytes());
        self
    }

    pub fn group_info(mut self, group: &FixtureGroup) -> Self {
        let n = group.atoms.len();
        self.buf.push(b'I');
        self.buf.extend_from_slice(&((7 + 11 * n) as i32).to_be_bytes());
        self.buf.extend_from_slice(&(n as i16).to_be_bytes());
        self.buf.push(group.flags);
        self.buf.extend_from_slice(&padded::<3>(group.name));
        self.buf.push(group.insertion_code);
        for atom in &group.atoms {
            self.buf.extend_from_slice(&padded::<4>(atom.name));
            self.buf.extend_from_slice(&padded::<2>(atom.element));
            self.buf.push(atom.alt_loc);
        }
        for atom in &group.atoms {
            self.buf.extend_from_slice(&atom.predecessor.to_be_bytes());
        }
        for atom in &group.atoms {
            self.buf.extend_from_slice(&atom.bond_length.to_be_bytes());
        }
        self
    }

    pub fn sequence(mut self, sequence: &str) -> Self {
        self.buf.push(b'Q');
        self.buf.extend_from_slice(&(sequence.len() as i32).to_be_bytes());
        self.buf.extend_from_slice(sequence.as_bytes());
        self
    }

    pub fn coordinates(mut self, body: &[u8]) -> Self {
        self.buf.push(b'X');
        self.buf.extend_from_slice(&(body.len() as i32).to_be_bytes());
        self.buf.extend_from_slice(body);
        self
    }

    pub fn b_factors(mut self, body: &[u8]) -> Self {
        self.buf.push(b'T');
        self.buf.extend_from_slice(&(body.len() as i32).to_be_bytes());
        self.buf.extend_from_slice(body);
        self
    }

    pub fn occupancies(mut self, values: &[i16]) -> Self {
        self.buf.push(b'O');
        self.buf
            .extend_from_slice(&((values.len() * 2) as i32).to_be_bytes());
        for value in values {
            self.buf.extend_from_slice(&value.to_be_bytes());
        }
        self
    }

    pub fn end(mut self) -> Self {
        self.buf.push(b'e');
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Writes an adaptive-width value stream, inserting width sentinels as needed.
pub(crate) struct AdaptiveEncoder {
    buf: Vec<u8>,
    mode: WidthMode,
}

impl Default for AdaptiveEncoder {
    fn default() -> Self {
        Self {
            buf: Vec::new(),
            mode: WidthMode::Int,
        }
    }
}

impl AdaptiveEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_raw(&mut self, raw: i32) {
        match self.mode {
            WidthMode::Short => self.buf.extend_from_slice(&(raw as i16).to_be_bytes()),
            WidthMode::Int | WidthMode::Packed => self.buf.extend_from_slice(&raw.to_be_bytes()),
        }
    }

    pub fn switch_to(&mut self, mode: WidthMode) {
        let marker = match (self.mode, mode) {
            (from, to) if from == to => return,
            (WidthMode::Short, WidthMode::Int) => SHORT_TO_INT_MARKER,
            (WidthMode::Short, WidthMode::Packed) => SHORT_TO_PACKED_MARKER,
            (_, WidthMode::Short) => INT_TO_SHORT_MARKER,
            (WidthMode::Int, WidthMode::Packed) => INT_TO_PACKED_MARKER,
            (_, WidthMode::Int) => INT_TO_INT_MARKER,
            (WidthMode::Packed, WidthMode::Packed) => return,
        };
        self.write_raw(marker);
        self.mode = mode;
    }

    /// Appends a plain value in the narrowest width that holds it.
    pub fn push(&mut self, value: i32) {
        let fits_short = (i16::MIN as i32..=SHORT_MAX_VALUE).contains(&value);
        self.switch_to(if fits_short {
            WidthMode::Short
        } else {
            WidthMode::Int
        });
        self.write_raw(value);
    }

    /// Appends a value in 32-bit mode, even when it would fit in 16 bits.
    pub fn push_int(&mut self, value: i32) {
        self.switch_to(WidthMode::Int);
        self.write_raw(value);
    }

    /// Appends one coordinate delta, packed when the bond length allows it.
    ///
    /// Returns whether the packed form was used.
    pub fn push_delta(&mut self, bond_length: i32, [dx, dy, dz]: [i32; 3]) -> bool {
        match spherical::encode(bond_length, dx, dy, dz) {
            Ok(word) if bond_length > 0 => {
                self.switch_to(WidthMode::Packed);
                self.write_raw(word as i32);
                true
            }
            _ => {
                self.push(dx);
                self.push(dy);
                self.push(dz);
                false
            }
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

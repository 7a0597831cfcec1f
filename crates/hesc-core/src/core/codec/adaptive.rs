//! Variable-width signed integer stream with in-band width switches.
//!
//! Values are written as 16-bit, 32-bit, or packed-triple 32-bit words. An encoder
//! switches width by writing a sentinel just past the current width's legal maximum;
//! the decoder consumes the sentinel, changes mode, and keeps reading.

use super::constants::{
    INT_TO_INT_MARKER, INT_TO_PACKED_MARKER, INT_TO_SHORT_MARKER, SHORT_TO_INT_MARKER,
    SHORT_TO_PACKED_MARKER,
};
use crate::core::io::wire::{WireError, WireReader};
use std::io::Read;
use tracing::trace;

/// On-wire width of the values currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthMode {
    Short,
    #[default]
    Int,
    Packed,
}

impl WidthMode {
    /// Mode requested by `raw`, if `raw` is a sentinel recognized in this mode.
    fn switch_for(self, raw: i32) -> Option<WidthMode> {
        match self {
            WidthMode::Short => match raw {
                SHORT_TO_INT_MARKER => Some(WidthMode::Int),
                SHORT_TO_PACKED_MARKER => Some(WidthMode::Packed),
                _ => None,
            },
            WidthMode::Int => match raw {
                INT_TO_SHORT_MARKER => Some(WidthMode::Short),
                INT_TO_PACKED_MARKER => Some(WidthMode::Packed),
                _ => None,
            },
            WidthMode::Packed => match raw {
                INT_TO_SHORT_MARKER => Some(WidthMode::Short),
                INT_TO_INT_MARKER => Some(WidthMode::Int),
                _ => None,
            },
        }
    }
}

/// One decoded value together with the wire form it was read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveValue {
    pub value: i32,
    pub mode: WidthMode,
}

impl AdaptiveValue {
    pub fn is_packed(&self) -> bool {
        self.mode == WidthMode::Packed
    }
}

/// Width-mode state for one record body.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveIntDecoder {
    mode: WidthMode,
}

impl AdaptiveIntDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> WidthMode {
        self.mode
    }

    /// Returns the decoder to 32-bit mode, as required at the start of every record.
    pub fn reset(&mut self) {
        self.mode = WidthMode::Int;
    }

    /// Reads the next data value, consuming any width sentinels in front of it.
    pub fn next_value<R: Read>(
        &mut self,
        reader: &mut WireReader<R>,
    ) -> Result<AdaptiveValue, WireError> {
        loop {
            let raw = match self.mode {
                WidthMode::Short => reader.read_i16()? as i32,
                WidthMode::Int | WidthMode::Packed => reader.read_i32()?,
            };
            match self.mode.switch_for(raw) {
                Some(next) => {
                    trace!(from = ?self.mode, to = ?next, offset = reader.offset(), "width switch");
                    self.mode = next;
                }
                None => {
                    return Ok(AdaptiveValue {
                        value: raw,
                        mode: self.mode,
                    });
                }
            }
        }
    }

    /// Decodes every value of a fully buffered record body.
    pub fn decode_all(body: &[u8]) -> Result<Vec<i32>, WireError> {
        let mut decoder = Self::new();
        let mut reader = WireReader::new(body);
        let mut values = Vec::new();
        while reader.offset() < body.len() as u64 {
            values.push(decoder.next_value(&mut reader)?.value);
        }
        Ok(values)
    }
}

use std::io::{self, BufRead, Read};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("I/O error at byte {offset}: {source}")]
    Io { offset: u64, source: io::Error },

    #[error("Stream truncated at byte {offset}: needed {needed} more byte(s)")]
    Truncated { offset: u64, needed: u64 },
}

/// Big-endian cursor over a byte stream that remembers how far it has read.
#[derive(Debug)]
pub struct WireReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> WireReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf).map_err(|e| self.map_err(e, N as u64))?;
        self.offset += N as u64;
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i16(&mut self) -> Result<i16, WireError> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, WireError> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// Reads exactly `len` bytes without trusting `len` for the allocation size.
    pub fn read_bytes(&mut self, len: u64) -> Result<Vec<u8>, WireError> {
        let mut buf = Vec::new();
        let got = (&mut self.inner)
            .take(len)
            .read_to_end(&mut buf)
            .map_err(|e| WireError::Io {
                offset: self.offset,
                source: e,
            })? as u64;
        self.offset += got;
        if got < len {
            return Err(WireError::Truncated {
                offset: self.offset,
                needed: len - got,
            });
        }
        Ok(buf)
    }

    pub fn skip(&mut self, len: u64) -> Result<(), WireError> {
        let got = io::copy(&mut (&mut self.inner).take(len), &mut io::sink()).map_err(|e| {
            WireError::Io {
                offset: self.offset,
                source: e,
            }
        })?;
        self.offset += got;
        if got < len {
            return Err(WireError::Truncated {
                offset: self.offset,
                needed: len - got,
            });
        }
        Ok(())
    }

    fn map_err(&self, e: io::Error, needed: u64) -> WireError {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            WireError::Truncated {
                offset: self.offset,
                needed,
            }
        } else {
            WireError::Io {
                offset: self.offset,
                source: e,
            }
        }
    }
}

impl<R: BufRead> WireReader<R> {
    /// Returns `true` when no byte is left to read.
    pub fn is_exhausted(&mut self) -> Result<bool, WireError> {
        self.inner
            .fill_buf()
            .map(|buf| buf.is_empty())
            .map_err(|source| WireError::Io {
                offset: self.offset,
                source,
            })
    }
}

/// Decodes a fixed-width text token, dropping blank and NUL padding.
pub fn token_to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c == ' ' || c == '\0')
        .to_string()
}

/// Interprets a single byte as a character code, mapping NUL to a blank.
pub fn byte_to_char(byte: u8) -> char {
    if byte == 0 { ' ' } else { byte as char }
}

//! The HESC container: optional gzip wrapping plus a seven-byte header.
//!
//! ```text
//! +------+------+-------+-------------+---------
//! | HESC | major| minor | compression | records ...
//! +------+------+-------+-------------+---------
//!   4 B    1 B    1 B        1 B
//! ```

use super::wire::{WireError, WireReader};
use flate2::bufread::MultiGzDecoder;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::str::FromStr;
use thiserror::Error;

pub const MAGIC: &[u8; 4] = b"HESC";

pub const FILE_EXTENSION: &str = "hesc";

/// Compression-method bytes this decoder understands.
pub const SUPPORTED_COMPRESSION_METHODS: &[u8] = &[1];

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("Invalid file format: magic number is {found:?}, expected \"HESC\"")]
    BadMagic { found: [u8; 4] },

    #[error("Unsupported format version {found} (supported: {supported})")]
    UnsupportedVersion { found: FormatVersion, supported: String },

    #[error("Unsupported compression method {0}")]
    UnsupportedCompression(u8),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid format version '{0}'. Expected 'major.minor' (e.g., '0.0').")]
pub struct ParseVersionError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormatVersion {
    pub major: u8,
    pub minor: u8,
}

impl FormatVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for FormatVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s
            .trim()
            .split_once('.')
            .ok_or_else(|| ParseVersionError(s.to_string()))?;
        Ok(Self {
            major: major.parse().map_err(|_| ParseVersionError(s.to_string()))?,
            minor: minor.parse().map_err(|_| ParseVersionError(s.to_string()))?,
        })
    }
}

impl Serialize for FormatVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FormatVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub version: FormatVersion,
    pub compression_method: u8,
}

/// Reads and validates the header against the given table of supported versions.
pub fn read_header<R: Read>(
    reader: &mut WireReader<R>,
    supported: &[FormatVersion],
) -> Result<ContainerHeader, ContainerError> {
    let found: [u8; 4] = reader.read_array()?;
    if &found != MAGIC {
        return Err(ContainerError::BadMagic { found });
    }

    let version = FormatVersion {
        major: reader.read_u8()?,
        minor: reader.read_u8()?,
    };
    if !supported.contains(&version) {
        return Err(ContainerError::UnsupportedVersion {
            found: version,
            supported: supported
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    let compression_method = reader.read_u8()?;
    if !SUPPORTED_COMPRESSION_METHODS.contains(&compression_method) {
        return Err(ContainerError::UnsupportedCompression(compression_method));
    }

    Ok(ContainerHeader {
        version,
        compression_method,
    })
}

/// Counts the bytes pulled from the wrapped reader.
#[derive(Debug)]
pub struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R> CountingReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

/// Reader that transparently handles gzip compression.
///
/// Consecutive gzip members are decoded as one stream, so concatenated `.hesc.gz` files
/// read like one file holding several containers.
pub enum MaybeGzReader<R: BufRead> {
    /// Plain uncompressed reader
    Plain(R),
    /// Gzip-compressed reader
    Gzip(BufReader<MultiGzDecoder<R>>),
}

/// The reader [`open`] builds around a container source.
pub type ContainerInput<R> = MaybeGzReader<BufReader<CountingReader<R>>>;

impl<R: BufRead> MaybeGzReader<R> {
    pub fn is_gzip(&self) -> bool {
        matches!(self, MaybeGzReader::Gzip(_))
    }
}

impl<R: Read> ContainerInput<R> {
    /// Bytes taken from the source so far, counted before decompression.
    pub fn source_bytes_consumed(&self) -> u64 {
        let buffered = match self {
            MaybeGzReader::Plain(r) => r,
            MaybeGzReader::Gzip(r) => r.get_ref().get_ref(),
        };
        buffered.get_ref().count() - buffered.buffer().len() as u64
    }
}

impl<R: BufRead> Read for MaybeGzReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            MaybeGzReader::Plain(r) => r.read(buf),
            MaybeGzReader::Gzip(r) => r.read(buf),
        }
    }
}

impl<R: BufRead> BufRead for MaybeGzReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            MaybeGzReader::Plain(r) => r.fill_buf(),
            MaybeGzReader::Gzip(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            MaybeGzReader::Plain(r) => r.consume(amt),
            MaybeGzReader::Gzip(r) => r.consume(amt),
        }
    }
}

/// Wraps `reader`, decompressing it when it starts with the gzip magic bytes.
pub fn open<R: Read>(reader: R) -> io::Result<ContainerInput<R>> {
    let mut buffered = BufReader::new(CountingReader::new(reader));
    let head = buffered.fill_buf()?;
    if head.len() >= 2 && head[..2] == GZIP_MAGIC {
        Ok(MaybeGzReader::Gzip(BufReader::new(MultiGzDecoder::new(
            buffered,
        ))))
    } else {
        Ok(MaybeGzReader::Plain(buffered))
    }
}

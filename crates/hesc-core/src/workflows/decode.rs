use crate::core::io::collector::StructureCollector;
use crate::core::io::container::{self, ContainerHeader, ContainerInput, FILE_EXTENSION};
use crate::core::io::traits::StructureSink;
use crate::core::io::wire::WireReader;
use crate::core::models::structure::DecodedStructure;
use crate::engine::config::DecodeConfig;
use crate::engine::context::DecodeContext;
use crate::engine::error::DecodeError;
use crate::engine::interpreter;
use crate::engine::progress::{Progress, ProgressReporter};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// What a decode found, independent of where the atoms were sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeSummary {
    pub header: Option<ContainerHeader>, // `None` for a bare record stream
    pub compressed: bool,
    pub model_count: usize,
    pub homogeneous: bool,
    pub chain_count: usize,
    pub group_count: usize,
    pub template_count: usize,
    pub atom_count: usize,
    pub sequences: Vec<String>,
    /// Decompressed bytes of this structure, header included.
    pub stream_bytes: u64,
    /// Bytes of this structure as stored in the source, before decompression.
    pub source_bytes: u64,
    pub elapsed: Duration,
}

impl DecodeSummary {
    fn from_context(ctx: &DecodeContext<'_>) -> Self {
        let topology = &ctx.topology;
        Self {
            header: None,
            compressed: false,
            model_count: topology.model_count,
            homogeneous: topology.homogeneous,
            chain_count: topology.chains().len(),
            group_count: topology.groups().len(),
            template_count: topology.templates().len(),
            atom_count: ctx.atoms_emitted(),
            sequences: topology.sequences().to_vec(),
            stream_bytes: 0,
            source_bytes: 0,
            elapsed: Duration::ZERO,
        }
    }
}

fn run_records<R: Read, S: StructureSink>(
    reader: &mut WireReader<R>,
    sink: &mut S,
    config: &DecodeConfig,
    reporter: &ProgressReporter,
) -> Result<DecodeSummary, DecodeError> {
    let mut ctx = DecodeContext::new(config, reporter);
    interpreter::run(&mut ctx, reader, sink)?;
    Ok(DecodeSummary::from_context(&ctx))
}

/// Decodes a bare record stream (no container header, already decompressed) into `sink`.
#[instrument(skip_all, name = "decode_stream")]
pub fn decode_stream<R: Read, S: StructureSink>(
    reader: R,
    sink: &mut S,
    config: &DecodeConfig,
    reporter: &ProgressReporter,
) -> Result<DecodeSummary, DecodeError> {
    let started = Instant::now();
    let mut wire = WireReader::new(reader);
    let mut summary = run_records(&mut wire, sink, config, reporter)?;
    summary.stream_bytes = wire.offset();
    summary.source_bytes = wire.offset();
    summary.elapsed = started.elapsed();
    Ok(summary)
}

/// A source holding one or more HESC containers back to back.
///
/// The source is sniffed for gzip once; every container after that is read from the same
/// decompressed stream, so several structures written into one file (or several gzip
/// members concatenated) decode one after another.
pub struct ContainerStream<R: Read> {
    wire: WireReader<ContainerInput<R>>,
    compressed: bool,
}

impl<R: Read> ContainerStream<R> {
    pub fn new(reader: R) -> Result<Self, DecodeError> {
        let input =
            container::open(reader).map_err(|source| DecodeError::Io { offset: 0, source })?;
        Ok(Self {
            compressed: input.is_gzip(),
            wire: WireReader::new(input),
        })
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Decompressed bytes consumed so far, over every container read.
    pub fn stream_bytes(&self) -> u64 {
        self.wire.offset()
    }

    /// Source bytes consumed so far, before decompression.
    pub fn source_bytes(&self) -> u64 {
        self.wire.get_ref().source_bytes_consumed()
    }

    /// Decodes the next container into `sink`, or returns `Ok(None)` once the source is
    /// used up.
    ///
    /// A source that ends partway through a container is a [`DecodeError::Truncated`].
    #[instrument(skip_all, name = "decode_next", fields(offset = self.wire.offset()))]
    pub fn decode_next<S: StructureSink>(
        &mut self,
        sink: &mut S,
        config: &DecodeConfig,
        reporter: &ProgressReporter,
    ) -> Result<Option<DecodeSummary>, DecodeError> {
        if self.wire.is_exhausted()? {
            return Ok(None);
        }
        self.decode_one(sink, config, reporter).map(Some)
    }

    fn decode_one<S: StructureSink>(
        &mut self,
        sink: &mut S,
        config: &DecodeConfig,
        reporter: &ProgressReporter,
    ) -> Result<DecodeSummary, DecodeError> {
        let started = Instant::now();
        let stream_start = self.stream_bytes();
        let source_start = self.source_bytes();

        reporter.report(Progress::PhaseStart {
            name: "Reading header",
        });
        let header = container::read_header(&mut self.wire, &config.supported_versions)?;
        info!(
            version = %header.version,
            compressed = self.compressed,
            "Container header accepted."
        );
        reporter.report(Progress::PhaseFinish);

        let mut summary = run_records(&mut self.wire, sink, config, reporter)?;
        summary.header = Some(header);
        summary.compressed = self.compressed;
        summary.stream_bytes = self.stream_bytes() - stream_start;
        summary.source_bytes = self.source_bytes() - source_start;
        summary.elapsed = started.elapsed();
        info!(
            models = summary.model_count,
            chains = summary.chain_count,
            groups = summary.group_count,
            atoms = summary.atom_count,
            bytes = summary.stream_bytes,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Decoding finished."
        );
        Ok(summary)
    }
}

/// Decodes a HESC container, gzip-compressed or raw, into `sink`.
///
/// Only the first container of the source is read; use [`ContainerStream`] for sources
/// that hold several.
///
/// # Arguments
///
/// * `reader` - The container bytes, starting at the gzip or HESC magic.
/// * `sink` - Receives the decoded models, chains, groups, and atoms in order.
/// * `config` - Supported versions and strictness settings.
/// * `reporter` - Receives progress events.
///
/// # Errors
///
/// Returns a [`DecodeError`] on the first framing, header, or indexing error. Events
/// already delivered to `sink` are not retracted.
#[instrument(skip_all, name = "decode_reader")]
pub fn decode_reader<R: Read, S: StructureSink>(
    reader: R,
    sink: &mut S,
    config: &DecodeConfig,
    reporter: &ProgressReporter,
) -> Result<DecodeSummary, DecodeError> {
    ContainerStream::new(reader)?.decode_one(sink, config, reporter)
}

/// Decodes an in-memory container into an owned structure.
pub fn decode_bytes(
    bytes: &[u8],
    config: &DecodeConfig,
    reporter: &ProgressReporter,
) -> Result<(DecodedStructure, DecodeSummary), DecodeError> {
    let mut collector = StructureCollector::new();
    let summary = decode_reader(bytes, &mut collector, config, reporter)?;
    Ok((collector.finish(), summary))
}

/// Opens and decodes a container file into an owned structure.
#[instrument(skip_all, name = "decode_path", fields(path = %path.as_ref().display()))]
pub fn decode_path(
    path: impl AsRef<Path>,
    config: &DecodeConfig,
    reporter: &ProgressReporter,
) -> Result<(DecodedStructure, DecodeSummary), DecodeError> {
    let path = path.as_ref();
    if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
        warn!(
            "'{}' does not have a .{} extension; decoding anyway.",
            path.display(),
            FILE_EXTENSION
        );
    }
    let file = File::open(path).map_err(|source| DecodeError::Io { offset: 0, source })?;
    let mut collector = StructureCollector::new();
    let summary = decode_reader(file, &mut collector, config, reporter)?;
    Ok((collector.finish(), summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::container::FormatVersion;
    use crate::core::models::template::{GroupFlags, PolymerType};
    use crate::engine::config::DecodeConfigBuilder;
    use crate::testing::{AdaptiveEncoder, FixtureGroup, StreamWriter, atom};
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use std::sync::Mutex;

    fn glycine() -> FixtureGroup {
        FixtureGroup {
            name: "GLY",
            insertion_code: b' ',
            flags: GroupFlags::AMINO_ACID | GroupFlags::HEAD | GroupFlags::TAIL,
            atoms: vec![
                atom("N", -1, 0),
                atom("CA", 0, 1458),
                atom("C", 1, 1525),
                atom("O", 2, 1231),
            ],
        }
    }

    /// Coordinate deltas of a Gly-Gly dipeptide; the second N is placed from the first C.
    fn dipeptide_coordinates() -> Vec<u8> {
        let mut enc = AdaptiveEncoder::new();
        enc.push_delta(0, [10_000, 5_000, -3_000]);
        assert!(enc.push_delta(1458, [1200, 800, 200]));
        assert!(!enc.push_delta(1525, [-1000, 1100, 150]));
        assert!(enc.push_delta(1231, [300, -1100, -500]));
        assert!(enc.push_delta(1325, [901, 894, -398]));
        enc.push_delta(1458, [1200, 800, 200]);
        enc.push_delta(1525, [-1000, 1100, 150]);
        enc.push_delta(1231, [300, -1100, -500]);
        enc.finish()
    }

    fn dipeptide_container() -> Vec<u8> {
        let mut b = AdaptiveEncoder::new();
        for delta in [1000, 100, 100, 100, 200, 100, 100, 100] {
            b.push(delta);
        }
        StreamWriter::new()
            .header(0, 0, 1)
            .structure(1, false)
            .model(1)
            .sequence("GG")
            .group_info(&glycine())
            .chain("A", 0, 2)
            .group(0)
            .group(0)
            .b_factors(&b.finish())
            .occupancies(&[100, 100, 50, 50, 100, 100, 100, 25])
            .coordinates(&dipeptide_coordinates())
            .end()
            .finish()
    }

    fn milli(value: f64) -> i32 {
        (value * 1000.0).round() as i32
    }

    fn atom_rows(structure: &DecodedStructure) -> Vec<(String, [i32; 3], i32, i32)> {
        structure
            .atoms_in_order()
            .map(|(_, _, _, a)| {
                (
                    a.name.clone(),
                    [milli(a.position.x), milli(a.position.y), milli(a.position.z)],
                    (a.b_factor * 100.0).round() as i32,
                    (a.occupancy * 100.0).round() as i32,
                )
            })
            .collect()
    }

    #[test]
    fn dipeptide_round_trip_reproduces_every_atom_in_order() {
        let (structure, summary) = decode_bytes(
            &dipeptide_container(),
            &DecodeConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();

        let expected = vec![
            ("N", [10000, 5000, -3000], 1000, 100),
            ("CA", [11200, 5800, -2800], 1100, 100),
            ("C", [10200, 6900, -2650], 1200, 50),
            ("O", [10500, 5800, -3150], 1300, 50),
            ("N", [11101, 7794, -3048], 1400, 100),
            ("CA", [12301, 8594, -2848], 1500, 100),
            ("C", [11301, 9694, -2698], 1600, 100),
            ("O", [11601, 8594, -3198], 1700, 25),
        ];
        let expected: Vec<_> = expected
            .into_iter()
            .map(|(n, xyz, b, o)| (n.to_string(), xyz, b, o))
            .collect();
        assert_eq!(atom_rows(&structure), expected);

        let groups: Vec<_> = structure
            .chains_in_model(&structure.models()[0])
            .flat_map(|(_, c)| structure.groups_in_chain(c))
            .map(|(_, g)| (g.name.clone(), g.number, g.polymer_type))
            .collect();
        assert_eq!(
            groups,
            vec![
                ("GLY".to_string(), 1, PolymerType::AminoAcid),
                ("GLY".to_string(), 2, PolymerType::AminoAcid),
            ]
        );

        let stored = dipeptide_container().len() as u64;
        assert_eq!(
            summary,
            DecodeSummary {
                header: Some(ContainerHeader {
                    version: FormatVersion::new(0, 0),
                    compression_method: 1,
                }),
                compressed: false,
                model_count: 1,
                homogeneous: false,
                chain_count: 1,
                group_count: 2,
                template_count: 1,
                atom_count: 8,
                sequences: vec!["GG".to_string()],
                stream_bytes: stored,
                source_bytes: stored,
                elapsed: summary.elapsed,
            }
        );
    }

    #[test]
    fn gzip_and_raw_containers_decode_identically() {
        let raw = dipeptide_container();
        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        gz.write_all(&raw).unwrap();
        let compressed = gz.finish().unwrap();

        let config = DecodeConfig::default();
        let reporter = ProgressReporter::new();
        let (plain, plain_summary) = decode_bytes(&raw, &config, &reporter).unwrap();
        let (unzipped, gz_summary) = decode_bytes(&compressed, &config, &reporter).unwrap();

        assert_eq!(atom_rows(&plain), atom_rows(&unzipped));
        assert!(!plain_summary.compressed);
        assert!(gz_summary.compressed);
        assert_eq!(plain_summary.atom_count, gz_summary.atom_count);
        assert_eq!(plain_summary.stream_bytes, raw.len() as u64);
        assert_eq!(gz_summary.stream_bytes, raw.len() as u64);
        assert!(gz_summary.source_bytes > 0);
        assert!(gz_summary.source_bytes <= compressed.len() as u64);
    }

    fn empty_container() -> Vec<u8> {
        StreamWriter::new()
            .header(0, 0, 1)
            .structure(0, false)
            .end()
            .finish()
    }

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        gz.write_all(bytes).unwrap();
        gz.finish().unwrap()
    }

    #[test]
    fn container_stream_decodes_back_to_back_structures() {
        let first = dipeptide_container();
        let second = empty_container();
        let joined = [first.clone(), second.clone()].concat();
        let config = DecodeConfig::default();
        let reporter = ProgressReporter::new();

        let mut stream = ContainerStream::new(&joined[..]).unwrap();
        assert!(!stream.is_compressed());

        let mut collector = StructureCollector::new();
        let one = stream
            .decode_next(&mut collector, &config, &reporter)
            .unwrap()
            .unwrap();
        assert_eq!(one.atom_count, 8);
        assert_eq!(one.stream_bytes, first.len() as u64);
        assert_eq!(one.source_bytes, first.len() as u64);
        assert_eq!(collector.finish().atom_count(), 8);

        let mut collector = StructureCollector::new();
        let two = stream
            .decode_next(&mut collector, &config, &reporter)
            .unwrap()
            .unwrap();
        assert_eq!(two.model_count, 0);
        assert_eq!(two.stream_bytes, second.len() as u64);
        assert_eq!(collector.finish().atom_count(), 0);

        assert!(
            stream
                .decode_next(&mut StructureCollector::new(), &config, &reporter)
                .unwrap()
                .is_none()
        );
        assert_eq!(stream.stream_bytes(), joined.len() as u64);
        assert_eq!(stream.source_bytes(), joined.len() as u64);
    }

    #[test]
    fn container_stream_reads_concatenated_gzip_members() {
        let joined = [gzip(&dipeptide_container()), gzip(&empty_container())].concat();
        let config = DecodeConfig::default();
        let reporter = ProgressReporter::new();

        let mut stream = ContainerStream::new(&joined[..]).unwrap();
        assert!(stream.is_compressed());
        let mut collector = StructureCollector::new();
        let one = stream
            .decode_next(&mut collector, &config, &reporter)
            .unwrap()
            .unwrap();
        let two = stream
            .decode_next(&mut collector, &config, &reporter)
            .unwrap()
            .unwrap();
        assert!(one.compressed && two.compressed);
        assert_eq!(one.atom_count + two.atom_count, 8);
        assert!(
            stream
                .decode_next(&mut collector, &config, &reporter)
                .unwrap()
                .is_none()
        );
        assert_eq!(stream.source_bytes(), joined.len() as u64);
    }

    #[test]
    fn trailing_partial_container_is_truncation() {
        let mut bytes = empty_container();
        let complete = bytes.len() as u64;
        bytes.extend_from_slice(b"HE");
        let config = DecodeConfig::default();
        let reporter = ProgressReporter::new();

        let mut stream = ContainerStream::new(&bytes[..]).unwrap();
        let mut collector = StructureCollector::new();
        assert!(
            stream
                .decode_next(&mut collector, &config, &reporter)
                .unwrap()
                .is_some()
        );
        assert!(matches!(
            stream.decode_next(&mut collector, &config, &reporter),
            Err(DecodeError::Truncated { offset, .. }) if offset == complete
        ));
    }

    #[test]
    fn homogeneous_models_share_one_topology() {
        let mut enc = AdaptiveEncoder::new();
        for x in [1000, 2000, 3000] {
            enc.push_delta(0, [x, 0, 0]);
        }
        let bytes = StreamWriter::new()
            .header(0, 0, 1)
            .structure(3, true)
            .model(1)
            .group_info(&FixtureGroup {
                name: "HOH",
                insertion_code: b' ',
                flags: GroupFlags::NON_POLYMER,
                atoms: vec![atom("O", -1, 0)],
            })
            .chain("W", 0, 1)
            .group(0)
            .coordinates(&enc.finish())
            .end()
            .finish();
        let (structure, summary) =
            decode_bytes(&bytes, &DecodeConfig::default(), &ProgressReporter::new()).unwrap();

        assert!(summary.homogeneous);
        assert_eq!(structure.models().len(), 3);
        assert_eq!(structure.chain_count(), 3);
        let xs: Vec<_> = structure
            .atoms_in_order()
            .map(|(m, c, _, a)| (m.index, c.id.clone(), milli(a.position.x)))
            .collect();
        assert_eq!(
            xs,
            vec![
                (0, "W".to_string(), 1000),
                (1, "W".to_string(), 2000),
                (2, "W".to_string(), 3000),
            ]
        );
    }

    #[test]
    fn header_errors_have_specific_variants() {
        let config = DecodeConfig::default();
        let reporter = ProgressReporter::new();

        let bad_magic = b"PDBb\x00\x00\x01e".to_vec();
        assert!(matches!(
            decode_bytes(&bad_magic, &config, &reporter).unwrap_err(),
            DecodeError::BadMagic { found } if &found == b"PDBb"
        ));

        let future = StreamWriter::new().header(1, 2, 1).end().finish();
        assert!(matches!(
            decode_bytes(&future, &config, &reporter).unwrap_err(),
            DecodeError::UnsupportedVersion { found, .. } if found == FormatVersion::new(1, 2)
        ));

        let compression = StreamWriter::new().header(0, 0, 7).end().finish();
        assert!(matches!(
            decode_bytes(&compression, &config, &reporter).unwrap_err(),
            DecodeError::UnsupportedCompression(7)
        ));

        assert!(matches!(
            decode_bytes(b"HES", &config, &reporter).unwrap_err(),
            DecodeError::Truncated { offset: 0, .. }
        ));
    }

    #[test]
    fn configured_version_table_is_honored() {
        let config = DecodeConfigBuilder::new()
            .supported_versions(vec![FormatVersion::new(1, 2)])
            .build()
            .unwrap();
        let bytes = StreamWriter::new()
            .header(1, 2, 1)
            .structure(0, false)
            .end()
            .finish();
        let (structure, summary) = decode_bytes(&bytes, &config, &ProgressReporter::new()).unwrap();
        assert_eq!(structure.atom_count(), 0);
        assert_eq!(summary.header.map(|h| h.version), Some(FormatVersion::new(1, 2)));
    }

    #[test]
    fn decode_stream_reads_records_without_a_header() {
        let mut collector = StructureCollector::new();
        let bytes = StreamWriter::new().structure(0, false).end().finish();
        let summary = decode_stream(
            &bytes[..],
            &mut collector,
            &DecodeConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(summary.header, None);
        assert_eq!(summary.model_count, 0);
    }

    #[test]
    fn decode_path_reads_a_file_and_reports_progress() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dipeptide.hesc");
        std::fs::write(&path, dipeptide_container()).unwrap();

        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        let (structure, _) = decode_path(&path, &DecodeConfig::default(), &reporter).unwrap();
        drop(reporter);

        assert_eq!(structure.atom_count(), 8);
        let events = events.into_inner().unwrap();
        assert!(matches!(
            events.first(),
            Some(Progress::PhaseStart {
                name: "Reading header"
            })
        ));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, Progress::TaskIncrement))
                .count(),
            1
        );
        assert!(matches!(events.last(), Some(Progress::PhaseFinish)));
    }

    #[test]
    fn decode_path_reports_missing_file_as_io_error() {
        let err = decode_path(
            "/no/such/structure.hesc",
            &DecodeConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::Io { offset: 0, .. }));
    }
}

use super::accumulator::decode_coordinates;
use super::context::{DecodeContext, DecodePhase};
use super::error::DecodeError;
use super::progress::Progress;
use crate::core::codec::adaptive::AdaptiveIntDecoder;
use crate::core::io::record::RecordTag;
use crate::core::io::traits::StructureSink;
use crate::core::io::wire::{WireReader, byte_to_char, token_to_string};
use crate::core::models::template::{GroupFlags, GroupTemplate, TemplateAtom};
use crate::core::models::topology::ChainEntry;
use std::io::Read;
use tracing::{debug, warn};

/// Bytes in a GINFO body besides the per-atom entries.
const GROUP_INFO_FIXED_BYTES: i64 = 7;
/// Bytes per atom in a GINFO body: name, element, alt-loc, predecessor, bond length.
const GROUP_INFO_ATOM_BYTES: i64 = 11;

fn malformed(record: RecordTag, offset: u64, reason: impl Into<String>) -> DecodeError {
    DecodeError::MalformedRecord {
        record,
        offset,
        reason: reason.into(),
    }
}

fn non_negative(
    value: i32,
    record: RecordTag,
    offset: u64,
    what: &str,
) -> Result<usize, DecodeError> {
    usize::try_from(value)
        .map_err(|_| malformed(record, offset, format!("negative {what} {value}")))
}

/// Reads the tagged records of one stream until END, driving `sink` during the coordinate pass.
///
/// The reader must be positioned at the first record, i.e. after any container header.
pub fn run<R: Read, S: StructureSink>(
    ctx: &mut DecodeContext<'_>,
    reader: &mut WireReader<R>,
    sink: &mut S,
) -> Result<(), DecodeError> {
    loop {
        let offset = reader.offset();
        let byte = reader.read_u8()?;
        let tag =
            RecordTag::from_byte(byte).ok_or(DecodeError::UnknownTag { tag: byte, offset })?;
        debug!(record = %tag, offset, "Reading record.");

        match tag {
            RecordTag::Structure => read_structure(ctx, reader, offset)?,
            RecordTag::Model => read_model(ctx, reader, offset)?,
            RecordTag::Chain => read_chain(ctx, reader, offset)?,
            RecordTag::Group => read_group(ctx, reader, offset)?,
            RecordTag::GroupInfo => read_group_info(ctx, reader, offset)?,
            RecordTag::Sequence => read_sequence(ctx, reader, offset)?,
            RecordTag::Coordinates => read_coordinates(ctx, reader, sink, offset)?,
            RecordTag::BFactor => read_b_factors(ctx, reader, offset)?,
            RecordTag::Occupancy => read_occupancies(ctx, reader, offset)?,
            RecordTag::End => {
                ctx.phase = DecodePhase::Finished;
                return Ok(());
            }
        }
    }
}

/// Reads the length byte of a fixed-layout short record and checks it against the layout.
fn read_fixed_length<R: Read>(
    ctx: &DecodeContext<'_>,
    reader: &mut WireReader<R>,
    tag: RecordTag,
    offset: u64,
) -> Result<(), DecodeError> {
    let length = reader.read_u8()?;
    let Some(expected) = tag.fixed_length() else {
        return Ok(());
    };
    if length != expected {
        if ctx.config.strict_record_lengths {
            return Err(malformed(
                tag,
                offset,
                format!("length byte is {length}, expected {expected}"),
            ));
        }
        warn!(
            "{} record at byte {} declares length {} instead of {}; reading the fixed layout.",
            tag, offset, length, expected
        );
    }
    Ok(())
}

/// Reads the 4-byte length of a long record.
fn read_long_length<R: Read>(
    reader: &mut WireReader<R>,
    tag: RecordTag,
    offset: u64,
) -> Result<usize, DecodeError> {
    let length = reader.read_i32()?;
    non_negative(length, tag, offset, "record length")
}

fn read_structure<R: Read>(
    ctx: &mut DecodeContext<'_>,
    reader: &mut WireReader<R>,
    offset: u64,
) -> Result<(), DecodeError> {
    let tag = RecordTag::Structure;
    if ctx.structure_seen() {
        return Err(DecodeError::MisplacedRecord {
            record: tag,
            offset,
            reason: "the stream already declared its structure",
        });
    }
    read_fixed_length(ctx, reader, tag, offset)?;
    let model_count = non_negative(reader.read_i32()?, tag, offset, "model count")?;
    let homogeneous = reader.read_u8()? != 0;

    ctx.topology.model_count = model_count;
    ctx.topology.homogeneous = homogeneous;
    ctx.phase = DecodePhase::ReadingTopology;
    debug!(model_count, homogeneous, "Structure declared.");
    Ok(())
}

fn read_model<R: Read>(
    ctx: &mut DecodeContext<'_>,
    reader: &mut WireReader<R>,
    offset: u64,
) -> Result<(), DecodeError> {
    let tag = RecordTag::Model;
    read_fixed_length(ctx, reader, tag, offset)?;
    let chain_count = non_negative(reader.read_i32()?, tag, offset, "chain count")?;
    ctx.topology.add_model(chain_count);
    Ok(())
}

fn read_chain<R: Read>(
    ctx: &mut DecodeContext<'_>,
    reader: &mut WireReader<R>,
    offset: u64,
) -> Result<(), DecodeError> {
    let tag = RecordTag::Chain;
    read_fixed_length(ctx, reader, tag, offset)?;
    let sequence_index = reader.read_i32()?;
    let id = token_to_string(&reader.read_array::<4>()?);
    let group_count = non_negative(reader.read_i32()?, tag, offset, "group count")?;
    debug!(chain = %id, group_count, "Chain declared.");
    ctx.topology.add_chain(ChainEntry {
        id,
        sequence_index,
        group_count,
    });
    Ok(())
}

fn read_group<R: Read>(
    ctx: &mut DecodeContext<'_>,
    reader: &mut WireReader<R>,
    offset: u64,
) -> Result<(), DecodeError> {
    let tag = RecordTag::Group;
    let length = reader.read_u8()?;
    let template_index = reader.read_i32()?;
    let sequence_number = match length {
        4 => None,
        8 => Some(reader.read_i32()?),
        other => {
            return Err(malformed(
                tag,
                offset,
                format!("length byte is {other}, expected 4 or 8"),
            ));
        }
    };
    ctx.topology.add_group(template_index, sequence_number);
    Ok(())
}

fn read_group_info<R: Read>(
    ctx: &mut DecodeContext<'_>,
    reader: &mut WireReader<R>,
    offset: u64,
) -> Result<(), DecodeError> {
    let tag = RecordTag::GroupInfo;
    let length = reader.read_i32()?;
    let atom_count = reader.read_i16()?;
    let n = non_negative(atom_count.into(), tag, offset, "atom count")?;
    if n > ctx.config.max_group_atoms {
        return Err(malformed(
            tag,
            offset,
            format!(
                "atom count {n} exceeds the configured maximum of {}",
                ctx.config.max_group_atoms
            ),
        ));
    }
    let expected = GROUP_INFO_FIXED_BYTES + GROUP_INFO_ATOM_BYTES * n as i64;
    if i64::from(length) != expected {
        return Err(malformed(
            tag,
            offset,
            format!("length is {length}, expected {expected} for {n} atom(s)"),
        ));
    }

    let flags = GroupFlags::from_bits(reader.read_u8()?);
    let name = token_to_string(&reader.read_array::<3>()?);
    let insertion_code = byte_to_char(reader.read_u8()?);

    let mut atoms = Vec::with_capacity(n);
    for _ in 0..n {
        let atom_name = token_to_string(&reader.read_array::<4>()?);
        let element = token_to_string(&reader.read_array::<2>()?);
        let alt_loc = byte_to_char(reader.read_u8()?);
        atoms.push(TemplateAtom {
            name: atom_name,
            element,
            alt_loc,
            predecessor: None,
            bond_length: 0,
        });
    }
    for atom in atoms.iter_mut() {
        let predecessor = reader.read_i16()?;
        atom.predecessor = usize::try_from(predecessor).ok();
    }
    for atom in atoms.iter_mut() {
        atom.bond_length = reader.read_i16()?.into();
    }

    let template = GroupTemplate::new(&name, insertion_code, flags, atoms)?;
    let index = ctx.topology.add_template(template);
    debug!(template = index, group = %name, atoms = n, "Group template registered.");
    Ok(())
}

fn read_sequence<R: Read>(
    ctx: &mut DecodeContext<'_>,
    reader: &mut WireReader<R>,
    offset: u64,
) -> Result<(), DecodeError> {
    let length = read_long_length(reader, RecordTag::Sequence, offset)?;
    let bytes = reader.read_bytes(length as u64)?;
    ctx.topology.add_sequence(token_to_string(&bytes));
    Ok(())
}

fn read_coordinates<R: Read, S: StructureSink>(
    ctx: &mut DecodeContext<'_>,
    reader: &mut WireReader<R>,
    sink: &mut S,
    offset: u64,
) -> Result<(), DecodeError> {
    let tag = RecordTag::Coordinates;
    if !ctx.structure_seen() {
        return Err(DecodeError::MisplacedRecord {
            record: tag,
            offset,
            reason: "coordinates arrived before the structure record",
        });
    }
    if ctx.coordinates_decoded() {
        return Err(DecodeError::MisplacedRecord {
            record: tag,
            offset,
            reason: "the stream already carried a coordinate record",
        });
    }
    // The length field is reserved; the body is delimited by the topology.
    reader.skip(4)?;

    ctx.reporter.report(Progress::PhaseStart {
        name: "Decoding coordinates",
    });
    let atoms = decode_coordinates(ctx, reader, sink)?;
    ctx.reporter.report(Progress::PhaseFinish);

    ctx.phase = DecodePhase::CoordinatesDecoded;
    debug!(atoms, "Coordinate pass finished.");
    Ok(())
}

fn read_b_factors<R: Read>(
    ctx: &mut DecodeContext<'_>,
    reader: &mut WireReader<R>,
    offset: u64,
) -> Result<(), DecodeError> {
    let tag = RecordTag::BFactor;
    let length = read_long_length(reader, tag, offset)?;
    let body = reader.read_bytes(length as u64)?;
    if ctx.coordinates_decoded() {
        warn!(
            "{} record at byte {} follows the coordinates and is ignored.",
            tag, offset
        );
        return Ok(());
    }
    let values = AdaptiveIntDecoder::decode_all(&body)
        .map_err(|_| malformed(tag, offset, "value stream ends in the middle of a value"))?;
    ctx.b_factors = Some(values);
    Ok(())
}

fn read_occupancies<R: Read>(
    ctx: &mut DecodeContext<'_>,
    reader: &mut WireReader<R>,
    offset: u64,
) -> Result<(), DecodeError> {
    let tag = RecordTag::Occupancy;
    let length = read_long_length(reader, tag, offset)?;
    if length % 2 != 0 {
        return Err(malformed(
            tag,
            offset,
            format!("length {length} is not a whole number of 16-bit values"),
        ));
    }
    let body = reader.read_bytes(length as u64)?;
    if ctx.coordinates_decoded() {
        warn!(
            "{} record at byte {} follows the coordinates and is ignored.",
            tag, offset
        );
        return Ok(());
    }
    let values = body
        .chunks_exact(2)
        .map(|pair| i16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    ctx.occupancies = Some(values);
    Ok(())
}

use super::context::DecodeContext;
use super::error::DecodeError;
use super::progress::Progress;
use super::scratch::AtomState;
use crate::core::codec::adaptive::AdaptiveIntDecoder;
use crate::core::codec::constants::{BO_SCALE, DEFAULT_OCCUPANCY, XYZ_SCALE};
use crate::core::codec::spherical;
use crate::core::io::traits::{AtomInfo, GroupInfo, StructureSink};
use crate::core::io::wire::{WireError, WireReader};
use std::io::Read;
use tracing::{debug, trace};

/// Position of the most recent polymer tail atom in the current chain.
///
/// The link is only open while every group since that atom carried the tail flag.
#[derive(Debug, Default)]
struct ChainTailState {
    state: AtomState,
    open: bool,
}

impl ChainTailState {
    fn begin_group(&mut self) {
        if !self.open {
            self.state = AtomState::default();
        }
    }

    fn end_group(&mut self, has_tail: bool) {
        self.open = has_tail;
    }
}

fn read_delta<R: Read>(
    decoder: &mut AdaptiveIntDecoder,
    reader: &mut WireReader<R>,
    bond_length: i32,
) -> Result<(i32, i32, i32), WireError> {
    let first = decoder.next_value(reader)?;
    if first.is_packed() {
        return Ok(spherical::decode(bond_length, first.value as u32));
    }
    let dy = decoder.next_value(reader)?.value;
    let dz = decoder.next_value(reader)?.value;
    Ok((first.value, dy, dz))
}

/// Runs the coordinate pass over a COORD body, emitting every atom to `sink`.
///
/// The reader must be positioned at the first value of the body. Buffered B-factor and
/// occupancy values are consumed in lockstep, indexed by the atom's position in the
/// whole stream. Returns the number of atoms emitted.
pub(crate) fn decode_coordinates<R: Read, S: StructureSink>(
    ctx: &mut DecodeContext<'_>,
    reader: &mut WireReader<R>,
    sink: &mut S,
) -> Result<usize, DecodeError> {
    let topology = &ctx.topology;
    let scratch = &mut ctx.scratch;
    let b_factors = ctx.b_factors.as_deref();
    let occupancies = ctx.occupancies.as_deref();
    let reporter = ctx.reporter;

    let mut decoder = AdaptiveIntDecoder::new();
    let mut chain_cursor = 0usize;
    let mut group_cursor = 0usize;
    let mut atom_index = 0usize;

    scratch.ensure(topology.max_template_atoms());
    sink.model_count(topology.model_count);

    reporter.report(Progress::TaskStart {
        total_steps: topology.model_count as u64,
    });

    for model in 0..topology.model_count {
        let chain_count = if topology.homogeneous {
            chain_cursor = 0;
            group_cursor = 0;
            topology.chain_count(0)
        } else {
            topology.chain_count(model)
        }
        .ok_or(DecodeError::MissingModel { model })?;

        debug!(model, chain_count, "Decoding model.");
        sink.model_info(model, chain_count);
        let mut serial = 0usize;

        for _ in 0..chain_count {
            let chain = topology
                .chain(chain_cursor)
                .ok_or(DecodeError::MissingChain {
                    index: chain_cursor,
                })?;
            chain_cursor += 1;
            sink.chain_info(&chain.id, chain.group_count);
            let mut tail = ChainTailState::default();

            for _ in 0..chain.group_count {
                let instance = topology
                    .group(group_cursor)
                    .ok_or(DecodeError::MissingGroup {
                        index: group_cursor,
                    })?;
                let template = topology.template(instance.template_index).ok_or(
                    DecodeError::UnknownTemplate {
                        group: group_cursor,
                        template: instance.template_index,
                    },
                )?;
                group_cursor += 1;

                let polymer_type = template.polymer_type();
                sink.group_info(&GroupInfo {
                    name: &template.name,
                    number: instance.sequence_number,
                    insertion_code: template.insertion_code,
                    polymer_type,
                    atom_count: template.atom_count(),
                });
                tail.begin_group();

                for (k, atom) in template.atoms().iter().enumerate() {
                    let linked = k == 0 && template.flags.has_head() && tail.open;
                    let (origin, bond_length) = match atom.predecessor {
                        Some(p) => (scratch.get(p).unwrap_or_default(), atom.bond_length),
                        None if linked => (tail.state, polymer_type.linkage_bond_length()),
                        None => (AtomState::default(), 0),
                    };

                    let (dx, dy, dz) = read_delta(&mut decoder, reader, bond_length)?;
                    let db = match b_factors {
                        Some(values) => *values
                            .get(atom_index)
                            .ok_or(DecodeError::BFactorExhausted { atom: atom_index })?,
                        None => 0,
                    };
                    let occupancy = match occupancies {
                        Some(values) => i32::from(
                            *values
                                .get(atom_index)
                                .ok_or(DecodeError::OccupancyExhausted { atom: atom_index })?,
                        ),
                        None => DEFAULT_OCCUPANCY,
                    };

                    let state = origin.offset(dx, dy, dz, db);
                    if linked {
                        trace!(atom = %atom.name, "Linked to previous group's tail atom.");
                    }
                    scratch.set(k, state);
                    serial += 1;
                    atom_index += 1;

                    sink.atom_info(&AtomInfo {
                        name: &atom.name,
                        serial,
                        alt_loc: atom.alt_loc,
                        x: state.x as f64 / XYZ_SCALE,
                        y: state.y as f64 / XYZ_SCALE,
                        z: state.z as f64 / XYZ_SCALE,
                        occupancy: occupancy as f64 / BO_SCALE,
                        b_factor: state.b as f64 / BO_SCALE,
                        element: &atom.element,
                    });

                    if template.is_tail_atom(k) {
                        tail.state = state;
                    }
                }

                tail.end_group(template.flags.has_tail());
            }
        }

        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    ctx.atoms_emitted += atom_index;
    Ok(atom_index)
}

use super::traits::{AtomInfo, GroupInfo, StructureSink};
use crate::core::models::ids::{ChainId, GroupId};
use crate::core::models::structure::{
    DecodedAtom, DecodedChain, DecodedGroup, DecodedModel, DecodedStructure,
};
use nalgebra::Point3;
use tracing::warn;

/// Counts come straight from the stream, so capacity reservations are capped.
const MAX_RESERVATION: usize = 4096;

/// A sink that buffers every event into a [`DecodedStructure`].
#[derive(Debug, Default)]
pub struct StructureCollector {
    structure: DecodedStructure,
    current_chain: Option<ChainId>,
    current_group: Option<GroupId>,
}

impl StructureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> DecodedStructure {
        self.structure
    }
}

impl StructureSink for StructureCollector {
    fn model_count(&mut self, count: usize) {
        self.structure.declared_model_count = count;
        self.structure.models.reserve(count.min(MAX_RESERVATION));
    }

    fn model_info(&mut self, index: usize, chain_count: usize) {
        self.structure.models.push(DecodedModel {
            index,
            declared_chain_count: chain_count,
            chains: Vec::with_capacity(chain_count.min(MAX_RESERVATION)),
        });
        self.current_chain = None;
        self.current_group = None;
    }

    fn chain_info(&mut self, chain_id: &str, group_count: usize) {
        let Some(model) = self.structure.models.last_mut() else {
            warn!("Chain '{}' announced outside of any model; ignored.", chain_id);
            return;
        };
        let id = self.structure.chains.insert(DecodedChain {
            id: chain_id.to_string(),
            model: model.index,
            declared_group_count: group_count,
            groups: Vec::with_capacity(group_count.min(MAX_RESERVATION)),
        });
        model.chains.push(id);
        self.current_chain = Some(id);
        self.current_group = None;
    }

    fn group_info(&mut self, group: &GroupInfo<'_>) {
        let Some((chain_id, chain)) = self
            .current_chain
            .and_then(|id| self.structure.chains.get_mut(id).map(|c| (id, c)))
        else {
            warn!("Group '{}' announced outside of any chain; ignored.", group.name);
            return;
        };
        let id = self.structure.groups.insert(DecodedGroup {
            name: group.name.to_string(),
            number: group.number,
            insertion_code: group.insertion_code,
            polymer_type: group.polymer_type,
            chain_id,
            declared_atom_count: group.atom_count,
            atoms: Vec::with_capacity(group.atom_count.min(MAX_RESERVATION)),
        });
        chain.groups.push(id);
        self.current_group = Some(id);
    }

    fn atom_info(&mut self, atom: &AtomInfo<'_>) {
        let Some(group_id) = self.current_group else {
            warn!("Atom '{}' announced outside of any group; ignored.", atom.name);
            return;
        };
        let id = self.structure.atoms.insert(DecodedAtom {
            name: atom.name.to_string(),
            serial: atom.serial,
            alt_loc: atom.alt_loc,
            position: Point3::new(atom.x, atom.y, atom.z),
            occupancy: atom.occupancy,
            b_factor: atom.b_factor,
            element: atom.element.to_string(),
            group_id,
        });
        if let Some(group) = self.structure.groups.get_mut(group_id) {
            group.atoms.push(id);
        }
    }
}

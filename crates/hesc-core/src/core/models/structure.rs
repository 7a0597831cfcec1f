use super::ids::{AtomId, ChainId, GroupId};
use super::template::PolymerType;
use nalgebra::Point3;
use slotmap::SlotMap;

/// A fully resolved atom, in real units.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAtom {
    pub name: String,
    pub serial: usize,
    pub alt_loc: char,
    pub position: Point3<f64>, // Angstroms
    pub occupancy: f64,
    pub b_factor: f64,
    pub element: String,
    pub group_id: GroupId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedGroup {
    pub name: String,
    pub number: i32,
    pub insertion_code: char,
    pub polymer_type: PolymerType,
    pub chain_id: ChainId,
    pub(crate) declared_atom_count: usize,
    pub(crate) atoms: Vec<AtomId>,
}

impl DecodedGroup {
    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    /// Atom count announced for the group, which equals `atoms().len()` after a full decode.
    pub fn declared_atom_count(&self) -> usize {
        self.declared_atom_count
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedChain {
    pub id: String,
    pub model: usize,
    pub(crate) declared_group_count: usize,
    pub(crate) groups: Vec<GroupId>,
}

impl DecodedChain {
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    pub fn declared_group_count(&self) -> usize {
        self.declared_group_count
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedModel {
    pub index: usize,
    pub(crate) declared_chain_count: usize,
    pub(crate) chains: Vec<ChainId>,
}

impl DecodedModel {
    pub fn chains(&self) -> &[ChainId] {
        &self.chains
    }

    pub fn declared_chain_count(&self) -> usize {
        self.declared_chain_count
    }
}

/// An owned copy of everything a decode emitted, in emission order.
///
/// Storage mirrors the hierarchy of the stream: models own ordered chain keys, chains own
/// ordered group keys, and groups own ordered atom keys. All entities live in slot maps so
/// keys stay valid independently of their position.
#[derive(Debug, Clone, Default)]
pub struct DecodedStructure {
    pub(crate) declared_model_count: usize,
    pub(crate) models: Vec<DecodedModel>,
    pub(crate) chains: SlotMap<ChainId, DecodedChain>,
    pub(crate) groups: SlotMap<GroupId, DecodedGroup>,
    pub(crate) atoms: SlotMap<AtomId, DecodedAtom>,
}

impl DecodedStructure {
    /// Creates a new, empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declared_model_count(&self) -> usize {
        self.declared_model_count
    }

    pub fn models(&self) -> &[DecodedModel] {
        &self.models
    }

    /// Retrieves a chain by its key.
    ///
    /// # Arguments
    ///
    /// * `id` - The chain key to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&DecodedChain)` if the chain exists, otherwise `None`.
    pub fn chain(&self, id: ChainId) -> Option<&DecodedChain> {
        self.chains.get(id)
    }

    /// Retrieves a group by its key.
    ///
    /// # Arguments
    ///
    /// * `id` - The group key to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&DecodedGroup)` if the group exists, otherwise `None`.
    pub fn group(&self, id: GroupId) -> Option<&DecodedGroup> {
        self.groups.get(id)
    }

    /// Retrieves an atom by its key.
    ///
    /// # Arguments
    ///
    /// * `id` - The atom key to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&DecodedAtom)` if the atom exists, otherwise `None`.
    pub fn atom(&self, id: AtomId) -> Option<&DecodedAtom> {
        self.atoms.get(id)
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Chains of one model, in emission order.
    pub fn chains_in_model<'a>(
        &'a self,
        model: &'a DecodedModel,
    ) -> impl Iterator<Item = (ChainId, &'a DecodedChain)> + 'a {
        model
            .chains
            .iter()
            .filter_map(move |&id| self.chains.get(id).map(|c| (id, c)))
    }

    /// Groups of one chain, in emission order.
    pub fn groups_in_chain<'a>(
        &'a self,
        chain: &'a DecodedChain,
    ) -> impl Iterator<Item = (GroupId, &'a DecodedGroup)> + 'a {
        chain
            .groups
            .iter()
            .filter_map(move |&id| self.groups.get(id).map(|g| (id, g)))
    }

    /// Atoms of one group, in emission order.
    pub fn atoms_in_group<'a>(
        &'a self,
        group: &'a DecodedGroup,
    ) -> impl Iterator<Item = (AtomId, &'a DecodedAtom)> + 'a {
        group
            .atoms
            .iter()
            .filter_map(move |&id| self.atoms.get(id).map(|a| (id, a)))
    }

    /// Walks every atom depth-first (model, chain, group, atom), as it was emitted.
    pub fn atoms_in_order(
        &self,
    ) -> impl Iterator<Item = (&DecodedModel, &DecodedChain, &DecodedGroup, &DecodedAtom)> + '_
    {
        self.models.iter().flat_map(move |model| {
            self.chains_in_model(model).flat_map(move |(_, chain)| {
                self.groups_in_chain(chain).flat_map(move |(_, group)| {
                    self.atoms_in_group(group)
                        .map(move |(_, atom)| (model, chain, group, atom))
                })
            })
        })
    }
}

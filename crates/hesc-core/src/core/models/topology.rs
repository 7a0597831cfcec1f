use super::template::GroupTemplate;

/// A chain as declared by a CHAIN record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEntry {
    pub id: String,
    pub sequence_index: i32, // Advisory index into the sequence list, unused for coordinates
    pub group_count: usize,
}

/// One placement of a group template within a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupInstance {
    pub template_index: i32,
    pub sequence_number: i32,
}

/// Everything the topology records of one stream register before coordinates are decoded.
///
/// Chains and group instances are flat lists in declaration order. For a homogeneous
/// structure they describe one model and are replayed for every model; otherwise they
/// run on across all models.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    pub model_count: usize,
    pub homogeneous: bool,
    chain_counts: Vec<usize>,
    chains: Vec<ChainEntry>,
    groups: Vec<GroupInstance>,
    templates: Vec<GroupTemplate>,
    sequences: Vec<String>,
    next_sequence_number: i32,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model(&mut self, chain_count: usize) {
        self.chain_counts.push(chain_count);
    }

    /// Registers a chain and restarts automatic residue numbering.
    pub fn add_chain(&mut self, chain: ChainEntry) {
        self.chains.push(chain);
        self.next_sequence_number = 0;
    }

    /// Registers a group instance; without an explicit number, the previous one plus one is used.
    pub fn add_group(&mut self, template_index: i32, sequence_number: Option<i32>) -> GroupInstance {
        let number = match sequence_number {
            Some(n) => n,
            None => self.next_sequence_number.wrapping_add(1),
        };
        self.next_sequence_number = number;
        let instance = GroupInstance {
            template_index,
            sequence_number: number,
        };
        self.groups.push(instance);
        instance
    }

    /// Appends a template and returns its index.
    pub fn add_template(&mut self, template: GroupTemplate) -> usize {
        self.templates.push(template);
        self.templates.len() - 1
    }

    pub fn add_sequence(&mut self, sequence: String) -> usize {
        self.sequences.push(sequence);
        self.sequences.len() - 1
    }

    pub fn chain_count(&self, model: usize) -> Option<usize> {
        self.chain_counts.get(model).copied()
    }

    pub fn chain(&self, index: usize) -> Option<&ChainEntry> {
        self.chains.get(index)
    }

    pub fn group(&self, index: usize) -> Option<&GroupInstance> {
        self.groups.get(index)
    }

    pub fn template(&self, index: i32) -> Option<&GroupTemplate> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.templates.get(i))
    }

    pub fn chains(&self) -> &[ChainEntry] {
        &self.chains
    }

    pub fn groups(&self) -> &[GroupInstance] {
        &self.groups
    }

    pub fn templates(&self) -> &[GroupTemplate] {
        &self.templates
    }

    pub fn sequences(&self) -> &[String] {
        &self.sequences
    }

    /// Sequence referenced by a chain's advisory index, if it exists.
    pub fn sequence_of(&self, chain: &ChainEntry) -> Option<&str> {
        usize::try_from(chain.sequence_index)
            .ok()
            .and_then(|i| self.sequences.get(i))
            .map(String::as_str)
    }

    /// Largest atom count over all registered templates.
    pub fn max_template_atoms(&self) -> usize {
        self.templates
            .iter()
            .map(GroupTemplate::atom_count)
            .max()
            .unwrap_or(0)
    }
}

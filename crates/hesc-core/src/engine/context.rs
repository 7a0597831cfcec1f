use super::config::DecodeConfig;
use super::progress::ProgressReporter;
use super::scratch::ScratchArena;
use crate::core::models::topology::Topology;

/// Where the record loop stands relative to the coordinate pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePhase {
    #[default]
    AwaitingStructure,
    ReadingTopology,
    CoordinatesDecoded,
    Finished,
}

/// All mutable state of one decode pass.
///
/// A context is created per stream and never shared, so independent decodes can run
/// side by side on different threads.
pub struct DecodeContext<'a> {
    pub config: &'a DecodeConfig,
    pub reporter: &'a ProgressReporter<'a>,
    pub topology: Topology,
    pub phase: DecodePhase,
    pub(crate) b_factors: Option<Vec<i32>>,
    pub(crate) occupancies: Option<Vec<i16>>,
    pub(crate) scratch: ScratchArena,
    pub(crate) atoms_emitted: usize,
}

impl<'a> DecodeContext<'a> {
    pub fn new(config: &'a DecodeConfig, reporter: &'a ProgressReporter<'a>) -> Self {
        Self {
            config,
            reporter,
            topology: Topology::new(),
            phase: DecodePhase::default(),
            b_factors: None,
            occupancies: None,
            scratch: ScratchArena::new(),
            atoms_emitted: 0,
        }
    }

    pub fn structure_seen(&self) -> bool {
        self.phase != DecodePhase::AwaitingStructure
    }

    pub fn coordinates_decoded(&self) -> bool {
        matches!(
            self.phase,
            DecodePhase::CoordinatesDecoded | DecodePhase::Finished
        )
    }

    pub fn atoms_emitted(&self) -> usize {
        self.atoms_emitted
    }
}

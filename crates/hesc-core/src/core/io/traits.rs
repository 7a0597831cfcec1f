use crate::core::models::structure::DecodedStructure;
use crate::core::models::template::PolymerType;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// A group as announced to a sink, before its atoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupInfo<'a> {
    pub name: &'a str,
    pub number: i32,
    pub insertion_code: char,
    pub polymer_type: PolymerType,
    pub atom_count: usize,
}

/// One resolved atom as announced to a sink, already converted to real units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomInfo<'a> {
    pub name: &'a str,
    pub serial: usize,
    pub alt_loc: char,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub occupancy: f64,
    pub b_factor: f64,
    pub element: &'a str,
}

/// Receives decoded structure events in depth-first model, chain, group, atom order.
///
/// The decoder calls these methods synchronously while it reads the stream. An
/// implementor may act on each event directly (e.g., stream it to a writer) or buffer
/// the events into an owned structure, as [`StructureCollector`] does.
///
/// [`StructureCollector`]: super::collector::StructureCollector
pub trait StructureSink {
    /// Number of models the structure declares. Called once, before any model.
    fn model_count(&mut self, count: usize);

    /// Start of model `index` (0-based), which contains `chain_count` chains.
    fn model_info(&mut self, index: usize, chain_count: usize);

    /// Start of a chain within the current model.
    fn chain_info(&mut self, chain_id: &str, group_count: usize);

    /// Start of a group within the current chain.
    fn group_info(&mut self, group: &GroupInfo<'_>);

    /// One atom of the current group.
    fn atom_info(&mut self, atom: &AtomInfo<'_>);
}

impl<S: StructureSink + ?Sized> StructureSink for &mut S {
    fn model_count(&mut self, count: usize) {
        (**self).model_count(count)
    }

    fn model_info(&mut self, index: usize, chain_count: usize) {
        (**self).model_info(index, chain_count)
    }

    fn chain_info(&mut self, chain_id: &str, group_count: usize) {
        (**self).chain_info(chain_id, group_count)
    }

    fn group_info(&mut self, group: &GroupInfo<'_>) {
        (**self).group_info(group)
    }

    fn atom_info(&mut self, atom: &AtomInfo<'_>) {
        (**self).atom_info(atom)
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Defines the interface for writing a decoded structure to a text format.
pub trait StructureWriter {
    /// Writes a decoded structure to a writer.
    ///
    /// # Arguments
    ///
    /// * `structure` - The decoded structure to write.
    /// * `writer` - The writer to output to.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(structure: &DecodedStructure, writer: &mut impl Write) -> Result<(), ExportError>;

    /// Writes a decoded structure to a file path.
    ///
    /// # Arguments
    ///
    /// * `structure` - The decoded structure to write.
    /// * `path` - The path to the file to write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        structure: &DecodedStructure,
        path: P,
    ) -> Result<(), ExportError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(structure, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

//! # Core Models Module
//!
//! Data structures describing what a HESC stream contains.
//!
//! ## Key Components
//!
//! - [`template`] - De-duplicated group (residue) templates with their bond tables and flags
//! - [`topology`] - Chains, group instances, templates, and sequences registered by a stream
//! - [`structure`] - An owned, fully decoded structure as collected from sink events
//! - [`ids`] - Generational keys for atoms, groups, and chains of a decoded structure

pub mod ids;
pub mod structure;
pub mod template;
pub mod topology;

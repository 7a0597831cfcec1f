//! # Engine Module
//!
//! The stateful layer of the decoder: one sequential pass over a record stream that rebuilds
//! topology tables and then absolute atom coordinates.
//!
//! ## Architecture
//!
//! - **Record Interpreter** ([`interpreter`]) - Dispatches on record tags, registers topology,
//!   buffers B-factor and occupancy bodies, and starts the coordinate pass
//! - **Coordinate Accumulator** ([`accumulator`]) - Walks models, chains, groups, and atoms,
//!   turning chained deltas into absolute positions and pushing them to a sink
//! - **Decode State** ([`context`], [`scratch`]) - Per-pass state and the growable per-group arena
//! - **Configuration** ([`config`]) - Version table, record-length strictness, and limits
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - The `DecodeError` type shared by all decode operations

pub(crate) mod accumulator;
pub mod config;
pub mod context;
pub mod error;
pub mod interpreter;
pub mod progress;
pub mod scratch;

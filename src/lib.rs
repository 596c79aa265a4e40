//! Dumblox (workspace facade crate).
//!
//! Re-exports the member crates as `dumblox::{core,input,term,types}` and
//! holds the binary's JSON-lines event log.

pub mod event_log;

pub use dumblox_core as core;
pub use dumblox_input as input;
pub use dumblox_term as term;
pub use dumblox_types as types;

//! Terminal input.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Every key
//! press is one action; terminal auto-repeat produces repeated actions.

pub mod map;

pub use dumblox_types as types;

pub use map::{drain_pending, handle_key_event, should_quit};

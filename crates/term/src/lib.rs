//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget
//! toolkits and instead renders into a simple framebuffer that is diffed and
//! flushed to the terminal.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Render only from a `SessionSnapshot`, never from live session state
//! - Allow precise control over aspect ratio (e.g. 2 chars wide per cell)

pub mod clock;
pub mod fb;
pub mod game_view;
pub mod renderer;

pub use dumblox_core as core;
pub use dumblox_types as types;

pub use clock::{FrameClock, FramePlan};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{kind_color, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};

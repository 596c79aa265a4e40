//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the game rules, the pile, and the tick-driven task
//! scheduler that sequences the row fade-then-clear effect. It has **no
//! dependencies** on terminals, input devices, or I/O:
//!
//! - **Deterministic**: the same seed and the same inputs replay the same game
//! - **Single-threaded**: one logical clock, no locks, no blocking calls
//! - **Portable**: the shell only calls `tick`, `apply_action`, and `snapshot`
//!
//! # Module Structure
//!
//! - [`piece`]: a single cell with a fade opacity
//! - [`tetromino`]: the seven kinds with pre-baked rotation tables
//! - [`field`]: the pile, collision testing, row completion and deletion
//! - [`scheduler`]: named, countdown-driven tasks with carried state
//! - [`scoring`]: line clear points, levels, and fall speed
//! - [`rng`]: seeded uniform kind selection
//! - [`config`]: session tuning and environment overrides
//! - [`event`]: structured records of what a tick did
//! - [`snapshot`]: read-only view for renderers
//! - [`session`]: the per-tick orchestration
//!
//! # Game Rules
//!
//! Classic arcade rules:
//!
//! - **Uniform randomizer**: every kind is an independent draw
//! - **Fixed rotation tables**: no wall kicks; a blocked rotation fails
//! - **Forced moves**: the active piece drops a row every `fps - speed` ticks
//! - **Fading clears**: completed rows fade out over `fade_cycles` ticks
//!   before they are scored and removed
//! - **Scoring**: `[40, 100, 300, 1200] * (level + 1)` for 1-4 rows
//!
//! # Example
//!
//! ```
//! use dumblox_core::{GameSession, SessionConfig};
//! use dumblox_core::types::{GameAction, SessionState};
//!
//! let mut session = GameSession::new(SessionConfig::with_seed(12345));
//!
//! session.apply_action(GameAction::MoveRight);
//! session.apply_action(GameAction::RotateCw);
//! session.apply_action(GameAction::HardDrop);
//!
//! for _ in 0..60 {
//!     session.tick();
//! }
//! assert_eq!(session.state(), SessionState::Running);
//! ```

pub mod config;
pub mod event;
pub mod field;
pub mod piece;
pub mod rng;
pub mod scheduler;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod tetromino;

pub use dumblox_types as types;

// Re-export commonly used types for convenience
pub use config::{ConfigError, SessionConfig};
pub use event::{IgnoreReason, SessionEvent};
pub use field::{Field, RowSet};
pub use piece::Piece;
pub use rng::{KindRoller, SimpleRng};
pub use scheduler::{Repeats, Scheduler, Task, TaskStatus};
pub use scoring::{forced_move_interval, score_delta, Progression};
pub use session::{GameSession, PlayState};
pub use snapshot::{ActiveSnapshot, CellSnapshot, SessionSnapshot};
pub use tetromino::{rotation_table, Tetromino};

//! Session events - what happened during a tick, for the log and the shell

use crate::field::RowSet;
use crate::types::{BlockKind, GameAction};

/// Why an input was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum IgnoreReason {
    Paused,
    GameOver,
    /// Completed rows are fading; there is no active piece
    Clearing,
    /// Debug-only action with debug moves disabled
    DebugOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum SessionEvent {
    Spawned {
        kind: BlockKind,
    },
    Landed {
        kind: BlockKind,
        completed_rows: RowSet,
    },
    RowsCleared {
        count: u32,
        score_delta: u32,
        total_score: u32,
    },
    LevelUp {
        level: u32,
        speed: u32,
    },
    Paused,
    Resumed,
    GameOver {
        score: u32,
        level: u32,
        rows_cleared: u32,
    },
    InputIgnored {
        action: GameAction,
        reason: IgnoreReason,
    },
}

impl SessionEvent {
    /// Short camelCase name of the variant
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Spawned { .. } => "spawned",
            SessionEvent::Landed { .. } => "landed",
            SessionEvent::RowsCleared { .. } => "rowsCleared",
            SessionEvent::LevelUp { .. } => "levelUp",
            SessionEvent::Paused => "paused",
            SessionEvent::Resumed => "resumed",
            SessionEvent::GameOver { .. } => "gameOver",
            SessionEvent::InputIgnored { .. } => "inputIgnored",
        }
    }
}

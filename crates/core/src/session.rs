//! Game session - per-tick orchestration of pieces, pile, and scheduled effects
//!
//! A [`GameSession`] owns the field, the active and next tetrominoes, the
//! scheduler, and the progression counters. The shell calls [`GameSession::tick`]
//! once per logical period and routes every input through
//! [`GameSession::apply_action`].
//!
//! # Landing
//!
//! When a downward move fails the active piece lands: its pieces are merged
//! into the pile. Without completed rows the next piece is promoted at once.
//! Otherwise the active piece is cleared and two tasks are scheduled:
//!
//! - `"fade"` fires every tick for `fade_cycles` ticks, lowering the opacity
//!   of the completed rows to `1 - (n + 1) / fade_cycles`.
//! - `"end_fade"` fires once after `fade_cycles` ticks: it scores the clear,
//!   advances the level, deletes the rows, and promotes the next piece.
//!
//! Both tasks run against [`PlayState`], the part of the session that task
//! actions are allowed to touch.
//!
//! # Example
//!
//! ```
//! use dumblox_core::{GameSession, SessionConfig};
//! use dumblox_core::types::GameAction;
//!
//! let mut session = GameSession::new(SessionConfig::with_seed(7));
//! assert!(session.active().is_some());
//!
//! session.apply_action(GameAction::HardDrop);
//! session.tick();
//!
//! assert_eq!(session.field().occupied_count(), 4);
//! ```

use std::mem;

use crate::config::{ConfigError, SessionConfig};
use crate::event::{IgnoreReason, SessionEvent};
use crate::field::{Field, RowSet};
use crate::rng::KindRoller;
use crate::scheduler::{Repeats, Scheduler, Task};
use crate::scoring::{forced_move_interval, LevelRules, Progression};
use crate::snapshot::{ActiveSnapshot, CellSnapshot, SessionSnapshot};
use crate::tetromino::Tetromino;
use crate::types::{
    BlockKind, Direction, GameAction, GridCoord, RotateDirection, SessionState, SPAWN_ROW,
};

/// Name of the per-tick fade task
pub const FADE_TASK: &str = "fade";

/// Name of the task that completes a clear
pub const END_FADE_TASK: &str = "end_fade";

/// Session state reachable from scheduled task actions
#[derive(Debug)]
pub struct PlayState {
    field: Field,
    active: Option<Tetromino>,
    next: Tetromino,
    roller: KindRoller,
    progression: Progression,
    rules: LevelRules,
    spawn: GridCoord,
    events: Vec<SessionEvent>,
}

impl PlayState {
    fn new(config: &SessionConfig) -> Self {
        let spawn = GridCoord::new(config.spawn_column(), SPAWN_ROW);
        let mut roller = KindRoller::new(config.seed);
        let active = Tetromino::new(roller.roll(), spawn);
        let next = Tetromino::new(roller.roll(), spawn);

        let mut play = Self {
            field: Field::new(config.rows, config.columns),
            active: Some(active),
            next,
            roller,
            progression: Progression::new(config.start_speed),
            rules: LevelRules {
                rows_per_level: config.rows_per_level,
                speed_increment: config.speed_increment,
                max_speed: config.max_speed,
            },
            spawn,
            events: Vec::new(),
        };
        if let Some(active) = play.active.as_ref() {
            let kind = active.kind();
            play.events.push(SessionEvent::Spawned { kind });
        }
        play
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn active(&self) -> Option<&Tetromino> {
        self.active.as_ref()
    }

    pub fn next(&self) -> &Tetromino {
        &self.next
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Next becomes active; a fresh kind is rolled for next
    fn promote(&mut self) {
        let rolled = Tetromino::new(self.roller.roll(), self.spawn);
        let promoted = mem::replace(&mut self.next, rolled);
        self.events.push(SessionEvent::Spawned {
            kind: promoted.kind(),
        });
        self.active = Some(promoted);
    }

    /// Score, level, row deletion, and promotion at the end of a fade
    fn finish_clear(&mut self, rows: &RowSet) {
        let outcome = self.progression.record_clear(rows.len(), &self.rules);
        self.events.push(SessionEvent::RowsCleared {
            count: rows.len() as u32,
            score_delta: outcome.score_delta,
            total_score: self.progression.score,
        });
        if outcome.levels_gained > 0 {
            self.events.push(SessionEvent::LevelUp {
                level: self.progression.level,
                speed: self.progression.speed,
            });
        }

        self.field.delete_rows(rows);
        self.promote();
    }
}

/// One game, from first spawn to game over
#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    scheduler: Scheduler<PlayState, RowSet>,
    play: PlayState,
    state: SessionState,
    ticks_since_forced_move: u32,
    tick_count: u64,
    /// Tasks disabled by pausing, re-enabled on resume
    suspended_tasks: Vec<String>,
    exit_requested: bool,
}

impl GameSession {
    /// Start a session; the active and next pieces are rolled immediately.
    ///
    /// The configuration is trusted; see [`GameSession::try_new`].
    pub fn new(config: SessionConfig) -> Self {
        debug_assert_eq!(config.validate(), Ok(()));
        let play = PlayState::new(&config);
        Self {
            config,
            scheduler: Scheduler::new(),
            play,
            state: SessionState::Running,
            ticks_since_forced_move: 0,
            tick_count: 0,
            suspended_tasks: Vec::new(),
            exit_requested: false,
        }
    }

    /// Validate the configuration, then start a session
    pub fn try_new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == SessionState::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.state == SessionState::GameOver
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn level(&self) -> u32 {
        self.play.progression.level
    }

    pub fn speed(&self) -> u32 {
        self.play.progression.speed
    }

    pub fn rows_cleared(&self) -> u32 {
        self.play.progression.rows_cleared
    }

    pub fn score(&self) -> u32 {
        self.play.progression.score
    }

    pub fn field(&self) -> &Field {
        &self.play.field
    }

    /// Mutable pile access for scripted setups (tests, benchmarks, replays)
    pub fn field_mut(&mut self) -> &mut Field {
        &mut self.play.field
    }

    /// `None` while completed rows are fading
    pub fn active(&self) -> Option<&Tetromino> {
        self.play.active.as_ref()
    }

    pub fn next(&self) -> &Tetromino {
        &self.play.next
    }

    /// Replace the active piece with a fresh `kind` at the spawn anchor
    pub fn set_active(&mut self, kind: BlockKind) {
        self.play.active = Some(Tetromino::new(kind, self.play.spawn));
    }

    pub fn scheduler(&self) -> &Scheduler<PlayState, RowSet> {
        &self.scheduler
    }

    pub fn play(&self) -> &PlayState {
        &self.play
    }

    pub fn ticks_since_forced_move(&self) -> u32 {
        self.ticks_since_forced_move
    }

    /// Logical ticks processed so far, paused and finished ticks included
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Take every event recorded since the last drain, oldest first
    pub fn drain_events(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.play.events.drain(..)
    }

    /// Advance one logical tick.
    ///
    /// Scheduled tasks run before any piece movement, so a clear that
    /// completes this tick is in the pile before the forced-move check.
    pub fn tick(&mut self) {
        self.tick_count += 1;

        match self.state {
            SessionState::GameOver => return,
            SessionState::Paused => {
                if !self.config.pause_freezes_tasks {
                    self.scheduler.advance_all(&mut self.play);
                }
                return;
            }
            SessionState::Running => {}
        }

        self.scheduler.advance_all(&mut self.play);

        if self.play.active.is_some() {
            let interval = forced_move_interval(self.config.fps, self.play.progression.speed);
            if self.ticks_since_forced_move >= interval {
                self.move_active(Direction::Down);
            } else {
                self.ticks_since_forced_move += 1;
            }
        }

        self.check_game_over();
    }

    /// Move the active piece one cell.
    ///
    /// A blocked downward move lands the piece. The forced-move counter is
    /// reset whether or not the move succeeds.
    pub fn move_active(&mut self, direction: Direction) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        let Some(active) = self.play.active.as_mut() else {
            return false;
        };

        let moved = active.try_move(&self.play.field, direction);
        if !moved && direction == Direction::Down {
            self.land();
        }

        self.ticks_since_forced_move = 0;
        moved
    }

    pub fn rotate_active(&mut self, rotate_direction: RotateDirection) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        match self.play.active.as_mut() {
            Some(active) => active.try_rotate(&self.play.field, rotate_direction),
            None => false,
        }
    }

    /// Drop the active piece to the bottom and land it
    pub fn hard_drop(&mut self) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        let Some(active) = self.play.active.as_mut() else {
            return false;
        };

        active.drop_to_bottom(&self.play.field);
        self.land();
        self.ticks_since_forced_move = 0;
        true
    }

    /// Switch between running and paused. No effect after game over.
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            SessionState::GameOver => false,
            SessionState::Running => {
                self.state = SessionState::Paused;
                if self.config.pause_freezes_tasks {
                    self.suspended_tasks = self.scheduler.suspend_all();
                }
                self.play.events.push(SessionEvent::Paused);
                true
            }
            SessionState::Paused => {
                self.state = SessionState::Running;
                if self.config.pause_freezes_tasks {
                    let names = mem::take(&mut self.suspended_tasks);
                    self.scheduler.restrict_active_set(names.as_slice());
                }
                self.play.events.push(SessionEvent::Resumed);
                true
            }
        }
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Dispatch one input action.
    ///
    /// Returns whether the action changed anything. Dropped actions are
    /// recorded as [`SessionEvent::InputIgnored`].
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Exit => {
                self.request_exit();
                return true;
            }
            GameAction::TogglePause => {
                if self.toggle_pause() {
                    return true;
                }
                return self.ignore(action, IgnoreReason::GameOver);
            }
            _ => {}
        }

        match self.state {
            SessionState::GameOver => return self.ignore(action, IgnoreReason::GameOver),
            SessionState::Paused => return self.ignore(action, IgnoreReason::Paused),
            SessionState::Running => {}
        }
        if self.play.active.is_none() {
            return self.ignore(action, IgnoreReason::Clearing);
        }

        match action {
            GameAction::MoveLeft => self.move_active(Direction::Left),
            GameAction::MoveRight => self.move_active(Direction::Right),
            GameAction::MoveDown => self.move_active(Direction::Down),
            GameAction::MoveUp => {
                if !self.config.debug_moves {
                    return self.ignore(action, IgnoreReason::DebugOnly);
                }
                self.move_active(Direction::Up)
            }
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.rotate_active(RotateDirection::Clockwise),
            GameAction::RotateCcw => self.rotate_active(RotateDirection::CounterClockwise),
            GameAction::TogglePause | GameAction::Exit => false,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut out = SessionSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    /// Fill `out`, reusing its cell buffer
    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        let field = &self.play.field;
        out.rows = field.rows();
        out.columns = field.columns();
        out.cells.clear();
        out.cells.extend(field.cells().iter().map(|cell| {
            cell.map(|piece| CellSnapshot {
                kind: piece.kind,
                opacity: piece.opacity(),
            })
        }));
        out.active = self.play.active.as_ref().map(|active| ActiveSnapshot {
            kind: active.kind(),
            rotation_index: active.rotation_index(),
            cells: std::array::from_fn(|i| active.pieces()[i].coord),
        });
        out.next = self.play.next.kind();
        out.level = self.level();
        out.speed = self.speed();
        out.score = self.score();
        out.rows_cleared = self.rows_cleared();
        out.state = self.state;
    }

    fn ignore(&mut self, action: GameAction, reason: IgnoreReason) -> bool {
        self.play
            .events
            .push(SessionEvent::InputIgnored { action, reason });
        false
    }

    /// Merge the active piece into the pile and start the follow-up
    fn land(&mut self) {
        let Some(landed) = self.play.active.take() else {
            return;
        };

        let completed = self.play.field.merge_landed(&landed);
        self.play.events.push(SessionEvent::Landed {
            kind: landed.kind(),
            completed_rows: completed.clone(),
        });

        if completed.is_empty() {
            self.play.promote();
        } else {
            self.schedule_clear(completed);
        }

        self.check_game_over();
    }

    fn schedule_clear(&mut self, rows: RowSet) {
        let cycles = self.config.fade_cycles.max(1);

        let fade = Task::new(1, Repeats::Finite(cycles), rows.clone()).with_action(
            move |play: &mut PlayState, n: u32, rows: RowSet| {
                let alpha = 1.0 - (n + 1) as f32 / cycles as f32;
                play.field.set_opacity(&rows, alpha);
                rows
            },
        );
        let end_fade = Task::once(cycles, rows).with_action(
            |play: &mut PlayState, _n: u32, rows: RowSet| {
                play.finish_clear(&rows);
                rows
            },
        );

        // Registration order matters: the last fade step runs before the
        // clear on the same tick.
        self.scheduler.schedule(FADE_TASK, fade);
        self.scheduler.schedule(END_FADE_TASK, end_fade);
    }

    fn check_game_over(&mut self) {
        if self.state == SessionState::GameOver || !self.play.field.is_game_over() {
            return;
        }
        self.state = SessionState::GameOver;
        let progression = self.play.progression;
        self.play.events.push(SessionEvent::GameOver {
            score: progression.score,
            level: progression.level,
            rows_cleared: progression.rows_cleared,
        });
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

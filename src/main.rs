//! Terminal Dumblox runner (default binary).
//!
//! Fixed-timestep loop: drain input, tick the session, render, then let the
//! frame clock decide how long to sleep or how many extra ticks to run.

use std::fs::File;
use std::io::BufWriter;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};

use dumblox::core::{GameSession, SessionConfig, SessionSnapshot};
use dumblox::event_log::{log_path_from_env, EventLog};
use dumblox::input::drain_pending;
use dumblox::term::{FrameBuffer, FrameClock, GameView, TerminalRenderer, Viewport};
use dumblox::types::GameAction;

type FileLog = EventLog<BufWriter<File>>;

fn main() -> Result<()> {
    let config = SessionConfig::from_env();
    let mut session = match GameSession::try_new(config) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("[Dumblox] invalid configuration: {err}");
            return Err(err.into());
        }
    };

    let mut log = match log_path_from_env() {
        Some(path) => Some(
            EventLog::open(&path)
                .with_context(|| format!("opening event log {}", path.display()))?,
        ),
        None => None,
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session, &mut log);

    // Always try to restore terminal state.
    let _ = term.exit();

    if let Some(log) = log.as_mut() {
        if let Err(err) = log.flush() {
            eprintln!("[Dumblox] event log flush failed: {err}");
        }
    }
    println!(
        "[Dumblox] score {} | level {} | rows {}",
        session.score(),
        session.level(),
        session.rows_cleared()
    );
    result
}

fn run(
    term: &mut TerminalRenderer,
    session: &mut GameSession,
    log: &mut Option<FileLog>,
) -> Result<()> {
    let view = GameView::default();
    let mut clock = FrameClock::new(session.config().fps);
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = SessionSnapshot::default();
    let mut actions: Vec<GameAction> = Vec::with_capacity(16);
    let mut last_size = term.size();

    loop {
        let frame_start = Instant::now();

        // Input.
        actions.clear();
        drain_pending(&mut actions)?;
        for &action in &actions {
            session.apply_action(action);
        }
        if session.exit_requested() {
            flush_events(session, log);
            return Ok(());
        }

        // Update.
        session.tick();
        flush_events(session, log);

        // Render.
        let (w, h) = term.size();
        if (w, h) != last_size {
            term.invalidate();
            last_size = (w, h);
        }
        session.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Pace.
        let plan = clock.end_frame(frame_start.elapsed());
        if !plan.sleep.is_zero() {
            let slept_from = Instant::now();
            thread::sleep(plan.sleep);
            clock.after_sleep(plan.sleep, slept_from.elapsed());
        }
        for _ in 0..plan.extra_updates {
            session.tick();
            flush_events(session, log);
        }
    }
}

/// Move buffered session events into the log; logging stops on the first
/// write error.
fn flush_events(session: &mut GameSession, log: &mut Option<FileLog>) {
    let tick = session.tick_count();
    let Some(writer) = log.as_mut() else {
        session.drain_events().for_each(drop);
        return;
    };

    let mut failed = false;
    for event in session.drain_events() {
        if writer.record(tick, &event).is_err() {
            failed = true;
            break;
        }
    }
    if failed {
        *log = None;
    }
}

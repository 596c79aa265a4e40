//! JSON-lines event log.
//!
//! One line per [`SessionEvent`], tagged with the tick it happened on:
//!
//! ```text
//! {"tick":412,"type":"rowsCleared","count":2,"scoreDelta":100,"totalScore":140}
//! ```
//!
//! Enabled by pointing `DUMBLOX_LOG_PATH` at a file; records are appended.

use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::SessionEvent;

/// Environment variable naming the log file
pub const LOG_PATH_ENV: &str = "DUMBLOX_LOG_PATH";

#[derive(Serialize)]
struct Record<'a> {
    tick: u64,
    #[serde(flatten)]
    event: &'a SessionEvent,
}

/// Log path from the environment; blank values disable logging
pub fn log_path_from_env() -> Option<PathBuf> {
    env::var(LOG_PATH_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

pub struct EventLog<W: Write> {
    out: W,
    buf: Vec<u8>,
    records: u64,
}

impl EventLog<BufWriter<File>> {
    /// Open `path` for appending, creating it if needed
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> EventLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(256),
            records: 0,
        }
    }

    pub fn record(&mut self, tick: u64, event: &SessionEvent) -> io::Result<()> {
        self.buf.clear();
        serde_json::to_writer(&mut self.buf, &Record { tick, event })?;
        self.buf.push(b'\n');
        self.out.write_all(&self.buf)?;
        self.records += 1;
        Ok(())
    }

    /// Records written so far
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IgnoreReason;
    use crate::types::{BlockKind, GameAction};

    fn lines(log: EventLog<Vec<u8>>) -> Vec<serde_json::Value> {
        let bytes = log.into_inner();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn writes_one_tagged_line_per_event() {
        let mut log = EventLog::new(Vec::new());
        log.record(1, &SessionEvent::Spawned { kind: BlockKind::T })
            .unwrap();
        log.record(
            9,
            &SessionEvent::InputIgnored {
                action: GameAction::MoveLeft,
                reason: IgnoreReason::Paused,
            },
        )
        .unwrap();
        assert_eq!(log.records(), 2);

        let lines = lines(log);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["tick"], 1);
        assert_eq!(lines[0]["type"], "spawned");
        assert_eq!(lines[0]["kind"], "T");
        assert_eq!(lines[1]["type"], "inputIgnored");
        assert_eq!(lines[1]["reason"], "paused");
    }

    #[test]
    fn unit_events_carry_only_tick_and_type() {
        let mut log = EventLog::new(Vec::new());
        log.record(3, &SessionEvent::Resumed).unwrap();
        let text = String::from_utf8(log.into_inner()).unwrap();
        assert_eq!(text, "{\"tick\":3,\"type\":\"resumed\"}\n");
    }
}

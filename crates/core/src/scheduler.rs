//! Scheduler module - cooperative, tick-driven deferred actions
//!
//! Multi-phase effects (fade a completed row, then clear it) are expressed as
//! named tasks that the session ticks once per logical frame, instead of as
//! timers on other threads. Everything runs on the caller's thread, inside
//! [`Scheduler::advance_all`].
//!
//! A task counts down `interval` ticks, then invokes its action with the
//! invocation counter and its carried state, stores the returned state, and
//! starts counting again. Finite tasks are removed once their repeat budget
//! is spent; infinite tasks stay until removed explicitly.
//!
//! # Example
//!
//! ```
//! use dumblox_core::scheduler::{Repeats, Scheduler, Task};
//!
//! let mut log: Vec<u32> = Vec::new();
//! let mut scheduler: Scheduler<Vec<u32>, u32> = Scheduler::new();
//!
//! scheduler.schedule(
//!     "count",
//!     Task::new(1, Repeats::Finite(3), 10).with_action(|log: &mut Vec<u32>, n, total| {
//!         log.push(n);
//!         total + n
//!     }),
//! );
//!
//! for _ in 0..4 {
//!     scheduler.advance_all(&mut log);
//! }
//!
//! assert_eq!(log, vec![0, 1, 2]);
//! assert!(scheduler.lookup("count").is_none());
//! ```

use std::fmt;

/// Boxed task action: `(context, invocation counter, carried state) -> carried state`
pub type TaskAction<C, S> = Box<dyn FnMut(&mut C, u32, S) -> S>;

/// Repeat budget of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeats {
    /// Fire this many more times, then remove
    Finite(u32),
    /// Never removed by the scheduler
    Infinite,
}

/// What the scheduler should do with a task after ticking it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Keep,
    Remove,
}

/// A deferred, optionally repeating action with carried state
pub struct Task<C, S> {
    /// Ticks between invocations (at least 1)
    interval: u32,
    /// Ticks left until the next invocation
    countdown: u32,
    /// Invocations so far
    counter: u32,
    repeats: Repeats,
    /// Always `Some` outside of an invocation
    state: Option<S>,
    enabled: bool,
    action: Option<TaskAction<C, S>>,
}

impl<C, S> Task<C, S> {
    /// Fire every `ticks` ticks, `repeats` times
    pub fn new(ticks: u32, repeats: Repeats, state: S) -> Self {
        let interval = ticks.max(1);
        Self {
            interval,
            countdown: interval,
            counter: 0,
            repeats,
            state: Some(state),
            enabled: true,
            action: None,
        }
    }

    /// Fire once after `ticks` ticks
    pub fn once(ticks: u32, state: S) -> Self {
        Self::new(ticks, Repeats::Finite(1), state)
    }

    /// Fire on every tick, forever
    pub fn every_tick(state: S) -> Self {
        Self::new(1, Repeats::Infinite, state)
    }

    /// Start disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set the action invoked when the countdown expires
    pub fn with_action(mut self, action: impl FnMut(&mut C, u32, S) -> S + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn repeats(&self) -> Repeats {
        self.repeats
    }

    pub fn state(&self) -> Option<&S> {
        self.state.as_ref()
    }

    /// Count one tick, invoking the action when the countdown runs out.
    ///
    /// Disabled tasks do nothing and are kept. A finite task reports
    /// [`TaskStatus::Remove`] on the tick its budget reaches zero.
    pub fn tick(&mut self, ctx: &mut C) -> TaskStatus {
        if !self.enabled {
            return TaskStatus::Keep;
        }

        if self.repeats == Repeats::Finite(0) {
            return TaskStatus::Remove;
        }

        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return TaskStatus::Keep;
        }

        if let Some(action) = self.action.as_mut() {
            if let Some(state) = self.state.take() {
                self.state = Some(action(ctx, self.counter, state));
            }
        }
        self.counter = self.counter.wrapping_add(1);
        self.countdown = self.interval;

        match &mut self.repeats {
            Repeats::Finite(left) => {
                *left -= 1;
                if *left == 0 {
                    TaskStatus::Remove
                } else {
                    TaskStatus::Keep
                }
            }
            Repeats::Infinite => TaskStatus::Keep,
        }
    }
}

impl<C, S: fmt::Debug> fmt::Debug for Task<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("interval", &self.interval)
            .field("countdown", &self.countdown)
            .field("counter", &self.counter)
            .field("repeats", &self.repeats)
            .field("state", &self.state)
            .field("enabled", &self.enabled)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

/// Registry of named tasks.
///
/// Names are unique; scheduling under an existing name replaces the task but
/// keeps its registration slot. Tasks are ticked in registration order.
pub struct Scheduler<C, S> {
    tasks: Vec<(String, Task<C, S>)>,
}

impl<C, S> Scheduler<C, S> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tasks.iter().position(|(n, _)| n == name)
    }

    /// Insert or replace the task under `name`
    pub fn schedule(&mut self, name: impl Into<String>, task: Task<C, S>) {
        let name = name.into();
        match self.position(&name) {
            Some(idx) => self.tasks[idx].1 = task,
            None => self.tasks.push((name, task)),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Task<C, S>> {
        self.position(name).map(|idx| &self.tasks[idx].1)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Task<C, S>> {
        self.position(name).map(move |idx| &mut self.tasks[idx].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Task<C, S>> {
        self.position(name).map(|idx| self.tasks.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Registered names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.tasks.iter().map(|(n, _)| n.as_str())
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Tick every registered task once and drop the exhausted ones.
    ///
    /// Actions only see the context, never the registry, so the set of tasks
    /// swept is exactly the set registered when the sweep starts.
    pub fn advance_all(&mut self, ctx: &mut C) {
        self.tasks
            .retain_mut(|(_, task)| task.tick(ctx) == TaskStatus::Keep);
    }

    /// Enable exactly the named tasks and disable every other one.
    ///
    /// Names that are not registered are ignored. Returns the names that were
    /// enabled before the call, so the caller can restore them later.
    pub fn restrict_active_set<N: AsRef<str>>(&mut self, names: &[N]) -> Vec<String> {
        let mut previous = Vec::new();
        for (name, task) in self.tasks.iter_mut() {
            if task.is_enabled() {
                previous.push(name.clone());
            }
            if names.iter().any(|n| n.as_ref() == name.as_str()) {
                task.enable();
            } else {
                task.disable();
            }
        }
        previous
    }

    /// Disable every task. Returns the names that were enabled.
    pub fn suspend_all(&mut self) -> Vec<String> {
        self.restrict_active_set::<&str>(&[])
    }
}

impl<C, S> Default for Scheduler<C, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, S: fmt::Debug> fmt::Debug for Scheduler<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.tasks.iter().map(|(n, t)| (n, t)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records (tick, name, counter) for every invocation
    #[derive(Default)]
    struct Trace {
        tick: u32,
        fired: Vec<(u32, &'static str, u32)>,
    }

    fn recording(name: &'static str) -> impl FnMut(&mut Trace, u32, ()) {
        move |trace: &mut Trace, n, ()| trace.fired.push((trace.tick, name, n))
    }

    fn run(scheduler: &mut Scheduler<Trace, ()>, trace: &mut Trace, ticks: u32) {
        for _ in 0..ticks {
            trace.tick += 1;
            scheduler.advance_all(trace);
        }
    }

    #[test]
    fn test_repeating_task_fires_each_tick_then_leaves() {
        let mut scheduler = Scheduler::new();
        let mut trace = Trace::default();
        scheduler.schedule(
            "a",
            Task::new(1, Repeats::Finite(3), ()).with_action(recording("a")),
        );

        run(&mut scheduler, &mut trace, 3);
        assert_eq!(trace.fired, vec![(1, "a", 0), (2, "a", 1), (3, "a", 2)]);
        assert!(scheduler.lookup("a").is_none());

        run(&mut scheduler, &mut trace, 1);
        assert_eq!(trace.fired.len(), 3);
    }

    #[test]
    fn test_interval_delays_each_invocation() {
        let mut scheduler = Scheduler::new();
        let mut trace = Trace::default();
        scheduler.schedule(
            "slow",
            Task::new(3, Repeats::Finite(2), ()).with_action(recording("slow")),
        );

        run(&mut scheduler, &mut trace, 6);
        assert_eq!(trace.fired, vec![(3, "slow", 0), (6, "slow", 1)]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_infinite_task_is_never_removed() {
        let mut scheduler = Scheduler::new();
        let mut trace = Trace::default();
        scheduler.schedule("forever", Task::every_tick(()).with_action(recording("forever")));

        run(&mut scheduler, &mut trace, 1000);
        assert_eq!(trace.fired.len(), 1000);
        assert_eq!(scheduler.lookup("forever").map(Task::counter), Some(1000));
    }

    #[test]
    fn test_disabled_task_does_not_count_down() {
        let mut scheduler = Scheduler::new();
        let mut trace = Trace::default();
        scheduler.schedule(
            "later",
            Task::once(2, ()).disabled().with_action(recording("later")),
        );

        run(&mut scheduler, &mut trace, 5);
        assert!(trace.fired.is_empty());
        assert_eq!(scheduler.lookup("later").map(Task::countdown), Some(2));

        scheduler.lookup_mut("later").unwrap().enable();
        run(&mut scheduler, &mut trace, 2);
        assert_eq!(trace.fired, vec![(7, "later", 0)]);
        assert!(!scheduler.contains("later"));
    }

    #[test]
    fn test_carried_state_threads_between_invocations() {
        let mut scheduler: Scheduler<(), Vec<u32>> = Scheduler::new();
        scheduler.schedule(
            "acc",
            Task::new(1, Repeats::Finite(4), Vec::new()).with_action(|_: &mut (), n, mut seen| {
                seen.push(n * 10);
                seen
            }),
        );

        for _ in 0..3 {
            scheduler.advance_all(&mut ());
        }
        assert_eq!(
            scheduler.lookup("acc").and_then(Task::state),
            Some(&vec![0, 10, 20])
        );
    }

    #[test]
    fn test_zero_budget_is_removed_without_firing() {
        let mut scheduler = Scheduler::new();
        let mut trace = Trace::default();
        scheduler.schedule(
            "none",
            Task::new(1, Repeats::Finite(0), ()).with_action(recording("none")),
        );

        run(&mut scheduler, &mut trace, 1);
        assert!(trace.fired.is_empty());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_schedule_replaces_in_place() {
        let mut scheduler: Scheduler<Trace, ()> = Scheduler::new();
        scheduler.schedule("a", Task::every_tick(()));
        scheduler.schedule("b", Task::every_tick(()));
        scheduler.schedule("a", Task::once(9, ()));

        assert_eq!(scheduler.len(), 2);
        assert_eq!(scheduler.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(scheduler.lookup("a").map(Task::interval), Some(9));
    }

    #[test]
    fn test_tasks_tick_in_registration_order() {
        let mut scheduler = Scheduler::new();
        let mut trace = Trace::default();
        scheduler.schedule("first", Task::once(1, ()).with_action(recording("first")));
        scheduler.schedule("second", Task::once(1, ()).with_action(recording("second")));

        run(&mut scheduler, &mut trace, 1);
        assert_eq!(trace.fired, vec![(1, "first", 0), (1, "second", 0)]);
    }

    #[test]
    fn test_restrict_active_set_returns_previous() {
        let mut scheduler: Scheduler<Trace, ()> = Scheduler::new();
        scheduler.schedule("a", Task::every_tick(()));
        scheduler.schedule("b", Task::every_tick(()).disabled());
        scheduler.schedule("c", Task::every_tick(()));

        let previous = scheduler.restrict_active_set(&["b", "missing"]);
        assert_eq!(previous, vec!["a".to_string(), "c".to_string()]);
        assert!(!scheduler.lookup("a").unwrap().is_enabled());
        assert!(scheduler.lookup("b").unwrap().is_enabled());
        assert!(!scheduler.lookup("c").unwrap().is_enabled());

        let previous = scheduler.restrict_active_set(previous.as_slice());
        assert_eq!(previous, vec!["b".to_string()]);
        assert!(scheduler.lookup("a").unwrap().is_enabled());
        assert!(!scheduler.lookup("b").unwrap().is_enabled());
    }

    #[test]
    fn test_suspend_all() {
        let mut scheduler: Scheduler<Trace, ()> = Scheduler::new();
        scheduler.schedule("a", Task::every_tick(()));

        assert_eq!(scheduler.suspend_all(), vec!["a".to_string()]);
        assert!(scheduler.suspend_all().is_empty());
    }
}

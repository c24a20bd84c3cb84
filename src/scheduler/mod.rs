//! Cooperative task scheduler
//!
//! Runs every periodic behaviour of the device on one executor. Each pass
//! ([`Scheduler::dispatch`]) walks the task table in registration order and
//! calls every task whose run-state mask matches the current run-state and
//! whose interval has elapsed. Handlers run to completion; between passes
//! the caller may idle for [`Scheduler::sleep_hint_ms`].
//!
//! # Usage
//!
//! ```ignore
//! let mut scheduler: Scheduler<_, App, 16> = Scheduler::new(SystemClock);
//! scheduler.register("Status LED", RunState::AP, 250, status_led)?;
//! scheduler.set_run_state(RunState::AP);
//!
//! loop {
//!     scheduler.dispatch(&mut app);
//!     let hint = scheduler.sleep_hint_ms();
//!     sleep_ms(hint);
//!     scheduler.record_sleep(hint);
//! }
//! ```

mod stats;

use embassy_time::Duration;
use heapless::Vec;

pub use stats::{StatsReport, TaskStats};

use crate::clock::{Clock, elapsed_ms};
use crate::error::Error;
use crate::run_state::RunState;

/// Longest hint returned by [`Scheduler::sleep_hint_ms`]
pub const MAX_SLEEP_MS: u32 = 1000;

/// Largest accepted task interval (wrap-safe range)
pub const MAX_INTERVAL_MS: u32 = u32::MAX >> 1;

/// Task handler
///
/// Receives the application state and the scheduler itself, so a running
/// handler may register or remove tasks and change the run-state.
pub type TaskHandler<Ctx> = fn(&mut Ctx, &mut dyn TaskControl<Ctx>);

/// Control surface of the scheduler
///
/// Implemented by [`Scheduler`]; handlers receive it as a trait object.
pub trait TaskControl<Ctx> {
    /// Register a task, replacing any task with the same name
    fn register(
        &mut self,
        name: &'static str,
        state_mask: RunState,
        interval_ms: u32,
        handler: TaskHandler<Ctx>,
    ) -> Result<(), Error>;

    /// Remove every task with the given name
    fn unregister(&mut self, name: &str);

    /// Check if a task with the given name exists
    fn is_registered(&self, name: &str) -> bool;

    /// Current run-state
    fn run_state(&self) -> RunState;

    /// Change the run-state
    fn set_run_state(&mut self, state: RunState);

    /// Current time of the scheduler clock
    fn now_ms(&self) -> u32;
}

struct Task<Ctx> {
    id: u64,
    name: &'static str,
    state_mask: RunState,
    interval_ms: u32,
    handler: TaskHandler<Ctx>,
    /// `None` until the first call
    last_call_ms: Option<u32>,
    num_calls: u32,
    cpu_time_ms: u32,
}

impl<Ctx> Task<Ctx> {
    fn is_due(&self, run_state: RunState, now: u32) -> bool {
        self.state_mask.intersects(run_state) && self.remaining_ms(now) == 0
    }

    fn remaining_ms(&self, now: u32) -> u32 {
        self.last_call_ms.map_or(0, |last| {
            self.interval_ms.saturating_sub(elapsed_ms(now, last))
        })
    }
}

/// Cooperative scheduler for up to `N` tasks
pub struct Scheduler<C: Clock, Ctx, const N: usize> {
    clock: C,
    run_state: RunState,
    tasks: Vec<Task<Ctx>, N>,
    next_id: u64,
    sleep_time_ms: u32,
}

impl<C: Clock, Ctx, const N: usize> Scheduler<C, Ctx, N> {
    /// Create an empty scheduler in the STOPPED state
    pub const fn new(clock: C) -> Self {
        Self {
            clock,
            run_state: RunState::STOPPED,
            tasks: Vec::new(),
            next_id: 0,
            sleep_time_ms: 0,
        }
    }

    /// Drop every task, clear counters and stop
    pub fn reset(&mut self) {
        self.tasks.clear();
        self.sleep_time_ms = 0;
        self.set_run_state(RunState::STOPPED);
    }

    /// Get a reference to the clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of registered tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if no task is registered
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task names in dispatch order
    pub fn task_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tasks.iter().map(|task| task.name)
    }

    /// Register a task, replacing any task with the same name
    ///
    /// The new task is due on the first eligible pass and is appended to the
    /// dispatch order. When called from a running handler, the task will not
    /// fire before the next pass.
    pub fn register(
        &mut self,
        name: &'static str,
        state_mask: RunState,
        interval_ms: u32,
        handler: TaskHandler<Ctx>,
    ) -> Result<(), Error> {
        if interval_ms > MAX_INTERVAL_MS {
            log::error!("scheduler: task {} interval {}ms out of range", name, interval_ms);
            return Err(Error::IntervalOutOfRange);
        }

        self.unregister(name);

        let task = Task {
            id: self.next_id,
            name,
            state_mask,
            interval_ms,
            handler,
            last_call_ms: None,
            num_calls: 0,
            cpu_time_ms: 0,
        };
        if self.tasks.push(task).is_err() {
            log::error!("scheduler: no room for task {}", name);
            return Err(Error::TaskListFull);
        }
        self.next_id += 1;

        log::info!(
            "scheduler: added task {} mask:0x{:08X} interval:{}ms",
            name,
            state_mask.bits(),
            interval_ms
        );
        Ok(())
    }

    /// Remove every task with the given name, silent if absent
    pub fn unregister(&mut self, name: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.name != name);
        if self.tasks.len() != before {
            log::info!("scheduler: removed task {}", name);
        }
    }

    /// Check if a task with the given name exists
    pub fn is_registered(&self, name: &str) -> bool {
        self.tasks.iter().any(|task| task.name == name)
    }

    /// Current run-state
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Change the run-state
    pub fn set_run_state(&mut self, state: RunState) {
        log::info!("scheduler: run state 0x{:08X}", state.bits());
        self.run_state = state;
    }

    /// Run one pass over the task table
    ///
    /// Tasks registered during the pass are skipped until the next pass;
    /// tasks removed during the pass are not called if not yet visited.
    pub fn dispatch(&mut self, ctx: &mut Ctx) {
        if self.run_state.is_stopped() {
            return;
        }

        let horizon = self.next_id;
        let mut next = 0;
        while let Some(pos) = self
            .tasks
            .iter()
            .position(|task| task.id >= next && task.id < horizon)
        {
            let now = self.clock.now_ms();
            let task = &mut self.tasks[pos];
            next = task.id + 1;
            if !task.is_due(self.run_state, now) {
                continue;
            }

            task.last_call_ms = Some(now);
            let id = task.id;
            let handler = task.handler;

            handler(ctx, self);

            let spent = elapsed_ms(self.clock.now_ms(), now);
            if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
                task.cpu_time_ms = task.cpu_time_ms.wrapping_add(spent);
                task.num_calls = task.num_calls.wrapping_add(1);
            }
        }
    }

    /// Milliseconds until the nearest deadline of an eligible task
    ///
    /// Zero when stopped or when an eligible task runs every pass; never
    /// more than [`MAX_SLEEP_MS`].
    pub fn sleep_hint_ms(&self) -> u32 {
        if self.run_state.is_stopped() {
            return 0;
        }

        let now = self.clock.now_ms();
        let mut hint = MAX_SLEEP_MS;
        for task in self
            .tasks
            .iter()
            .filter(|task| task.state_mask.intersects(self.run_state))
        {
            if task.interval_ms <= 1 {
                return 0;
            }
            hint = hint.min(task.remaining_ms(now));
        }
        hint
    }

    /// Sleep hint as a duration
    pub fn sleep_hint(&self) -> Duration {
        Duration::from_millis(u64::from(self.sleep_hint_ms()))
    }

    /// Account for time the caller spent idle
    pub fn record_sleep(&mut self, ms: u32) {
        self.sleep_time_ms = self.sleep_time_ms.wrapping_add(ms);
    }

    /// Report and reset per-task counters and slept time
    ///
    /// Only tasks called since the previous report are included.
    pub fn report_stats(&mut self) -> StatsReport<N> {
        let mut report = StatsReport::new(self.sleep_time_ms);
        for task in self.tasks.iter_mut().filter(|task| task.num_calls > 0) {
            let stats = TaskStats {
                name: task.name,
                interval_ms: task.interval_ms,
                num_calls: task.num_calls,
                cpu_time_ms: task.cpu_time_ms,
            };
            log::info!(
                "scheduler: task:{} interval:{} calls:{} cpu:{}",
                stats.name,
                stats.interval_ms,
                stats.num_calls,
                stats.cpu_time_ms
            );
            report.push(stats);
            task.num_calls = 0;
            task.cpu_time_ms = 0;
        }
        log::info!("scheduler: sleep time:{}", self.sleep_time_ms);
        self.sleep_time_ms = 0;
        report
    }
}

impl<C: Clock, Ctx, const N: usize> TaskControl<Ctx> for Scheduler<C, Ctx, N> {
    fn register(
        &mut self,
        name: &'static str,
        state_mask: RunState,
        interval_ms: u32,
        handler: TaskHandler<Ctx>,
    ) -> Result<(), Error> {
        Scheduler::register(self, name, state_mask, interval_ms, handler)
    }

    fn unregister(&mut self, name: &str) {
        Scheduler::unregister(self, name);
    }

    fn is_registered(&self, name: &str) -> bool {
        Scheduler::is_registered(self, name)
    }

    fn run_state(&self) -> RunState {
        self.run_state
    }

    fn set_run_state(&mut self, state: RunState) {
        Scheduler::set_run_state(self, state);
    }

    fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }
}

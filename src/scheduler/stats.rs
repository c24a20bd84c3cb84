use heapless::Vec;

/// Counters of one task since the previous report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    pub name: &'static str,
    pub interval_ms: u32,
    pub num_calls: u32,
    pub cpu_time_ms: u32,
}

/// Snapshot returned by [`Scheduler::report_stats`](super::Scheduler::report_stats)
#[derive(Debug, Clone)]
pub struct StatsReport<const N: usize> {
    tasks: Vec<TaskStats, N>,
    sleep_time_ms: u32,
}

impl<const N: usize> StatsReport<N> {
    pub(crate) const fn new(sleep_time_ms: u32) -> Self {
        Self {
            tasks: Vec::new(),
            sleep_time_ms,
        }
    }

    pub(crate) fn push(&mut self, stats: TaskStats) {
        // One entry per task, the table can't hold more than N.
        let _ = self.tasks.push(stats);
    }

    /// Tasks that were called since the previous report
    pub fn tasks(&self) -> &[TaskStats] {
        &self.tasks
    }

    /// Counters of the named task, if it was called
    pub fn task(&self, name: &str) -> Option<&TaskStats> {
        self.tasks.iter().find(|stats| stats.name == name)
    }

    /// Milliseconds the caller reported as idle
    pub const fn sleep_time_ms(&self) -> u32 {
        self.sleep_time_ms
    }
}

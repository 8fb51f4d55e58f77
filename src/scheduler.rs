//! Periodic task scheduler.
//!
//! Replaces ambient repeated-timer callbacks with an explicit table of
//! periodic tasks ticked by the main loop.  When a task comes due the
//! scheduler invokes the [`PollDelegate`] callback; it knows nothing
//! about what the task actually does, which keeps it independently
//! testable.
//!
//! ```text
//!  main loop ──tick(delta)──▶ Scheduler ──on_poll_due(label)──▶ delegate
//! ```

use log::info;

/// Callback invoked when a periodic task comes due.
pub trait PollDelegate {
    /// `label` identifies which task fired.
    fn on_poll_due(&mut self, label: &str);
}

/// Maximum number of tasks (stack-allocated table).
const MAX_TASKS: usize = 4;

/// A periodic task definition.
#[derive(Debug, Clone)]
pub struct PeriodicTask {
    /// Human-readable label (e.g. "env-poll").
    pub label: &'static str,
    pub interval_ms: u32,
    pub enabled: bool,
}

#[derive(Debug)]
struct TaskEntry {
    task: PeriodicTask,
    elapsed_ms: u32,
}

/// The scheduler engine.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: heapless::Vec<TaskEntry, MAX_TASKS>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            tasks: heapless::Vec::new(),
        }
    }

    /// Register a task.  Fails when the fixed table is full.
    pub fn add(&mut self, task: PeriodicTask) -> Result<(), &'static str> {
        info!("scheduled '{}' every {} ms", task.label, task.interval_ms);
        self.tasks
            .push(TaskEntry {
                task,
                elapsed_ms: 0,
            })
            .map_err(|_| "scheduler table full")
    }

    /// Enable or disable a task by label.
    pub fn set_enabled(&mut self, label: &str, enabled: bool) {
        for entry in &mut self.tasks {
            if entry.task.label == label {
                entry.task.enabled = enabled;
                entry.elapsed_ms = 0;
            }
        }
    }

    /// Advance time by `delta_ms`; fires the delegate for each task that
    /// came due.  A task fires at most once per tick — the handler is
    /// bounded, so a long stall coalesces rather than bursts.
    pub fn tick(&mut self, delta_ms: u32, delegate: &mut impl PollDelegate) {
        for entry in &mut self.tasks {
            if !entry.task.enabled {
                continue;
            }
            entry.elapsed_ms = entry.elapsed_ms.saturating_add(delta_ms);
            if entry.elapsed_ms >= entry.task.interval_ms {
                entry.elapsed_ms = 0;
                delegate.on_poll_due(entry.task.label);
            }
        }
    }
}

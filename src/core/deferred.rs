use serde::{Deserialize, Serialize};

/// Handle of one scheduled task, used to cancel it before it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    handle: TaskHandle,
    due_ms: u64,
    task: T,
}

/// Single-threaded queue of delayed callbacks pumped by the host event loop.
///
/// Tasks become due at `now + delay` and are returned by `pop_due` in due
/// order, ties in scheduling order.
#[derive(Debug, Clone)]
pub struct DeferredQueue<T> {
    tasks: Vec<ScheduledTask<T>>,
    next_handle: u64,
    now_ms: u64,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_handle: 1,
            now_ms: 0,
        }
    }
}

impl<T> DeferredQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current queue time, the latest value passed to `advance_to`.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Moves the clock forward. Time never runs backwards.
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn schedule(&mut self, delay_ms: u64, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.tasks.push(ScheduledTask {
            handle,
            due_ms: self.now_ms.saturating_add(delay_ms),
            task,
        });
        handle
    }

    /// Removes a task that has not run yet. Returns `true` when it was pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|scheduled| scheduled.handle != handle);
        before != self.tasks.len()
    }

    #[must_use]
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|scheduled| scheduled.handle == handle)
    }

    /// Takes the earliest task due at the current time.
    pub fn pop_due(&mut self) -> Option<(TaskHandle, T)> {
        let now_ms = self.now_ms;
        let position = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, scheduled)| scheduled.due_ms <= now_ms)
            .min_by_key(|(_, scheduled)| (scheduled.due_ms, scheduled.handle.0))
            .map(|(position, _)| position)?;
        let scheduled = self.tasks.remove(position);
        Some((scheduled.handle, scheduled.task))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

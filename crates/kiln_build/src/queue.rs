//! First-in first-out queue of pending build tasks.

use std::collections::VecDeque;

use crate::task::BuildTask;

/// Pending tasks in submission order.
///
/// Tasks leave the queue as they are handed to the runner, so a task is
/// never executed twice and never overtakes an earlier one.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: VecDeque<BuildTask>,
}

impl TaskQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task to the tail.
    pub fn submit(&mut self, task: BuildTask) {
        self.tasks.push_back(task);
    }

    /// Removes and returns the head task.
    pub fn pop(&mut self) -> Option<BuildTask> {
        self.tasks.pop_front()
    }

    /// Returns the number of queued tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates the queued tasks from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &BuildTask> {
        self.tasks.iter()
    }
}

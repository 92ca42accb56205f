//! Active run registry
//!
//! Process-wide table mapping an active task id to its cancellation token.
//! At most one live run per task id; the entry is inserted when a run starts
//! and removed exactly once when the run terminates, on every exit path.
//! Cancellation is advisory: stopping a task only causes the runner to
//! observe the token at its next checkpoint, it never interrupts an
//! in-flight request.

use std::collections::HashMap;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Table of active runs keyed by task id
#[derive(Debug, Default)]
pub struct TaskRegistry {
    active: Mutex<HashMap<i64, CancellationToken>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the cancellation token for a starting run
    ///
    /// Callers serialize starts per task id, so a prior entry here is a
    /// logic error. It is logged, never silently overwritten.
    pub fn register(&self, task_id: i64, token: CancellationToken) {
        let mut active = self.active.lock().unwrap();
        if active.insert(task_id, token).is_some() {
            tracing::error!(
                "Run registered for task {} while a previous entry was still active",
                task_id
            );
        }
    }

    /// Requests cancellation of an active run
    ///
    /// # Returns
    ///
    /// * `true` - An active run was found and its token cancelled
    /// * `false` - No active run for this task id
    pub fn stop(&self, task_id: i64) -> bool {
        let active = self.active.lock().unwrap();
        match active.get(&task_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Removes a run's entry; a no-op when the entry is already gone
    pub fn deregister(&self, task_id: i64) {
        self.active.lock().unwrap().remove(&task_id);
    }

    /// Returns true if a run is registered for this task id
    pub fn is_active(&self, task_id: i64) -> bool {
        self.active.lock().unwrap().contains_key(&task_id)
    }
}

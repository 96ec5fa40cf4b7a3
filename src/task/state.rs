// ABOUTME: Terminal state and event types for progress tasks.
// ABOUTME: Interrupted describes settlements the task body did not choose itself.

use std::fmt;

/// Externally visible state of a progress task.
///
/// Tasks start eagerly, so a freshly returned task is already `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Running,
    Succeeded,
    Failed,
    Canceled,
}

impl TaskState {
    /// Whether the task has settled.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskState::Running)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Running => "running",
            TaskState::Succeeded => "succeeded",
            TaskState::Failed => "failed",
            TaskState::Canceled => "canceled",
        };
        write!(f, "{s}")
    }
}

/// An event delivered to a task observer.
///
/// Every observer receives zero or more `Progress` events followed by
/// exactly one `Settled` event, after which its stream ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent<P> {
    Progress(P),
    Settled(TaskState),
}

impl<P> TaskEvent<P> {
    /// The progress payload, if this is a progress event.
    pub fn progress(&self) -> Option<&P> {
        match self {
            TaskEvent::Progress(p) => Some(p),
            TaskEvent::Settled(_) => None,
        }
    }
}

/// A settlement forced on the task from outside its body.
///
/// Task error types implement `From<Interrupted>` so `wait()` can report
/// these through the task's own error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Interrupted {
    /// The cancellation token fired before the body finished.
    #[error("task was canceled")]
    Canceled,

    /// The body panicked or its tokio task was torn down.
    #[error("task aborted: {0}")]
    Panicked(String),
}

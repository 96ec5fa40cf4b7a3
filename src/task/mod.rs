// ABOUTME: One-shot asynchronous tasks that stream progress before settling.
// ABOUTME: Exports ProgressTask, its emitter/observer halves, and terminal state types.

mod channel;
mod observer;
mod progress_task;
mod state;

pub use channel::ProgressEmitter;
pub use observer::ProgressObserver;
pub use progress_task::ProgressTask;
pub use state::{Interrupted, TaskEvent, TaskState};

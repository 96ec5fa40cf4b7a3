// ABOUTME: Shared progress channel between a task body and its observers.
// ABOUTME: Emission and settlement share one lock so ordering holds across observers.

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::observer::ProgressObserver;
use super::state::{TaskEvent, TaskState};

/// Fan-out channel owned by a progress task.
///
/// Each observer gets its own unbounded queue, so emitting never waits on a
/// slow observer.
pub(crate) struct Channel<P> {
    inner: Mutex<Inner<P>>,
}

struct Inner<P> {
    observers: Vec<mpsc::UnboundedSender<TaskEvent<P>>>,
    settled: Option<TaskState>,
}

impl<P> Channel<P> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                observers: Vec::new(),
                settled: None,
            }),
        }
    }

    pub(crate) fn state(&self) -> TaskState {
        self.inner.lock().settled.unwrap_or(TaskState::Running)
    }
}

impl<P: Clone> Channel<P> {

    /// Queue a progress event for every live observer.
    ///
    /// Returns false once the task has settled; the event is discarded.
    pub(crate) fn emit(&self, progress: P) -> bool {
        let mut inner = self.inner.lock();
        if inner.settled.is_some() {
            return false;
        }

        inner
            .observers
            .retain(|tx| tx.send(TaskEvent::Progress(progress.clone())).is_ok());
        true
    }

    /// Register a new observer.
    ///
    /// An observer registered after settlement only receives the terminal event.
    pub(crate) fn subscribe(&self) -> ProgressObserver<P> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();

        match inner.settled {
            Some(state) => {
                let _ = tx.send(TaskEvent::Settled(state));
            }
            None => inner.observers.push(tx),
        }

        ProgressObserver::new(rx)
    }

    /// Move to a terminal state. Only the first call has any effect.
    pub(crate) fn settle(&self, state: TaskState) -> bool {
        let mut inner = self.inner.lock();
        if inner.settled.is_some() {
            return false;
        }

        inner.settled = Some(state);
        for tx in inner.observers.drain(..) {
            let _ = tx.send(TaskEvent::Settled(state));
        }
        true
    }
}

/// Handle given to a task body for reporting progress.
pub struct ProgressEmitter<P> {
    channel: std::sync::Arc<Channel<P>>,
}

impl<P> Clone for ProgressEmitter<P> {
    fn clone(&self) -> Self {
        Self {
            channel: std::sync::Arc::clone(&self.channel),
        }
    }
}

impl<P: Clone> ProgressEmitter<P> {
    pub(crate) fn new(channel: std::sync::Arc<Channel<P>>) -> Self {
        Self { channel }
    }

    /// Report progress to all currently attached observers.
    ///
    /// Emissions after the task settled are dropped.
    pub fn emit(&self, progress: P) {
        if !self.channel.emit(progress) {
            tracing::trace!("dropping progress emitted after settlement");
        }
    }
}

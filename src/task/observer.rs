// ABOUTME: Observer half of a progress task, usable as a futures Stream.
// ABOUTME: Yields progress in emission order, then a single Settled event.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use super::state::TaskEvent;

/// Receives the events of one progress task.
#[derive(Debug)]
pub struct ProgressObserver<P> {
    rx: mpsc::UnboundedReceiver<TaskEvent<P>>,
}

impl<P> ProgressObserver<P> {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<TaskEvent<P>>) -> Self {
        Self { rx }
    }

    /// Wait for the next event. Returns `None` after the terminal event.
    pub async fn next_event(&mut self) -> Option<TaskEvent<P>> {
        self.rx.recv().await
    }
}

impl<P> Stream for ProgressObserver<P> {
    type Item = TaskEvent<P>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

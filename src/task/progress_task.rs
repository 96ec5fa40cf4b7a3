// ABOUTME: ProgressTask spawns its body eagerly on tokio and settles exactly once.
// ABOUTME: Supports cancellation tokens and converts panics into task failures.

use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::channel::{Channel, ProgressEmitter};
use super::observer::ProgressObserver;
use super::state::{Interrupted, TaskState};

/// A one-shot asynchronous computation that reports progress of type `P`
/// and settles into `Ok(T)` or `Err(E)`.
///
/// The body starts running before the constructor returns. Dropping the
/// task detaches the body; it keeps running to completion.
pub struct ProgressTask<T, P, E> {
    channel: Arc<Channel<P>>,
    outcome: Outcome<T, E>,
}

enum Outcome<T, E> {
    Spawned(JoinHandle<Result<T, E>>),
    Ready(Result<T, E>),
}

impl<T, P, E> ProgressTask<T, P, E>
where
    T: Send + 'static,
    P: Clone + Send + 'static,
    E: From<Interrupted> + Display + Send + 'static,
{
    /// Spawn `body` onto the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<F, Fut>(body: F) -> Self
    where
        F: FnOnce(ProgressEmitter<P>) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::spawn_cancellable(CancellationToken::new(), body)
    }

    /// Spawn `body`, dropping it and settling as canceled once `cancel` fires.
    pub fn spawn_cancellable<F, Fut>(cancel: CancellationToken, body: F) -> Self
    where
        F: FnOnce(ProgressEmitter<P>) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let channel = Arc::new(Channel::new());
        let work = body(ProgressEmitter::new(Arc::clone(&channel)));
        let settle = Arc::clone(&channel);

        let handle = tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(Interrupted::Canceled),
                result = AssertUnwindSafe(work).catch_unwind() => {
                    result.map_err(|panic| Interrupted::Panicked(panic_message(panic.as_ref())))
                }
            };

            match outcome {
                Ok(Ok(value)) => {
                    settle.settle(TaskState::Succeeded);
                    Ok(value)
                }
                Ok(Err(err)) => {
                    tracing::debug!(error = %err, "task failed");
                    settle.settle(TaskState::Failed);
                    Err(err)
                }
                Err(Interrupted::Canceled) => {
                    tracing::debug!("task canceled");
                    settle.settle(TaskState::Canceled);
                    Err(E::from(Interrupted::Canceled))
                }
                Err(panicked) => {
                    tracing::error!(error = %panicked, "task body panicked");
                    settle.settle(TaskState::Failed);
                    Err(E::from(panicked))
                }
            }
        });

        Self {
            channel,
            outcome: Outcome::Spawned(handle),
        }
    }

    /// A task that has already succeeded with `value`.
    pub fn ready(value: T) -> Self {
        let channel = Arc::new(Channel::new());
        channel.settle(TaskState::Succeeded);
        Self {
            channel,
            outcome: Outcome::Ready(Ok(value)),
        }
    }

    /// Attach an observer. See [`ProgressObserver`] for delivery guarantees.
    pub fn subscribe(&self) -> ProgressObserver<P> {
        self.channel.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TaskState {
        self.channel.state()
    }

    /// Wait for the body to finish and return its outcome.
    pub async fn wait(self) -> Result<T, E> {
        match self.outcome {
            Outcome::Ready(result) => result,
            Outcome::Spawned(handle) => match handle.await {
                Ok(result) => result,
                Err(join_err) => {
                    // Only reachable when the runtime tears the task down.
                    let (state, interrupted) = if join_err.is_cancelled() {
                        (TaskState::Canceled, Interrupted::Canceled)
                    } else {
                        (
                            TaskState::Failed,
                            Interrupted::Panicked(join_err.to_string()),
                        )
                    };
                    self.channel.settle(state);
                    Err(E::from(interrupted))
                }
            },
        }
    }
}

impl<T, P, E> std::fmt::Debug for ProgressTask<T, P, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTask")
            .field("state", &self.channel.state())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task body panicked".to_string()
    }
}

use std::{
    any::Any,
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use futures::Stream;
use tokio::{runtime::Handle, sync::mpsc, task::JoinError};

use crate::{
    error::EngineError,
    resource::{AsyncResource, Outcome},
};

/// Ordered emissions of a single [`AsyncOperationRunner::run`] call.
///
/// Always yields exactly two items, `Loading` then one terminal state, and
/// then ends.
#[derive(Debug)]
pub struct ResourceStream<T> {
    rx: mpsc::UnboundedReceiver<AsyncResource<T>>,
}

impl<T> ResourceStream<T> {
    /// Waits for the next emission; `None` once the run is over.
    pub async fn recv(&mut self) -> Option<AsyncResource<T>> {
        self.rx.recv().await
    }

    /// Non-blocking variant for consumers polling from an event loop tick.
    pub fn try_recv(&mut self) -> Option<AsyncResource<T>> {
        self.rx.try_recv().ok()
    }

    /// Skips `Loading` and waits for the terminal state.
    pub async fn terminal(mut self) -> Option<AsyncResource<T>> {
        while let Some(resource) = self.rx.recv().await {
            if resource.is_terminal() {
                return Some(resource);
            }
        }
        None
    }
}

impl<T> Stream for ResourceStream<T> {
    type Item = AsyncResource<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Drives one fetch to completion on a background task and publishes its
/// [`AsyncResource`] states.
///
/// Runs are independent: two calls for the same logical resource perform two
/// fetches. There is no retry, no timeout and no cancellation; dropping the
/// stream only detaches the observer.
#[derive(Clone, Debug)]
pub struct AsyncOperationRunner {
    handle: Handle,
}

impl AsyncOperationRunner {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Runner bound to the tokio runtime the caller is running on.
    pub fn try_current() -> Result<Self, EngineError> {
        Ok(Self::new(Handle::try_current()?))
    }

    /// Emits `Loading`, runs `fetch`, then emits `Success` or `Error`.
    ///
    /// A `Failure` outcome becomes an `Error` whose message is the failure
    /// body verbatim. A fault returned by `fetch`, or a panic inside it,
    /// becomes an `Error` carrying the fault description.
    pub fn run<T, E, F, Fut>(&self, fetch: F) -> ResourceStream<T>
    where
        T: Send + 'static,
        E: fmt::Display + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Outcome<T>, E>> + Send + 'static,
    {
        self.spawn_run(None, None, fetch)
    }

    /// Like [`run`](Self::run), but `Loading` and `Error` keep `previous` so
    /// the screen can leave the last known value visible.
    pub fn run_retaining<T, E, F, Fut>(&self, previous: Option<T>, fetch: F) -> ResourceStream<T>
    where
        T: Clone + Send + 'static,
        E: fmt::Display + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Outcome<T>, E>> + Send + 'static,
    {
        let retained = previous.clone();
        self.spawn_run(previous, retained, fetch)
    }

    fn spawn_run<T, E, F, Fut>(
        &self,
        loading_data: Option<T>,
        error_data: Option<T>,
        fetch: F,
    ) -> ResourceStream<T>
    where
        T: Send + 'static,
        E: fmt::Display + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Outcome<T>, E>> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();

        // Queued before the worker exists: Loading can never trail its terminal state.
        let _ = tx.send(AsyncResource::Loading { data: loading_data });
        tracing::debug!("resource loading");

        let worker = self.handle.spawn(async move { fetch().await });
        self.handle.spawn(async move {
            let terminal = terminal_state(worker.await, error_data);
            tracing::debug!("resource finished with status {}", terminal.status());
            if tx.send(terminal).is_err() {
                tracing::debug!("observer detached before the terminal state");
            }
        });

        ResourceStream { rx }
    }
}

fn terminal_state<T, E: fmt::Display>(
    joined: Result<Result<Outcome<T>, E>, JoinError>,
    retained: Option<T>,
) -> AsyncResource<T> {
    let message = match joined {
        Ok(Ok(Outcome::Success(data))) => return AsyncResource::Success { data },
        Ok(Ok(Outcome::Failure { status, body })) => {
            tracing::warn!("request failed with status {status}");
            failure_message(status, body)
        }
        Ok(Err(fault)) => {
            tracing::warn!("request fault: {fault}");
            fault.to_string()
        }
        Err(err) => {
            let message = join_message(err);
            tracing::warn!("fetch task aborted: {message}");
            message
        }
    };

    AsyncResource::Error {
        message,
        data: retained,
    }
}

fn failure_message(status: u16, body: String) -> String {
    if body.trim().is_empty() {
        format!("request failed with status {status}")
    } else {
        body
    }
}

fn join_message(err: JoinError) -> String {
    if err.is_panic() {
        panic_text(err.into_panic())
    } else {
        "fetch cancelled".to_string()
    }
}

fn panic_text(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_string(),
            Err(_) => "fetch panicked".to_string(),
        },
    }
}

//! Media probes
//!
//! Probes run on a dedicated Tokio runtime (reqwest needs one; GPUI's
//! executors are not Tokio). Each probe is tied to the component that
//! started it: dropping the returned handle aborts the Tokio task, so a
//! destroyed preview never receives a stale result.

pub mod client;

pub use client::*;

use gpui::*;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};
use tokio::runtime::Runtime;
use tokio::task::{JoinError, JoinHandle};

/// Errors from a single media probe
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Probe task failed: {0}")]
    Join(#[from] JoinError),
}

/// Global probe state with the Tokio runtime used for HTTP
pub struct ProbeState {
    pub client: MediaProbeClient,
    pub runtime: Arc<Runtime>,
}

impl ProbeState {
    fn new() -> Result<Self, ProbeError> {
        let runtime = Runtime::new()?;

        // reqwest wants to be built inside a runtime context
        let client = runtime.block_on(async { MediaProbeClient::new() });

        Ok(Self {
            client,
            runtime: Arc::new(runtime),
        })
    }

    /// Spawn a probe on the Tokio runtime; the task is aborted when the
    /// returned handle is dropped.
    pub fn spawn<F>(&self, future: F) -> AbortOnDrop<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        AbortOnDrop(self.runtime.spawn(future))
    }
}

impl Global for ProbeState {}

/// Join handle that aborts its task when dropped
pub struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Future for AbortOnDrop<T> {
    type Output = Result<T, ProbeError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx).map(|result| result.map_err(ProbeError::from))
    }
}

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Initialize the probe runtime. Media previews fall back to unresolved
/// state when it is missing.
pub fn init(cx: &mut App) {
    if cx.has_global::<ProbeState>() {
        return;
    }

    match ProbeState::new() {
        Ok(state) => {
            cx.set_global(state);
            tracing::debug!("Media probe runtime initialized");
        }
        Err(e) => {
            tracing::warn!("Media probes disabled, failed to start runtime: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::prelude::v1::test;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[test]
    fn test_dropped_probe_is_aborted() {
        let runtime = Runtime::new().unwrap();
        let finished = Arc::new(AtomicBool::new(false));

        let flag = finished.clone();
        let handle = AbortOnDrop(runtime.spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            flag.store(true, Ordering::SeqCst);
        }));
        drop(handle);

        std::thread::sleep(Duration::from_millis(400));
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[test]
    fn test_completed_probe_yields_output() {
        let runtime = Runtime::new().unwrap();
        let handle = AbortOnDrop(runtime.spawn(async { 7 }));
        assert_eq!(runtime.block_on(handle).unwrap(), 7);
    }
}

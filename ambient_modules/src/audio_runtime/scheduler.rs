// src/audio_runtime/scheduler.rs

use std::future::Future;
use std::time::Duration;

use tokio::task::AbortHandle;

/// What a repeating task does after firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fire {
    Rearm,
    Stop,
}

/// A tokio task that sleeps for a freshly drawn delay, fires, and repeats
/// until the fire callback says stop or the task is aborted. Dropping the
/// handle aborts the task.
#[derive(Debug)]
pub struct RepeatingTask {
    label: String,
    handle: AbortHandle,
}

impl RepeatingTask {
    /// Must be called from inside a tokio runtime.
    pub fn spawn<D, F, Fut>(label: impl Into<String>, mut next_delay: D, mut fire: F) -> Self
    where
        D: FnMut() -> Duration + Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Fire> + Send + 'static,
    {
        let join = tokio::spawn(async move {
            loop {
                tokio::time::sleep(next_delay()).await;
                if fire().await == Fire::Stop {
                    break;
                }
            }
        });
        Self {
            label: label.into(),
            handle: join.abort_handle(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

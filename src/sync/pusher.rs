use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde_json::Value;

use super::debounce::PendingWrite;
use crate::remote::{RemoteError, RemoteStore};

/// Background writer that pushes the latest document to the remote once the
/// quiet period has elapsed without a newer save.
pub struct RemotePusher {
    shared: Arc<Shared>,
    quiet: Duration,
    worker: Option<JoinHandle<()>>,
}

struct Shared {
    state: Mutex<PusherState>,
    wake: Condvar,
}

struct PusherState {
    pending: PendingWrite<Value>,
    closing: bool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PusherState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RemotePusher {
    pub fn spawn(remote: Arc<dyn RemoteStore>, quiet: Duration) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(PusherState {
                pending: PendingWrite::new(),
                closing: false,
            }),
            wake: Condvar::new(),
        });
        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("carona-remote-push".to_string())
            .spawn(move || run(&worker_shared, remote.as_ref()));
        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::warn!("remote push worker could not start, remote sync disabled: {err}");
                None
            }
        };
        Self {
            shared,
            quiet,
            worker,
        }
    }

    pub fn schedule(&self, payload: Value) {
        let mut state = self.shared.lock();
        if state
            .pending
            .schedule(payload, Instant::now() + self.quiet)
            .is_some()
        {
            log::debug!("superseded pending remote write");
        }
        self.shared.wake.notify_all();
    }

    /// Drops the pending write without sending it.
    pub fn cancel(&self) -> bool {
        let mut state = self.shared.lock();
        let cancelled = state.pending.take().is_some();
        self.shared.wake.notify_all();
        cancelled
    }

    pub fn has_pending(&self) -> bool {
        self.shared.lock().pending.is_pending()
    }

    /// Sends a still-pending write right away and stops the worker.
    pub fn close(&mut self) {
        {
            let mut state = self.shared.lock();
            state.closing = true;
            self.shared.wake.notify_all();
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("remote push worker panicked");
            }
        }
    }
}

impl Drop for RemotePusher {
    fn drop(&mut self) {
        self.close();
    }
}

fn run(shared: &Shared, remote: &dyn RemoteStore) {
    let mut state = shared.lock();
    loop {
        if state.closing {
            let last = state.pending.take();
            drop(state);
            if let Some(payload) = last {
                push(remote, &payload);
            }
            return;
        }

        let Some(due) = state.pending.deadline() else {
            state = shared
                .wake
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            continue;
        };

        let now = Instant::now();
        if let Some(payload) = state.pending.take_due(now) {
            drop(state);
            push(remote, &payload);
            state = shared.lock();
        } else {
            let (guard, _) = shared
                .wake
                .wait_timeout(state, due.saturating_duration_since(now))
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
    }
}

fn push(remote: &dyn RemoteStore, payload: &Value) {
    match remote.write(payload) {
        Ok(()) => log::info!("pushed document to {}", remote.describe()),
        Err(RemoteError::NotConfigured) => log::debug!("no remote configured, skipping push"),
        Err(err) => log::warn!("remote write failed, dropping it: {err}"),
    }
}

#[cfg(test)]
#[path = "pusher_tests.rs"]
mod tests;

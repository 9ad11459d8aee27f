use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::remote::RemoteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Unknown,
    Online,
    Offline,
}

impl Connectivity {
    pub fn as_str(self) -> &'static str {
        match self {
            Connectivity::Unknown => "unknown",
            Connectivity::Online => "online",
            Connectivity::Offline => "offline",
        }
    }

    fn from_ping(reachable: bool) -> Self {
        if reachable {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type ChangeCallback = Box<dyn Fn(Connectivity) + Send>;

/// Pings the remote on a fixed interval and publishes the result. Only the
/// indicator reads it; loads and saves never wait on it.
pub struct HealthMonitor {
    status: Arc<Mutex<Connectivity>>,
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl HealthMonitor {
    pub fn spawn_with(
        remote: Arc<dyn RemoteStore>,
        interval: Duration,
        on_change: ChangeCallback,
    ) -> Self {
        let status = Arc::new(Mutex::new(Connectivity::Unknown));
        let (stop, stopped) = mpsc::channel::<()>();
        let worker_status = Arc::clone(&status);
        let worker = thread::Builder::new()
            .name("carona-health".to_string())
            .spawn(move || loop {
                let next = Connectivity::from_ping(remote.ping());
                let previous = {
                    let mut current = worker_status
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner);
                    std::mem::replace(&mut *current, next)
                };
                if previous != next {
                    log::debug!("connectivity {previous} -> {next}");
                    on_change(next);
                }
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            });
        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::warn!("health poller could not start: {err}");
                None
            }
        };
        Self {
            status,
            stop: Some(stop),
            worker,
        }
    }

    pub fn status(&self) -> Connectivity {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks on the poller thread; it only ends when the process does.
    pub fn wait(mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("health poller panicked");
            }
        }
    }

    fn stop(&mut self) {
        self.stop.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("health poller panicked");
            }
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

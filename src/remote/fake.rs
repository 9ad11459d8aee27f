use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde_json::Value;

use super::{RemoteError, RemoteStore};

/// In-memory remote for tests: records every write and can be switched
/// into failure modes.
#[derive(Default)]
pub struct FakeRemote {
    row: Mutex<Option<Value>>,
    writes: Mutex<Vec<Value>>,
    unreachable: AtomicBool,
    reject_writes: AtomicBool,
}

impl FakeRemote {
    pub fn with_row(row: Value) -> Self {
        let remote = Self::default();
        *remote.row.lock().unwrap() = Some(row);
        remote
    }

    pub fn unreachable() -> Self {
        let remote = Self::default();
        remote.set_unreachable(true);
        remote
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn writes(&self) -> Vec<Value> {
        self.writes.lock().unwrap().clone()
    }

    pub fn row(&self) -> Option<Value> {
        self.row.lock().unwrap().clone()
    }
}

impl RemoteStore for FakeRemote {
    fn read(&self) -> Result<Option<Value>, RemoteError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(RemoteError::Status {
                code: 503,
                body: "fake outage".to_string(),
            });
        }
        Ok(self.row())
    }

    fn write(&self, document: &Value) -> Result<(), RemoteError> {
        self.writes.lock().unwrap().push(document.clone());
        if self.unreachable.load(Ordering::SeqCst) || self.reject_writes.load(Ordering::SeqCst) {
            return Err(RemoteError::Status {
                code: 500,
                body: "fake write failure".to_string(),
            });
        }
        *self.row.lock().unwrap() = Some(document.clone());
        Ok(())
    }

    fn ping(&self) -> bool {
        !self.unreachable.load(Ordering::SeqCst)
    }

    fn describe(&self) -> String {
        "fake remote".to_string()
    }
}

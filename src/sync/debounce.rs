use std::time::Instant;

/// Single-slot holder for the next remote write. Scheduling again replaces
/// both the payload and the deadline, so only the latest payload can fire.
#[derive(Debug)]
pub struct PendingWrite<T> {
    slot: Option<Scheduled<T>>,
}

#[derive(Debug)]
struct Scheduled<T> {
    payload: T,
    due: Instant,
}

impl<T> Default for PendingWrite<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T> PendingWrite<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the payload that was superseded, if any.
    pub fn schedule(&mut self, payload: T, due: Instant) -> Option<T> {
        self.slot
            .replace(Scheduled { payload, due })
            .map(|previous| previous.payload)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.slot.as_ref().map(|scheduled| scheduled.due)
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(due) if due <= now => self.take(),
            _ => None,
        }
    }

    pub fn take(&mut self) -> Option<T> {
        self.slot.take().map(|scheduled| scheduled.payload)
    }
}

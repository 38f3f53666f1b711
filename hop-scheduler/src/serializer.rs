//! Mutual exclusion between scheduling runs.

use std::sync::{Mutex, PoisonError};

use log::debug;

/// Exclusive slot shared by every [`Scheduler`](crate::Scheduler) that must
/// not overlap.
///
/// [`run`](Self::run) blocks until no other closure holds the slot. The slot
/// is released on every exit path, including a panic inside the closure; a
/// later run is not refused because an earlier one panicked.
///
/// # Examples
///
/// ```
/// use hop_scheduler::RunSerializer;
///
/// let serializer = RunSerializer::new();
/// let answer = serializer.run(|| 40 + 2);
/// assert_eq!(answer, 42);
/// ```
#[derive(Debug, Default)]
pub struct RunSerializer {
    slot: Mutex<()>,
}

impl RunSerializer {
    /// Create an unlocked serializer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(()),
        }
    }

    /// Run `f` while holding the slot.
    pub fn run<T, F>(&self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let _guard = self.slot.lock().unwrap_or_else(|poisoned| {
            debug!("previous scheduling run panicked; reclaiming run slot");
            PoisonError::into_inner(poisoned)
        });
        f()
    }
}

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use hashbrown::HashMap;

/// Per-slot count of extractions that still read the slot's volume.
#[derive(Default)]
pub(crate) struct SlotLocks {
    counts: Mutex<HashMap<usize, u32>>,
    released: Condvar,
}

impl SlotLocks {
    fn counts(&self) -> MutexGuard<'_, HashMap<usize, u32>> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn lock(&self, idx: usize) {
        *self.counts().entry(idx).or_insert(0) += 1;
    }

    pub(crate) fn unlock(&self, idx: usize) {
        let mut counts = self.counts();
        let Some(n) = counts.get_mut(&idx) else {
            log::warn!(target: "locks", "unlock of slot {} that is not locked", idx);
            return;
        };
        *n -= 1;
        if *n == 0 {
            counts.remove(&idx);
            self.released.notify_all();
        }
    }

    pub(crate) fn is_locked(&self, idx: usize) -> bool {
        self.counts().contains_key(&idx)
    }

    /// Blocks until no extraction holds `idx`.
    pub(crate) fn wait_unlocked(&self, idx: usize) {
        let counts = self.counts();
        let _counts = self
            .released
            .wait_while(counts, |c| c.contains_key(&idx))
            .unwrap_or_else(PoisonError::into_inner);
    }
}

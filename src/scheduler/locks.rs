use crate::directory::SubscriberId;
use std::collections::HashSet;
use std::sync::Mutex;

/// Set of subscriber ids currently undergoing processing, shared across all
/// jobs.
///
/// This is the sole serialization mechanism between jobs: no two concurrent
/// processing calls for the same id may execute across any combination of
/// jobs. The check-and-set is a single critical section and the mutex is
/// never held across an await point.
pub struct LockRegistry {
    inner: Mutex<HashSet<SubscriberId>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashSet::new()),
        }
    }

    /// Records the id and returns true if it was absent; returns false if the
    /// id is already being processed.
    pub fn try_acquire(&self, id: &SubscriberId) -> bool {
        self.inner.lock().unwrap().insert(id.clone())
    }

    /// Removes the id. Idempotent.
    pub fn release(&self, id: &SubscriberId) {
        self.inner.lock().unwrap().remove(id);
    }

    /// Whether the id is currently held.
    pub fn is_locked(&self, id: &SubscriberId) -> bool {
        self.inner.lock().unwrap().contains(id)
    }

    /// Acquire the id and tie its release to the returned guard's lifetime,
    /// so the lock is released even when the processing call fails.
    pub fn acquire(&self, id: &SubscriberId) -> Option<SubscriberLock<'_>> {
        if self.try_acquire(id) {
            Some(SubscriberLock {
                registry: self,
                id: id.clone(),
            })
        } else {
            None
        }
    }

    /// Sorted copy of the currently held ids.
    pub fn snapshot(&self) -> Vec<SubscriberId> {
        let mut ids: Vec<SubscriberId> = self.inner.lock().unwrap().iter().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for LockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard releasing a subscriber lock on drop.
pub struct SubscriberLock<'a> {
    registry: &'a LockRegistry,
    id: SubscriberId,
}

impl Drop for SubscriberLock<'_> {
    fn drop(&mut self) {
        self.registry.release(&self.id);
    }
}

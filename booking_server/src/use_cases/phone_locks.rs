use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

// Per-phone critical sections. Read-check-write sequences on the code store
// must never interleave for the same number, so every use case touching a
// phone's entry holds that phone's lock for the duration of the sequence.
#[derive(Debug, Default)]
pub struct PhoneLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PhoneLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock_for(&self, phone: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(phone.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    // Drop registry entries nobody currently holds. Called from the sweep so
    // the registry does not grow with every phone ever seen.
    pub async fn prune(&self) {
        let mut locks = self.locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}

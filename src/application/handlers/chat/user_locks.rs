//! Per-user turn serialization.
//!
//! Each user id maps to its own async mutex so that two updates from the
//! same user never interleave, while different users proceed in parallel.
//! Entries are dropped once nobody holds or waits on them.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::UserId;

#[derive(Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

/// Held for the duration of one user's turn.
pub struct UserTurn {
    _guard: OwnedMutexGuard<()>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other turn for `user_id` is running.
    pub async fn acquire(&self, user_id: &UserId) -> UserTurn {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(user_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        UserTurn {
            _guard: lock.lock_owned().await,
        }
    }

    /// Removes entries no turn holds or waits on.
    pub async fn prune(&self) {
        self.locks
            .lock()
            .await
            .retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

//! Per-session mutual exclusion.
//!
//! Every mutating operation holds its session's lock for the whole
//! load, generate, save sequence. Calls on the same session queue up;
//! calls on different sessions never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::SessionId;

/// Registry of one async mutex per session id.
#[derive(Debug, Clone, Default)]
pub struct SessionLocks {
    locks: Arc<Mutex<HashMap<SessionId, Arc<AsyncMutex<()>>>>>,
}

/// Held while an operation owns a session.
#[derive(Debug)]
pub struct SessionGuard {
    _guard: OwnedMutexGuard<()>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other operation holds `id`, then takes it.
    pub async fn acquire(&self, id: SessionId) -> SessionGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|p| p.into_inner());
            // Entries only referenced by the map are idle.
            locks.retain(|_, l| Arc::strong_count(l) > 1);
            locks.entry(id).or_default().clone()
        };
        SessionGuard {
            _guard: lock.lock_owned().await,
        }
    }

    /// Number of sessions currently locked or awaited.
    pub fn active(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(|p| p.into_inner());
        locks.values().filter(|l| Arc::strong_count(l) > 1).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn same_session_is_serialized() {
        let locks = SessionLocks::new();
        let id = SessionId::new();
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let locks = locks.clone();
                let inside = inside.clone();
                let max_inside = max_inside.clone();
                tokio::spawn(async move {
                    let _guard = locks.acquire(id).await;
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_inside.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();
        for t in tasks {
            t.await.unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_sessions_do_not_block() {
        let locks = SessionLocks::new();
        let _a = locks.acquire(SessionId::new()).await;
        let b = tokio::time::timeout(Duration::from_millis(50), locks.acquire(SessionId::new())).await;
        assert!(b.is_ok());
        assert_eq!(locks.active(), 2);
    }

    #[tokio::test]
    async fn released_locks_are_pruned() {
        let locks = SessionLocks::new();
        {
            let _g = locks.acquire(SessionId::new()).await;
        }
        let _g = locks.acquire(SessionId::new()).await;
        assert_eq!(locks.active(), 1);
        assert_eq!(locks.locks.lock().unwrap().len(), 1);
    }
}

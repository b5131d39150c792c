//! Bounded history of finished import sessions.

use std::collections::{HashMap, VecDeque};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::ImportSession;

#[derive(Default)]
struct History {
    order: VecDeque<Uuid>,
    sessions: HashMap<Uuid, ImportSession>,
}

/// Keeps the most recent sessions so they can be inspected and retried.
///
/// Oldest sessions are evicted once `capacity` is reached.
pub struct SessionRegistry {
    capacity: usize,
    inner: RwLock<History>,
}

impl SessionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: RwLock::new(History::default()),
        }
    }

    /// Stores `session`, replacing any previous version with the same id.
    pub async fn save(&self, session: ImportSession) {
        let mut history = self.inner.write().await;
        let id = session.id;

        if history.sessions.insert(id, session).is_none() {
            history.order.push_back(id);
        }

        while history.order.len() > self.capacity {
            if let Some(evicted) = history.order.pop_front() {
                history.sessions.remove(&evicted);
                tracing::debug!(session_id = %evicted, "Evicted import session");
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> Option<ImportSession> {
        self.inner.read().await.sessions.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

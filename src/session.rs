use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::{Result, TravelPlannerError};
use crate::history::HistoryStore;
use crate::models::{CurrencyInfo, Itinerary};
use crate::presentation::PackingChecklist;

pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// The most recent successful generation, not yet saved to history
#[derive(Debug, Clone)]
pub struct CurrentPlan {
    pub source: String,
    pub destination: String,
    pub date: String,
    pub itinerary: Itinerary,
    pub currency: Option<CurrencyInfo>,
}

/// Everything one user's session owns
#[derive(Debug, Default)]
pub struct SessionContext {
    pub history: HistoryStore,
    pub current: Option<CurrentPlan>,
    pub packing: PackingChecklist,
    /// Trip shown in the history detail panel
    pub viewing: Option<u64>,
}

pub type SharedSession = Arc<Mutex<SessionContext>>;

#[derive(Debug)]
struct SessionEntry {
    session: SharedSession,
    created: Instant,
    last_seen: Instant,
}

impl SessionEntry {
    /// Idle past the TTL and not held by any in-flight request
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.last_seen) > ttl && Arc::strong_count(&self.session) == 1
    }
}

/// Live sessions keyed by id. Each session is locked for the duration of one
/// user action, so actions within a session never interleave. Sessions idle
/// for longer than the TTL are evicted on the next `create` or `get`.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    idle_ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TTL)
    }
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions, now);
        sessions.insert(
            id,
            SessionEntry {
                session: Arc::new(Mutex::new(SessionContext::default())),
                created: now,
                last_seen: now,
            },
        );
        tracing::info!(session = %id, active = sessions.len(), "Session started");
        id
    }

    /// Look up a session and mark it as used
    pub async fn get(&self, id: Uuid) -> Result<SharedSession> {
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions, now);
        let entry = sessions
            .get_mut(&id)
            .ok_or(TravelPlannerError::SessionNotFound(id))?;
        entry.last_seen = now;
        Ok(Arc::clone(&entry.session))
    }

    /// Drop a session and everything it holds. Returns false for unknown ids.
    pub async fn end(&self, id: Uuid) -> bool {
        match self.sessions.write().await.remove(&id) {
            Some(entry) => {
                tracing::info!(
                    session = %id,
                    age_secs = entry.created.elapsed().as_secs(),
                    "Session ended"
                );
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: Instant) {
        sessions.retain(|id, entry| {
            if entry.is_expired(now, self.idle_ttl) {
                tracing::info!(
                    session = %id,
                    age_secs = now.duration_since(entry.created).as_secs(),
                    "Session expired after inactivity"
                );
                return false;
            }
            true
        });
    }
}

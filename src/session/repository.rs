use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument};

use super::{
    clock::{Clock, SystemClock},
    generators::{SessionIdGenerator, UuidSessionIdGenerator},
    models::{NewSession, SessionModel},
    types::{SessionConfig, SessionStats},
};

/// Trait for session directory operations
///
/// Lookups that find nothing are not errors: `get_session` returns `None` and
/// `remove_session` returns `false`.
pub trait SessionRepository {
    /// Stores the record under a freshly generated identifier and returns it
    fn create_session(&self, session: NewSession) -> String;
    /// Returns the live record and refreshes its last activity. Expired
    /// records are deleted on the spot and reported as missing.
    fn get_session(&self, session_id: &str) -> Option<SessionModel>;
    fn remove_session(&self, session_id: &str) -> bool;
    /// Deletes expired and idle records, returning how many were removed
    fn sweep_sessions(&self) -> usize;
    fn session_stats(&self) -> SessionStats;
}

/// In-memory session directory.
///
/// Every operation holds the mutex for its whole duration and never awaits,
/// so create/get/remove/sweep are atomic with respect to each other. Sessions
/// are lost when the process restarts.
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<String, SessionModel>>,
    clock: Arc<dyn Clock>,
    id_generator: Arc<dyn SessionIdGenerator>,
    config: SessionConfig,
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl InMemorySessionRepository {
    /// Creates an empty directory using the wall clock and UUID identifiers
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            clock: Arc::new(SystemClock::new()),
            id_generator: Arc::new(UuidSessionIdGenerator::new()),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, id_generator: Arc<dyn SessionIdGenerator>) -> Self {
        self.id_generator = id_generator;
        self
    }

    /// Returns the current number of stored sessions, expired ones included
    pub fn session_count(&self) -> usize {
        self.sessions().len()
    }

    /// Checks if a session is stored without touching it (useful for debugging)
    pub fn has_session(&self, session_id: &str) -> bool {
        self.sessions().contains_key(session_id)
    }

    /// Copies every stored record without refreshing activity
    pub fn snapshot(&self) -> Vec<SessionModel> {
        self.sessions().values().cloned().collect()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, SessionModel>> {
        // Mutations never panic half-way, so a poisoned map is still consistent
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn should_evict(&self, session: &SessionModel, now: chrono::DateTime<chrono::Utc>) -> bool {
        session.is_expired_at(now) || session.idle_for(now) > self.config.idle_timeout
    }
}

impl SessionRepository for InMemorySessionRepository {
    #[instrument(skip(self, session), fields(username = %session.username))]
    fn create_session(&self, session: NewSession) -> String {
        let session_id = self.id_generator.generate();

        let mut sessions = self.sessions();
        let model = SessionModel::from_new(session_id.clone(), session, self.clock.now());
        sessions.insert(session_id.clone(), model);

        info!(
            session_id = %session_id,
            total_sessions = sessions.len(),
            "Session stored"
        );
        session_id
    }

    #[instrument(skip(self))]
    fn get_session(&self, session_id: &str) -> Option<SessionModel> {
        let mut sessions = self.sessions();
        // Read under the lock so concurrent touches apply in time order
        let now = self.clock.now();

        let expired = match sessions.get(session_id) {
            Some(session) => session.is_expired_at(now),
            None => {
                debug!(session_id = %session_id, "Session not found");
                return None;
            }
        };

        if expired {
            sessions.remove(session_id);
            info!(session_id = %session_id, "Session expired, removed on lookup");
            return None;
        }

        let session = sessions.get_mut(session_id)?;
        session.touch(now);
        Some(session.clone())
    }

    #[instrument(skip(self))]
    fn remove_session(&self, session_id: &str) -> bool {
        let removed = self.sessions().remove(session_id).is_some();
        if removed {
            info!(session_id = %session_id, "Session removed");
        } else {
            debug!(session_id = %session_id, "No session to remove");
        }
        removed
    }

    #[instrument(skip(self))]
    fn sweep_sessions(&self) -> usize {
        let mut sessions = self.sessions();
        let now = self.clock.now();
        let initial_count = sessions.len();

        sessions.retain(|_, session| !self.should_evict(session, now));

        let removed_count = initial_count - sessions.len();
        debug!(
            expired_sessions_removed = removed_count,
            remaining_sessions = sessions.len(),
            "Session sweep finished"
        );
        removed_count
    }

    fn session_stats(&self) -> SessionStats {
        let sessions = self.sessions();
        let now = self.clock.now();

        let active = sessions
            .values()
            .filter(|session| session.idle_for(now) < self.config.active_threshold)
            .count();

        SessionStats {
            total: sessions.len(),
            active,
            inactive: sessions.len() - active,
        }
    }
}

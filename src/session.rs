// =============================================================================
// Session Store — analysis-run lifecycle tracking
// =============================================================================
//
// One Session per analysis request, keyed by a UUID handed back at request
// acceptance. A session is mutated exactly once after creation, when its
// worker completes or fails. The store is shared across workers and the REST
// layer; each key is written by exactly one worker so last-writer-wins is
// safe.
//
// Thread safety: parking_lot::RwLock around a HashMap. Eviction is twofold:
// a count cap applied on insert (oldest started_at first) and an age sweep
// driven by a background task in main.
// =============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::Serialize;

// =============================================================================
// Session
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Running,
    Completed,
    Error,
}

/// State of one analysis run, from acceptance to terminal completion/failure.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: String,
    pub status: SessionStatus,
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Path of the rendered report, set on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Session {
    pub fn new(id: String, symbol: String, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id,
            status: SessionStatus::Running,
            symbol,
            start_date,
            end_date,
            started_at: Utc::now(),
            completed_at: None,
            report_path: None,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status != SessionStatus::Running
    }
}

// =============================================================================
// SessionStore
// =============================================================================

/// Concurrent insert/update/read access to the process-wide session map.
pub trait SessionStore: Send + Sync {
    fn insert(&self, session: Session);
    fn get(&self, id: &str) -> Option<Session>;
    /// Mark the session completed with the rendered report's path.
    fn complete(&self, id: &str, report_path: String);
    /// Mark the session failed with a terminal error message.
    fn fail(&self, id: &str, error: String);
    /// Drop terminal sessions whose completion is older than `max_age_secs`.
    /// Returns how many were removed. Running sessions are never swept.
    fn evict_older_than(&self, max_age_secs: u64) -> usize;
    fn len(&self) -> usize;
}

/// In-memory store with a hard count cap. Inserting past the cap evicts the
/// oldest terminal session first, then the oldest session outright.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    max_sessions: usize,
}

impl InMemorySessionStore {
    pub fn new(max_sessions: usize) -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
        })
    }

    fn evict_one(sessions: &mut HashMap<String, Session>) {
        let victim = sessions
            .values()
            .filter(|s| s.is_terminal())
            .min_by_key(|s| s.started_at)
            .or_else(|| sessions.values().min_by_key(|s| s.started_at))
            .map(|s| s.id.clone());
        if let Some(id) = victim {
            sessions.remove(&id);
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, session: Session) {
        let mut sessions = self.sessions.write();
        while sessions.len() >= self.max_sessions {
            Self::evict_one(&mut sessions);
        }
        sessions.insert(session.id.clone(), session);
    }

    fn get(&self, id: &str) -> Option<Session> {
        self.sessions.read().get(id).cloned()
    }

    fn complete(&self, id: &str, report_path: String) {
        if let Some(session) = self.sessions.write().get_mut(id) {
            session.status = SessionStatus::Completed;
            session.completed_at = Some(Utc::now());
            session.report_path = Some(report_path);
        }
    }

    fn fail(&self, id: &str, error: String) {
        if let Some(session) = self.sessions.write().get_mut(id) {
            session.status = SessionStatus::Error;
            session.completed_at = Some(Utc::now());
            session.error = Some(error);
        }
    }

    fn evict_older_than(&self, max_age_secs: u64) -> usize {
        let cutoff = Utc::now() - chrono::Duration::seconds(max_age_secs as i64);
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        // Age from completion, not from start: a long run that just finished
        // must get its full retention window.
        sessions.retain(|_, s| {
            !s.is_terminal() || s.completed_at.is_some_and(|done| done > cutoff)
        });
        before - sessions.len()
    }

    fn len(&self) -> usize {
        self.sessions.read().len()
    }
}

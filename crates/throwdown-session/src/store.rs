//! The session store: the single owner of every match record.
//!
//! Responsibilities:
//! - Allocating collision-free ids and inserting new sessions
//! - Handing out snapshots (never references into the map)
//! - Atomic read-modify-write through [`SessionStore::update`]
//! - Evicting sessions past their time-to-live for the sweeper
//!
//! # Concurrency note
//!
//! Unlike a single-owner registry, this store is shared: every request
//! handler and the sweeper hold an `Arc<SessionStore>`. One
//! `tokio::sync::Mutex` guards the whole map. Critical sections are short
//! and synchronous (no `.await` while the guard is held, no I/O), so a
//! global lock is enough and makes per-id atomicity trivial.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::{Metadata, Session, SessionError, SessionId, SessionStatus};

/// How many fresh ids `create` tries before giving up.
const MAX_ID_ATTEMPTS: usize = 8;

type IdSource = Box<dyn Fn() -> SessionId + Send + Sync>;

/// Concurrent map from [`SessionId`] to [`Session`].
///
/// ## Lifecycle
///
/// ```text
/// create() ──→ [Initiated] ──update()──→ [Accepted] ──update()──→ [Resolved]
///                   │                        │                       │
///                   └──── for_each_expired() (age > ttl) ────────────┘──→ gone
/// ```
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
    id_source: IdSource,
}

impl SessionStore {
    /// Creates an empty store that allocates random 128-bit ids.
    pub fn new() -> Self {
        Self::with_id_source(generate_id)
    }

    /// Creates an empty store that draws ids from `source`.
    ///
    /// Intended for tests that need predictable or colliding ids.
    pub fn with_id_source(source: impl Fn() -> SessionId + Send + Sync + 'static) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            id_source: Box::new(source),
        }
    }

    /// Stores a new `Initiated` session and returns its id.
    ///
    /// The id is picked and the record inserted under the same lock, so no
    /// reader can ever observe a half-built session.
    ///
    /// # Errors
    /// Returns [`SessionError::IdSpaceExhausted`] if every candidate id
    /// collided with an existing session. Existing records are never
    /// overwritten.
    pub async fn create(
        &self,
        challenger: impl Into<String>,
        target: impl Into<String>,
        metadata: Metadata,
    ) -> Result<SessionId, SessionError> {
        let mut sessions = self.sessions.lock().await;

        let id = (0..MAX_ID_ATTEMPTS)
            .map(|_| (self.id_source)())
            .find(|candidate| !sessions.contains_key(candidate))
            .ok_or(SessionError::IdSpaceExhausted {
                attempts: MAX_ID_ATTEMPTS,
            })?;

        let session = Session {
            id: id.clone(),
            created_at: Instant::now(),
            challenger: challenger.into(),
            target: target.into(),
            challenger_move: None,
            target_move: None,
            status: SessionStatus::Initiated,
            metadata,
        };
        sessions.insert(id.clone(), session);

        tracing::info!(session_id = %id, "session created");
        Ok(id)
    }

    /// Returns a snapshot of the session, or `None` if it doesn't exist.
    pub async fn get(&self, id: &SessionId) -> Option<Session> {
        self.sessions.lock().await.get(id).cloned()
    }

    /// Applies `mutate` to a session atomically.
    ///
    /// `mutate` runs on a working copy while the store lock is held. If it
    /// returns `Ok`, the copy replaces the stored record; if it returns
    /// `Err`, the record is left exactly as it was. Two concurrent updates
    /// of the same id are serialized, so neither write is lost.
    ///
    /// `id`, `created_at`, `challenger` and `target` are immutable and are
    /// restored on the copy before it is committed.
    ///
    /// `mutate` must not block; it runs inside the critical section.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] (converted into `E`) if no such session
    /// - whatever `mutate` returns
    pub async fn update<T, E, F>(&self, id: &SessionId, mutate: F) -> Result<T, E>
    where
        F: FnOnce(&mut Session) -> Result<T, E>,
        E: From<SessionError>,
    {
        let mut sessions = self.sessions.lock().await;
        let current = sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;

        let mut draft = current.clone();
        let value = mutate(&mut draft)?;

        draft.id = current.id.clone();
        draft.created_at = current.created_at;
        draft.challenger = std::mem::take(&mut current.challenger);
        draft.target = std::mem::take(&mut current.target);
        *current = draft;

        Ok(value)
    }

    /// Removes a session. Returns `true` if it existed.
    ///
    /// Deleting an unknown id is a no-op, not an error.
    pub async fn delete(&self, id: &SessionId) -> bool {
        let removed = self.sessions.lock().await.remove(id).is_some();
        if removed {
            tracing::debug!(session_id = %id, "session deleted");
        }
        removed
    }

    /// Evicts every session older than `ttl` and passes each one to `f`.
    ///
    /// Eviction happens under the lock; `f` runs after the lock is
    /// released, so it may be slow without stalling other sessions.
    /// Unresolved sessions reach `f` with status [`SessionStatus::Expired`];
    /// resolved ones keep [`SessionStatus::Resolved`].
    ///
    /// Returns the number of evicted sessions.
    pub async fn for_each_expired<F>(&self, ttl: Duration, mut f: F) -> usize
    where
        F: FnMut(Session),
    {
        let evicted: Vec<Session> = {
            let mut sessions = self.sessions.lock().await;
            let now = Instant::now();
            let stale: Vec<SessionId> = sessions
                .values()
                .filter(|s| now.saturating_duration_since(s.created_at) > ttl)
                .map(|s| s.id.clone())
                .collect();
            stale.iter().filter_map(|id| sessions.remove(id)).collect()
        };

        let count = evicted.len();
        for mut session in evicted {
            if session.status.can_transition_to(SessionStatus::Expired) {
                session.status = SessionStatus::Expired;
            }
            f(session);
        }
        count
    }

    /// Number of stored sessions (any status).
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Returns `true` if the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

/// Generates a random 32-character hex id (128 bits of entropy).
fn generate_id() -> SessionId {
    let bytes: [u8; 16] = rand::rng().random();
    SessionId::from(bytes.iter().map(|b| format!("{b:02x}")).collect::<String>())
}

// =========================================================================
// Tests
// =========================================================================

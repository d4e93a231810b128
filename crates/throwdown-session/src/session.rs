//! Session types: the record of one match.
//!
//! A session tracks:
//! - WHO is playing (challenger and target identities)
//! - WHAT they played so far (one optional move each)
//! - WHERE the match is in its lifecycle ([`SessionStatus`])
//! - WHEN it was created (so the sweeper knows when to evict it)

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::{Metadata, ProfileKind};

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// Opaque session identifier: 32 lowercase hex characters (128 bits).
///
/// Players see it in the accept command and it travels inside button
/// payloads, so it's a string rather than a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Where a match is in its lifecycle.
///
/// ```text
/// Initiated ──(accept)──→ Accepted ──(second move)──→ Resolved
///     │                      │
///     └──────(sweep)─────────┴──→ Expired
/// ```
///
/// `Resolved` and `Expired` are terminal. `Expired` is never stored: the
/// sweeper stamps it on the copy it hands out while evicting the record.
/// When the accept step is disabled a match may go straight from
/// `Initiated` to `Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Initiated,
    Accepted,
    Resolved,
    Expired,
}

impl SessionStatus {
    /// Returns `true` if moving to `target` is a legal transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Initiated, Self::Accepted)
                | (Self::Initiated, Self::Resolved)
                | (Self::Accepted, Self::Resolved)
                | (Self::Initiated, Self::Expired)
                | (Self::Accepted, Self::Expired)
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initiated => write!(f, "initiated"),
            Self::Accepted => write!(f, "accepted"),
            Self::Resolved => write!(f, "resolved"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Which side of a match an identity plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Challenger,
    Target,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One match between two participants.
///
/// Values of this type handed out by the store are snapshots. Editing one
/// changes nothing; all writes go through
/// [`SessionStore::update`](crate::SessionStore::update), which also
/// restores `id`, `created_at`, `challenger` and `target` if a mutation
/// tries to touch them.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub created_at: Instant,
    pub challenger: String,
    pub target: String,
    pub challenger_move: Option<String>,
    pub target_move: Option<String>,
    pub status: SessionStatus,
    pub metadata: Metadata,
}

impl Session {
    /// The role `identity` plays in this match, if any.
    ///
    /// Identities are compared exactly. A self-challenge would make both
    /// roles match; the match layer refuses to create one.
    pub fn role_of(&self, identity: &str) -> Option<Role> {
        if identity == self.challenger {
            Some(Role::Challenger)
        } else if identity == self.target {
            Some(Role::Target)
        } else {
            None
        }
    }

    /// The move recorded for `role`, if any.
    pub fn move_of(&self, role: Role) -> Option<&str> {
        match role {
            Role::Challenger => self.challenger_move.as_deref(),
            Role::Target => self.target_move.as_deref(),
        }
    }

    /// Records (or replaces) the move for `role`.
    pub fn set_move(&mut self, role: Role, name: impl Into<String>) {
        let slot = match role {
            Role::Challenger => &mut self.challenger_move,
            Role::Target => &mut self.target_move,
        };
        *slot = Some(name.into());
    }

    /// Both moves, challenger first, once both are in.
    pub fn moves(&self) -> Option<(&str, &str)> {
        Some((self.challenger_move.as_deref()?, self.target_move.as_deref()?))
    }

    /// Returns `true` if the collaborator attached the given profile.
    pub fn has_profile(&self, kind: ProfileKind) -> bool {
        self.metadata.has_profile(kind)
    }

    /// Time since the session was created.
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            id: SessionId::from("abc"),
            created_at: Instant::now(),
            challenger: "alice".into(),
            target: "bob".into(),
            challenger_move: None,
            target_move: None,
            status: SessionStatus::Initiated,
            metadata: Metadata::default(),
        }
    }

    #[test]
    fn test_status_transitions() {
        use SessionStatus::*;
        assert!(Initiated.can_transition_to(Accepted));
        assert!(Accepted.can_transition_to(Resolved));
        assert!(Initiated.can_transition_to(Expired));
        assert!(!Accepted.can_transition_to(Initiated));
        assert!(!Resolved.can_transition_to(Expired));
        assert!(!Expired.can_transition_to(Accepted));
        assert!(Initiated.can_transition_to(Resolved), "accept step is optional");
        assert!(!Resolved.can_transition_to(Accepted));
        assert!(!Resolved.can_transition_to(Resolved));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SessionStatus::Initiated.to_string(), "initiated");
        assert_eq!(SessionStatus::Resolved.to_string(), "resolved");
    }

    #[test]
    fn test_role_of_matches_exactly() {
        let s = session();
        assert_eq!(s.role_of("alice"), Some(Role::Challenger));
        assert_eq!(s.role_of("bob"), Some(Role::Target));
        assert_eq!(s.role_of("Alice"), None);
        assert_eq!(s.role_of("mallory"), None);
    }

    #[test]
    fn test_moves_requires_both() {
        let mut s = session();
        assert_eq!(s.moves(), None);
        s.set_move(Role::Target, "paper");
        assert_eq!(s.moves(), None);
        assert_eq!(s.move_of(Role::Target), Some("paper"));
        s.set_move(Role::Challenger, "rock");
        assert_eq!(s.moves(), Some(("rock", "paper")));
    }

    #[test]
    fn test_session_id_display_is_raw_string() {
        let id = SessionId::from("0123abcd");
        assert_eq!(id.to_string(), "0123abcd");
        assert_eq!(id.as_str(), "0123abcd");
    }
}

//! Error types for the match layer.
//!
//! [`MatchError`]'s `Display` text is shown to players verbatim, so it is
//! written as a chat reply rather than a log line.

use throwdown_session::{SessionError, SessionId};

/// Why a match operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// The move is not in the catalog. Nothing was stored.
    #[error("\"{0}\" is not a valid move.")]
    InvalidMove(String),

    /// No session under this id. It never existed or has expired.
    #[error(
        "The provided game session id is not valid. \
         Game session either doesn't exist or has expired."
    )]
    UnknownSession(SessionId),

    /// The session is past the `Initiated` state.
    #[error("The provided game session id has already been accepted.")]
    AlreadyAccepted(SessionId),

    /// The caller is neither the challenger nor the target.
    #[error("Only the two players in this game session can submit a move.")]
    UnauthorizedParticipant {
        session_id: SessionId,
        participant: String,
    },

    /// The challenge target could not be turned into an identity.
    #[error("Could not find anyone to challenge in \"{0}\".")]
    UnresolvableTarget(String),

    /// A move arrived before the target accepted.
    #[error("This game session has not been accepted yet.")]
    NotAccepted(SessionId),

    /// Challenger and target resolved to the same identity.
    #[error("You can't challenge yourself.")]
    SelfChallenge,

    /// The store could not complete the operation.
    #[error("The game session could not be saved, please try again.")]
    Store(SessionError),
}

impl From<SessionError> for MatchError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(id) => Self::UnknownSession(id),
            other => Self::Store(other),
        }
    }
}

/// A notice could not be delivered.
///
/// Never fatal: the engine logs it and counts it in
/// [`Delivery::failed`](crate::Delivery).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// The request never got an answer (DNS, connect, timeout, ...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The destination answered with a non-success status.
    #[error("destination rejected notice with status {0}")]
    Rejected(u16),

    /// The notifier cannot reach this kind of destination at all.
    #[error("destination unavailable: {0}")]
    Unavailable(String),
}

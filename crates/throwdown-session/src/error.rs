//! Error types for the session layer.

use crate::SessionId;

/// Errors raised by the [`SessionStore`](crate::SessionStore) itself.
///
/// Rule violations (wrong participant, already accepted, ...) are not
/// store errors; they come from the mutation closures passed to
/// [`SessionStore::update`](crate::SessionStore::update).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No session exists under this id. It was never created, or it was
    /// already resolved and swept, or it expired.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// Every freshly generated id collided with a live one.
    ///
    /// With 128-bit random ids this never happens in practice; it exists
    /// so a broken id source fails loudly instead of overwriting a record.
    #[error("could not allocate a session id after {attempts} attempts")]
    IdSpaceExhausted {
        /// How many ids were tried.
        attempts: usize,
    },
}

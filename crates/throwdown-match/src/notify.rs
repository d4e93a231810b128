//! Outbound notices and the hook that delivers them.

use serde::{Deserialize, Serialize};
use throwdown_session::SessionId;

use crate::{NotifyError, Resolution};

/// Where a notice goes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    /// A per-participant reply webhook.
    ResponseUrl(String),
    /// A shared chat channel, by name.
    Channel(String),
}

/// Something a player should hear about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// The target accepted; the challenger can now pick a move.
    Accepted {
        session_id: SessionId,
        challenger: String,
        target: String,
        /// Move names in display order.
        moves: Vec<String>,
    },
    /// The match is over.
    Resolved(Resolution),
}

impl Notice {
    /// The session this notice is about.
    pub fn session_id(&self) -> &SessionId {
        match self {
            Self::Accepted { session_id, .. } => session_id,
            Self::Resolved(resolution) => &resolution.session_id,
        }
    }
}

/// Delivers notices to players.
///
/// The engine calls this only after the session update is committed and
/// the store lock released. A failed delivery never undoes a transition.
pub trait Notifier: Send + Sync + 'static {
    /// Sends `notice` to `destination`.
    fn notify(
        &self,
        destination: &Destination,
        notice: &Notice,
    ) -> impl std::future::Future<Output = Result<(), NotifyError>> + Send;
}

/// How the notifications of one transition went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Destinations the notice was sent to.
    pub attempted: usize,
    /// Of those, how many failed.
    pub failed: usize,
}

impl Delivery {
    /// Destinations that got the notice.
    pub fn delivered(&self) -> usize {
        self.attempted - self.failed
    }

    /// Returns `true` if nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

//! Match rules that vary per deployment.

use serde::{Deserialize, Serialize};

/// Configuration for a [`MatchEngine`](crate::MatchEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Reject moves until the target has accepted the challenge.
    ///
    /// When `false`, either player may move as soon as the challenge
    /// exists and the accept step only delivers the move prompt.
    pub require_accept: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            require_accept: true,
        }
    }
}

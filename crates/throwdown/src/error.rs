//! Unified error type for Throwdown.

use throwdown_gateway::GatewayError;
use throwdown_match::MatchError;
use throwdown_rules::CatalogError;
use throwdown_session::SessionError;

/// Top-level error wrapping every layer's error.
///
/// The `#[from]` attributes let `?` convert layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ThrowdownError {
    /// A move catalog definition is invalid.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The session store refused an operation.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A match rule was violated.
    #[error(transparent)]
    Match(#[from] MatchError),

    /// Gateway configuration or decoding failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Binding or serving the listener failed.
    #[error("server i/o: {0}")]
    Io(#[from] std::io::Error),
}

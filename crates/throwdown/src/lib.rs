//! # Throwdown
//!
//! Rock, paper, scissors between two chat users, played through slash
//! commands and buttons.
//!
//! The workspace is layered; this crate wires the layers into one server:
//!
//! - [`throwdown_rules`]: move catalogs and resolution
//! - [`throwdown_session`]: the concurrent session store
//! - [`throwdown_sweep`]: periodic eviction of stale sessions
//! - [`throwdown_match`]: the match state machine
//! - [`throwdown_gateway`]: the Slack route, notifier and config
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use throwdown::prelude::*;
//!
//! # async fn start() -> Result<SweepStats, ThrowdownError> {
//! let config = GatewayConfig::from_env()?;
//! let notifier = SlackNotifier::new(&config)?;
//! let server = ThrowdownServer::builder()
//!     .gateway_config(config)
//!     .build(MentionResolver, notifier)
//!     .await?;
//! server.run_until(async { let _ = tokio::signal::ctrl_c().await; }).await
//! # }
//! ```

mod error;
mod server;

pub use error::ThrowdownError;
pub use server::{ThrowdownServer, ThrowdownServerBuilder};

pub use throwdown_match as engine;
pub use throwdown_gateway as gateway;
pub use throwdown_rules as rules;
pub use throwdown_session as session;
pub use throwdown_sweep as sweep;

/// Everything needed to run a server or drive the engine directly.
pub mod prelude {
    pub use crate::{ThrowdownError, ThrowdownServer, ThrowdownServerBuilder};
    pub use throwdown_gateway::{GatewayConfig, MentionResolver, SlackNotifier};
    pub use throwdown_match::{
        Delivery, Destination, IdentityResolver, MatchConfig, MatchEngine, MatchError,
        MoveReceipt, Notice, Notifier, NotifyError, Resolution, VerbatimResolver,
    };
    pub use throwdown_rules::{MoveCatalog, Outcome};
    pub use throwdown_session::{Metadata, Session, SessionId, SessionStatus, SessionStore};
    pub use throwdown_sweep::{SweepConfig, SweepStats};
}

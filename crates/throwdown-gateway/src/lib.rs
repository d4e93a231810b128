//! Slack gateway for Throwdown.
//!
//! Everything platform-specific lives here, behind the two collaborator
//! traits the match engine consumes:
//!
//! - **Inbound**: one axum route ([`router`]) receives slash commands
//!   (`/rps challenge @bob`, `/rps accept <id>`) and button clicks, and
//!   replies with Slack message JSON.
//! - **Identity**: [`MentionResolver`] turns `<@U123|bob>` style mentions
//!   into plain names.
//! - **Outbound**: [`SlackNotifier`] posts notices to reply webhooks or,
//!   with an OAuth token, to a channel via `chat.postMessage`.
//! - **Configuration**: [`GatewayConfig::from_env`] reads the `RPS_*`
//!   environment variables.
//!
//! ```text
//! Slack ──POST form──→ router ──→ MatchEngine ──→ SlackNotifier ──POST json──→ Slack
//! ```

pub mod render;
pub mod slack;

mod config;
mod error;
mod notifier;
mod resolver;
mod routes;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use notifier::SlackNotifier;
pub use resolver::MentionResolver;
pub use routes::{router, GatewayState};

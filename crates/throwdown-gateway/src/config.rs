//! Gateway configuration from the environment.

use throwdown_rules::MoveCatalog;
use tracing::warn;

use crate::GatewayError;

pub const ENV_PORT: &str = "RPS_PORT";
pub const ENV_COMMAND_NAME: &str = "RPS_COMMAND_NAME";
pub const ENV_GAME: &str = "RPS_GAME";
pub const ENV_DEBUG: &str = "RPS_DEBUG";
pub const ENV_SLACK_OAUTH: &str = "RPS_SLACK_OAUTH";

/// Settings for the Slack gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// TCP port to listen on. Default: 8081.
    pub port: u16,
    /// Path Slack posts callbacks to. Default: `/slack/rps`.
    pub route: String,
    /// Slash command name shown in replies, without the slash. Default: `rps`.
    pub command_name: String,
    /// Catalog name passed to [`MoveCatalog::named`]. Default: `standard`.
    pub game: String,
    /// Log every inbound form at `info`. Default: off.
    pub debug: bool,
    /// Bot token for `chat.postMessage`. Without it results only go to
    /// the players' reply webhooks.
    pub oauth_token: Option<String>,
    /// Base URL of the Slack Web API.
    pub api_base: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: 8081,
            route: "/slack/rps".to_owned(),
            command_name: "rps".to_owned(),
            game: "standard".to_owned(),
            debug: false,
            oauth_token: None,
            api_base: "https://slack.com/api".to_owned(),
        }
    }
}

impl GatewayConfig {
    /// Reads `RPS_PORT`, `RPS_COMMAND_NAME`, `RPS_GAME`, `RPS_DEBUG` and
    /// `RPS_SLACK_OAUTH`. Unset or empty variables keep their defaults.
    ///
    /// # Errors
    /// [`GatewayError::InvalidConfig`] if `RPS_PORT` is not a port number.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GatewayError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(ENV_PORT) {
            // Also accept the ":8081" listen-address form.
            let digits = raw.trim().trim_start_matches(':');
            config.port = digits.parse().map_err(|_| GatewayError::InvalidConfig {
                key: ENV_PORT,
                value: raw.clone(),
            })?;
        }
        if let Some(name) = get(ENV_COMMAND_NAME) {
            config.command_name = name.trim().trim_start_matches('/').to_owned();
        }
        if let Some(game) = get(ENV_GAME) {
            config.game = game.trim().to_owned();
        }
        config.debug = get(ENV_DEBUG).is_some_and(|v| v.trim() == "1");
        config.oauth_token = get(ENV_SLACK_OAUTH);

        if config.oauth_token.is_none() {
            warn!(
                "{ENV_SLACK_OAUTH} is not set; results will go to reply webhooks instead of the channel"
            );
        }
        Ok(config)
    }

    /// The move catalog named by [`game`](Self::game).
    ///
    /// # Errors
    /// [`GatewayError::UnknownGame`] if no such variant exists.
    pub fn catalog(&self) -> Result<MoveCatalog, GatewayError> {
        MoveCatalog::named(&self.game).ok_or_else(|| GatewayError::UnknownGame(self.game.clone()))
    }

    /// Returns `true` if results can be posted to a channel.
    pub fn posts_to_channel(&self) -> bool {
        self.oauth_token.is_some()
    }
}

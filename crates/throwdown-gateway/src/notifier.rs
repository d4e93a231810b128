//! Outbound delivery to Slack over HTTP.

use std::time::Duration;

use throwdown_match::{Destination, Notice, Notifier, NotifyError};
use tracing::debug;

use crate::render;
use crate::slack::{ApiResponse, PostMessage};
use crate::{GatewayConfig, GatewayError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts notices to reply webhooks and, with a bot token, to channels.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: reqwest::Client,
    oauth_token: Option<String>,
    api_base: String,
}

impl SlackNotifier {
    /// Creates a notifier using the token and API base from `config`.
    ///
    /// # Errors
    /// [`GatewayError::Client`] if the HTTP client cannot be initialised.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            oauth_token: config.oauth_token.clone(),
            api_base: config.api_base.trim_end_matches('/').to_owned(),
        })
    }

    async fn post_response_url(&self, url: &str, notice: &Notice) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(url)
            .json(&render::notice(notice))
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }
        Ok(())
    }

    async fn post_channel(&self, channel: &str, notice: &Notice) -> Result<(), NotifyError> {
        let token = self
            .oauth_token
            .as_deref()
            .ok_or_else(|| NotifyError::Unavailable("no Slack OAuth token configured".into()))?;

        let message = render::notice(notice);
        let body = PostMessage {
            channel: channel.to_owned(),
            text: message.text,
            attachments: message.attachments,
        };

        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.api_base))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        let reply: ApiResponse = response
            .json()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        if !reply.ok {
            let reason = reply.error.unwrap_or_else(|| "unknown error".into());
            return Err(NotifyError::Unavailable(format!("chat.postMessage: {reason}")));
        }
        Ok(())
    }
}

impl Notifier for SlackNotifier {
    async fn notify(&self, destination: &Destination, notice: &Notice) -> Result<(), NotifyError> {
        debug!(session_id = %notice.session_id(), ?destination, "sending notice");
        match destination {
            Destination::ResponseUrl(url) => self.post_response_url(url, notice).await,
            Destination::Channel(channel) => self.post_channel(channel, notice).await,
        }
    }
}

//! Slack wire types.
//!
//! Inbound, Slack posts `application/x-www-form-urlencoded` bodies: slash
//! commands as flat fields, button clicks as a single `payload` field
//! holding JSON. Outbound, every reply is a [`SlackMessage`].

use serde::{Deserialize, Serialize};
use throwdown_session::SessionId;

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Any form Slack posts to the callback route.
///
/// When `payload` is present the form is a button click and the other
/// fields are empty; otherwise it is a slash command.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CallbackForm {
    pub payload: Option<String>,
    pub token: String,
    pub team_id: String,
    pub team_domain: String,
    pub channel_id: String,
    pub channel_name: String,
    pub user_id: String,
    pub user_name: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    pub trigger_id: String,
}

/// The JSON inside a button click's `payload` field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InteractionPayload {
    pub actions: Vec<PayloadAction>,
    pub callback_id: String,
    pub user: SlackUser,
    pub channel: SlackChannel,
    pub response_url: String,
}

/// One clicked button.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PayloadAction {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SlackUser {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SlackChannel {
    pub id: String,
    pub name: String,
}

/// The `value` carried by a move button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveChoice {
    pub session_id: SessionId,
    #[serde(rename = "move")]
    pub move_name: String,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Who sees a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Everyone in the channel.
    InChannel,
    /// Only the user who triggered the request.
    Ephemeral,
}

/// A message as Slack expects it in a reply or a `response_url` post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackMessage {
    pub response_type: ResponseType,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// A legacy message attachment with interactive buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub text: String,
    pub fallback: String,
    pub callback_id: String,
    pub color: String,
    pub attachment_type: String,
    pub actions: Vec<AttachmentAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentAction {
    pub name: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// Body of a `chat.postMessage` call.
#[derive(Debug, Clone, Serialize)]
pub struct PostMessage {
    pub channel: String,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// The envelope every Slack Web API call answers with.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiResponse {
    pub ok: bool,
    pub error: Option<String>,
}

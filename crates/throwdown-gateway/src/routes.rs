//! The callback route.
//!
//! Slack expects an answer within a few seconds, so every branch replies
//! with a [`SlackMessage`] and never an HTTP error. Problems with the
//! request, including a body that is not a form, become ephemeral text the
//! caller can read.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::routing::post;
use axum::{Json, Router};
use throwdown_match::{IdentityResolver, MatchEngine, MoveReceipt, Notifier};
use throwdown_session::{ChannelProfile, Metadata, SessionId};
use tracing::{debug, info};

use crate::slack::{CallbackForm, InteractionPayload, MoveChoice, SlackMessage};
use crate::{render, GatewayConfig, GatewayError};

const CHALLENGE: &str = "challenge";
const ACCEPT: &str = "accept";

/// Shared state handed to the route.
pub struct GatewayState<R, N> {
    pub engine: Arc<MatchEngine<R, N>>,
    pub config: Arc<GatewayConfig>,
}

// Manual impl: derive would demand `R: Clone, N: Clone`.
impl<R, N> Clone for GatewayState<R, N> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            config: Arc::clone(&self.config),
        }
    }
}

/// Builds the router serving `POST {config.route}`.
pub fn router<R: IdentityResolver, N: Notifier>(
    engine: Arc<MatchEngine<R, N>>,
    config: GatewayConfig,
) -> Router {
    let route = config.route.clone();
    let state = GatewayState {
        engine,
        config: Arc::new(config),
    };
    Router::new()
        .route(&route, post(handle_callback::<R, N>))
        .with_state(state)
}

async fn handle_callback<R: IdentityResolver, N: Notifier>(
    State(state): State<GatewayState<R, N>>,
    form: Result<Form<CallbackForm>, FormRejection>,
) -> Json<SlackMessage> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!(error = %rejection, "callback body rejected");
            return Json(render::error(&"This request could not be read."));
        }
    };
    if state.config.debug {
        info!(?form, "inbound callback");
    }

    let reply = match form.payload.as_deref() {
        Some(payload) => handle_interaction(&state, payload).await,
        None => handle_command(&state, &form).await,
    };
    Json(reply)
}

// ---------------------------------------------------------------------------
// Slash commands
// ---------------------------------------------------------------------------

async fn handle_command<R: IdentityResolver, N: Notifier>(
    state: &GatewayState<R, N>,
    form: &CallbackForm,
) -> SlackMessage {
    let mut tokens = form.text.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(CHALLENGE), Some(raw_target)) => challenge(state, form, raw_target).await,
        (Some(ACCEPT), Some(id)) => accept(state, form, SessionId::from(id)).await,
        _ => {
            debug!(user = %form.user_name, text = %form.text, "unrecognised command");
            render::usage(&state.config.command_name)
        }
    }
}

async fn challenge<R: IdentityResolver, N: Notifier>(
    state: &GatewayState<R, N>,
    form: &CallbackForm,
    raw_target: &str,
) -> SlackMessage {
    let engine = &state.engine;

    // Resolved up front so the channel profile can carry the target's name.
    let target = match engine.resolver().resolve_target(raw_target).await {
        Ok(target) => target,
        Err(e) => return render::error(&e),
    };

    let mut metadata = reply_metadata(&form.response_url, Metadata::challenger_reply);
    if state.config.posts_to_channel() && !form.channel_name.is_empty() {
        metadata.channel = Some(ChannelProfile {
            channel: form.channel_name.clone(),
            challenger_name: form.user_name.clone(),
            target_name: target.clone(),
        });
    }

    match engine.challenge(&form.user_name, &target, metadata).await {
        Ok(id) => render::challenge_issued(&state.config.command_name, &form.user_name, &target, &id),
        Err(e) => render::error(&e),
    }
}

async fn accept<R: IdentityResolver, N: Notifier>(
    state: &GatewayState<R, N>,
    form: &CallbackForm,
    id: SessionId,
) -> SlackMessage {
    let engine = &state.engine;
    let metadata = reply_metadata(&form.response_url, Metadata::target_reply);

    match engine.accept(&id, metadata).await {
        Ok(delivery) => {
            if !delivery.is_clean() {
                info!(session_id = %id, failed = delivery.failed, "challenger was not prompted");
            }
            render::move_prompt(&id, &engine.catalog().move_names())
        }
        Err(e) => render::error(&e),
    }
}

fn reply_metadata(response_url: &str, build: impl FnOnce(String) -> Metadata) -> Metadata {
    if response_url.is_empty() {
        Metadata::default()
    } else {
        build(response_url.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Button clicks
// ---------------------------------------------------------------------------

async fn handle_interaction<R: IdentityResolver, N: Notifier>(
    state: &GatewayState<R, N>,
    raw: &str,
) -> SlackMessage {
    let (participant, choice) = match decode_interaction(raw) {
        Ok(Some(decoded)) => decoded,
        Ok(None) => return render::error(&"No action was submitted"),
        Err(e) => {
            debug!(error = %e, "interaction rejected");
            return render::error(&"Your move could not be read, please try again.");
        }
    };

    match state
        .engine
        .submit_move(&choice.session_id, &participant, &choice.move_name)
        .await
    {
        Ok(MoveReceipt::Pending | MoveReceipt::Resolved { .. }) => render::move_locked(),
        Ok(MoveReceipt::AlreadyResolved(resolution)) => render::already_resolved(&resolution),
        Err(e) => render::error(&e),
    }
}

/// The clicking user and their choice; `None` when no button was clicked.
fn decode_interaction(raw: &str) -> Result<Option<(String, MoveChoice)>, GatewayError> {
    let payload: InteractionPayload = serde_json::from_str(raw)?;
    let Some(action) = payload.actions.first() else {
        return Ok(None);
    };
    let choice: MoveChoice = serde_json::from_str(&action.value)?;
    Ok(Some((payload.user.name, choice)))
}

//! Drives the callback route with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use throwdown_gateway::slack::{MoveChoice, ResponseType, SlackMessage};
use throwdown_gateway::{router, GatewayConfig, MentionResolver};
use throwdown_match::{Destination, MatchEngine, Notice, Notifier, NotifyError};
use throwdown_rules::MoveCatalog;
use throwdown_session::{SessionId, SessionStatus, SessionStore};
use tokio::sync::Mutex;
use tower::ServiceExt;

// =========================================================================
// Fixtures
// =========================================================================

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(Destination, Notice)>>,
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, destination: &Destination, notice: &Notice) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .await
            .push((destination.clone(), notice.clone()));
        Ok(())
    }
}

type Engine = MatchEngine<MentionResolver, RecordingNotifier>;

fn setup(config: GatewayConfig) -> (Arc<Engine>, Router) {
    let engine = Arc::new(MatchEngine::new(
        Arc::new(SessionStore::new()),
        MoveCatalog::standard(),
        MentionResolver,
        RecordingNotifier::default(),
    ));
    let app = router(Arc::clone(&engine), config);
    (engine, app)
}

fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

fn form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

async fn post(app: &Router, body: String) -> SlackMessage {
    let request = Request::builder()
        .method("POST")
        .uri("/slack/rps")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn command(app: &Router, user: &str, text: &str, response_url: &str) -> SlackMessage {
    post(
        app,
        form(&[
            ("command", "/rps"),
            ("user_name", user),
            ("text", text),
            ("response_url", response_url),
            ("channel_name", "games"),
        ]),
    )
    .await
}

async fn click(app: &Router, user: &str, session_id: &SessionId, mv: &str) -> SlackMessage {
    let value = serde_json::to_string(&MoveChoice {
        session_id: session_id.clone(),
        move_name: mv.to_owned(),
    })
    .unwrap();
    let payload = serde_json::json!({
        "actions": [{"name": "move", "type": "button", "value": value}],
        "callback_id": "player_move_selection",
        "user": {"id": "U0", "name": user},
    });
    post(app, form(&[("payload", payload.to_string().as_str())])).await
}

/// Pulls the session id out of the challenge invitation.
fn session_id_from(invitation: &SlackMessage) -> SessionId {
    let id = invitation
        .text
        .split("accept ")
        .nth(1)
        .and_then(|rest| rest.split('`').next())
        .expect("invitation names the accept command");
    SessionId::from(id)
}

// =========================================================================
// Slash commands
// =========================================================================

#[tokio::test]
async fn test_challenge_replies_in_channel_with_accept_command() {
    let (engine, app) = setup(GatewayConfig::default());

    let reply = command(&app, "alice", "challenge <@U2|bob>", "https://hooks/alice").await;

    assert_eq!(reply.response_type, ResponseType::InChannel);
    let id = session_id_from(&reply);
    assert_eq!(
        reply.text,
        format!(
            "bob, @alice has challenged you to a game of rock, paper, scissors. \
             Please use `/rps accept {id}` to accept."
        )
    );
    let session = engine.get_session(&id).await.unwrap();
    assert_eq!(session.target, "bob");
    assert_eq!(session.status, SessionStatus::Initiated);
    assert!(session.metadata.channel.is_none(), "no token, no channel");
}

#[tokio::test]
async fn test_challenge_with_token_attaches_channel_profile() {
    let config = GatewayConfig {
        oauth_token: Some("xoxb-test".into()),
        ..GatewayConfig::default()
    };
    let (engine, app) = setup(config);

    let reply = command(&app, "alice", "challenge @bob", "https://hooks/alice").await;

    let session = engine.get_session(&session_id_from(&reply)).await.unwrap();
    let channel = session.metadata.channel.expect("channel profile");
    assert_eq!(channel.channel, "games");
    assert_eq!(channel.target_name, "bob");
}

#[tokio::test]
async fn test_challenge_malformed_mention_is_ephemeral_error() {
    let (engine, app) = setup(GatewayConfig::default());

    let reply = command(&app, "alice", "challenge <@>", "https://hooks/alice").await;

    assert_eq!(reply.response_type, ResponseType::Ephemeral);
    assert_eq!(reply.text, "Could not find anyone to challenge in \"<@>\".");
    assert!(engine.store().is_empty().await);
}

#[tokio::test]
async fn test_accept_returns_move_buttons_and_prompts_challenger() {
    let (engine, app) = setup(GatewayConfig::default());
    let invitation = command(&app, "alice", "challenge @bob", "https://hooks/alice").await;
    let id = session_id_from(&invitation);

    let reply = command(&app, "bob", &format!("accept {id}"), "https://hooks/bob").await;

    assert_eq!(reply.response_type, ResponseType::Ephemeral);
    assert_eq!(reply.text, "RPS initiated");
    let buttons: Vec<&str> = reply.attachments[0]
        .actions
        .iter()
        .map(|a| a.text.as_str())
        .collect();
    assert_eq!(buttons, ["Rock", "Paper", "Scissors"]);

    let sent = engine.notifier().sent.lock().await.clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, Destination::ResponseUrl("https://hooks/alice".into()));
    assert!(matches!(sent[0].1, Notice::Accepted { .. }));
}

#[tokio::test]
async fn test_accept_twice_replies_already_accepted() {
    let (_engine, app) = setup(GatewayConfig::default());
    let invitation = command(&app, "alice", "challenge @bob", "https://hooks/alice").await;
    let id = session_id_from(&invitation);
    command(&app, "bob", &format!("accept {id}"), "https://hooks/bob").await;

    let reply = command(&app, "bob", &format!("accept {id}"), "https://hooks/bob").await;

    assert_eq!(
        reply.text,
        "The provided game session id has already been accepted."
    );
}

#[tokio::test]
async fn test_accept_unknown_id_replies_not_valid() {
    let (_engine, app) = setup(GatewayConfig::default());

    let reply = command(&app, "bob", "accept deadbeef", "https://hooks/bob").await;

    assert_eq!(reply.response_type, ResponseType::Ephemeral);
    assert!(reply.text.starts_with("The provided game session id is not valid."));
}

#[tokio::test]
async fn test_unknown_command_replies_usage() {
    let config = GatewayConfig {
        command_name: "throw".into(),
        ..GatewayConfig::default()
    };
    let (_engine, app) = setup(config);

    for text in ["", "challenge", "dance @bob"] {
        let reply = command(&app, "alice", text, "https://hooks/alice").await;
        assert_eq!(reply.response_type, ResponseType::Ephemeral);
        assert!(reply.text.starts_with("Usage: `/throw challenge"), "{text:?}");
    }
}

// =========================================================================
// Button clicks
// =========================================================================

#[tokio::test]
async fn test_full_game_over_http_announces_winner() {
    let (engine, app) = setup(GatewayConfig::default());
    let invitation = command(&app, "alice", "challenge @bob", "https://hooks/alice").await;
    let id = session_id_from(&invitation);
    command(&app, "bob", &format!("accept {id}"), "https://hooks/bob").await;

    let first = click(&app, "alice", &id, "rock").await;
    let second = click(&app, "bob", &id, "scissors").await;

    assert_eq!(first.text, "Your move has been locked in");
    assert_eq!(second.text, "Your move has been locked in");
    assert_eq!(
        engine.get_session(&id).await.unwrap().status,
        SessionStatus::Resolved
    );

    let sent = engine.notifier().sent.lock().await.clone();
    let results: Vec<String> = sent
        .iter()
        .filter_map(|(_, notice)| match notice {
            Notice::Resolved(r) => Some(r.summary()),
            Notice::Accepted { .. } => None,
        })
        .collect();
    assert_eq!(
        results,
        vec!["@alice defeated @bob, rock beats scissors"; 2],
        "both reply urls"
    );
}

#[tokio::test]
async fn test_click_after_resolution_repeats_result() {
    let (_engine, app) = setup(GatewayConfig::default());
    let invitation = command(&app, "alice", "challenge @bob", "https://hooks/alice").await;
    let id = session_id_from(&invitation);
    command(&app, "bob", &format!("accept {id}"), "https://hooks/bob").await;
    click(&app, "alice", &id, "paper").await;
    click(&app, "bob", &id, "paper").await;

    let late = click(&app, "bob", &id, "rock").await;

    assert_eq!(
        late.text,
        "This game is already over. @alice and @bob had a draw. Both played paper"
    );
}

#[tokio::test]
async fn test_click_by_stranger_is_rejected() {
    let (engine, app) = setup(GatewayConfig::default());
    let invitation = command(&app, "alice", "challenge @bob", "https://hooks/alice").await;
    let id = session_id_from(&invitation);
    command(&app, "bob", &format!("accept {id}"), "https://hooks/bob").await;

    let reply = click(&app, "mallory", &id, "rock").await;

    assert_eq!(
        reply.text,
        "Only the two players in this game session can submit a move."
    );
    assert!(engine.get_session(&id).await.unwrap().challenger_move.is_none());
}

#[tokio::test]
async fn test_click_with_unknown_move_is_rejected() {
    let (_engine, app) = setup(GatewayConfig::default());
    let invitation = command(&app, "alice", "challenge @bob", "https://hooks/alice").await;
    let id = session_id_from(&invitation);
    command(&app, "bob", &format!("accept {id}"), "https://hooks/bob").await;

    let reply = click(&app, "alice", &id, "lizard").await;

    assert_eq!(reply.text, "\"lizard\" is not a valid move.");
}

#[tokio::test]
async fn test_payload_without_actions_and_garbage_payload() {
    let (_engine, app) = setup(GatewayConfig::default());

    let empty = post(&app, form(&[("payload", r#"{"actions": []}"#)])).await;
    assert_eq!(empty.text, "No action was submitted");

    let garbage = post(&app, form(&[("payload", "not json")])).await;
    assert_eq!(garbage.response_type, ResponseType::Ephemeral);
    assert_eq!(garbage.text, "Your move could not be read, please try again.");
}

#[tokio::test]
async fn test_non_form_body_still_gets_ephemeral_reply() {
    let (engine, app) = setup(GatewayConfig::default());
    let request = Request::builder()
        .method("POST")
        .uri("/slack/rps")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"text": "challenge @bob"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let reply: SlackMessage = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(reply.response_type, ResponseType::Ephemeral);
    assert_eq!(reply.text, "This request could not be read.");
    assert!(engine.store().is_empty().await);
}

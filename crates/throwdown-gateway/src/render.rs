//! Builds the Slack messages the gateway sends.

use std::fmt;

use throwdown_match::{Notice, Resolution};
use throwdown_session::SessionId;

use crate::slack::{Attachment, AttachmentAction, MoveChoice, ResponseType, SlackMessage};

const MOVE_CALLBACK_ID: &str = "player_move_selection";
const MOVE_COLOR: &str = "#3AA3E3";

fn message(response_type: ResponseType, text: impl Into<String>) -> SlackMessage {
    SlackMessage {
        response_type,
        text: text.into(),
        attachments: Vec::new(),
    }
}

/// Public invitation posted when a challenge is issued.
pub fn challenge_issued(
    command_name: &str,
    challenger: &str,
    target: &str,
    session_id: &SessionId,
) -> SlackMessage {
    message(
        ResponseType::InChannel,
        format!(
            "{target}, @{challenger} has challenged you to a game of rock, paper, scissors. \
             Please use `/{command_name} accept {session_id}` to accept."
        ),
    )
}

/// Private prompt with one button per move, in display order.
pub fn move_prompt(session_id: &SessionId, moves: &[String]) -> SlackMessage {
    let actions = moves
        .iter()
        .map(|name| AttachmentAction {
            name: "move".to_owned(),
            text: capitalize(name),
            kind: "button".to_owned(),
            value: move_value(session_id, name),
        })
        .collect();

    SlackMessage {
        attachments: vec![Attachment {
            text: "Please select your move".to_owned(),
            fallback: "You are unable to choose a move".to_owned(),
            callback_id: MOVE_CALLBACK_ID.to_owned(),
            color: MOVE_COLOR.to_owned(),
            attachment_type: "default".to_owned(),
            actions,
        }],
        ..message(ResponseType::Ephemeral, "RPS initiated")
    }
}

/// Reply to a move that was stored.
pub fn move_locked() -> SlackMessage {
    message(ResponseType::Ephemeral, "Your move has been locked in")
}

/// Reply to a move sent after the match was settled.
pub fn already_resolved(resolution: &Resolution) -> SlackMessage {
    message(
        ResponseType::Ephemeral,
        format!("This game is already over. {}", resolution.summary()),
    )
}

/// Public result announcement.
pub fn resolution(resolution: &Resolution) -> SlackMessage {
    message(ResponseType::InChannel, resolution.summary())
}

/// Private error reply.
pub fn error(err: &impl fmt::Display) -> SlackMessage {
    message(ResponseType::Ephemeral, err.to_string())
}

/// Private help text for unrecognised commands.
pub fn usage(command_name: &str) -> SlackMessage {
    message(
        ResponseType::Ephemeral,
        format!(
            "Usage: `/{command_name} challenge @someone` to start a game, \
             `/{command_name} accept <game id>` to accept one."
        ),
    )
}

/// The message a notice turns into.
pub fn notice(notice: &Notice) -> SlackMessage {
    match notice {
        Notice::Accepted {
            session_id, moves, ..
        } => move_prompt(session_id, moves),
        Notice::Resolved(r) => resolution(r),
    }
}

fn move_value(session_id: &SessionId, name: &str) -> String {
    let choice = MoveChoice {
        session_id: session_id.clone(),
        move_name: name.to_lowercase(),
    };
    serde_json::to_value(&choice)
        .map(|v| v.to_string())
        .unwrap_or_default()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! Collaborator-supplied data carried by a session.
//!
//! The engine never interprets these values beyond asking which profiles
//! are present; they exist so the gateway can find its way back to the
//! players (reply webhooks, a chat channel) when a match moves on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which kind of delivery profile a session carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileKind {
    /// Per-participant reply webhooks ([`ReplyProfile`]).
    Reply,
    /// A shared chat channel ([`ChannelProfile`]).
    Channel,
}

/// Per-participant webhook addresses.
///
/// The challenger's address is known when the challenge is issued; the
/// target's only once they accept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyProfile {
    pub challenger_url: Option<String>,
    pub target_url: Option<String>,
}

/// A channel to post public results to, with display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelProfile {
    pub channel: String,
    pub challenger_name: String,
    pub target_name: String,
}

/// Everything a collaborator attached to a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub reply: Option<ReplyProfile>,
    pub channel: Option<ChannelProfile>,
    /// Opaque key/value pairs, stored and returned verbatim.
    pub extra: BTreeMap<String, String>,
}

impl Metadata {
    /// Metadata with only the challenger's reply address set.
    pub fn challenger_reply(url: impl Into<String>) -> Self {
        Self {
            reply: Some(ReplyProfile {
                challenger_url: Some(url.into()),
                target_url: None,
            }),
            ..Self::default()
        }
    }

    /// Metadata with only the target's reply address set.
    pub fn target_reply(url: impl Into<String>) -> Self {
        Self {
            reply: Some(ReplyProfile {
                challenger_url: None,
                target_url: Some(url.into()),
            }),
            ..Self::default()
        }
    }

    /// Returns `true` if the given profile is attached.
    pub fn has_profile(&self, kind: ProfileKind) -> bool {
        match kind {
            ProfileKind::Reply => self.reply.is_some(),
            ProfileKind::Channel => self.channel.is_some(),
        }
    }

    /// Folds `other` into `self`.
    ///
    /// Fields set in `other` win; fields it leaves empty keep their
    /// current value. `extra` entries are added or overwritten.
    pub fn merge(&mut self, other: Metadata) {
        if let Some(incoming) = other.reply {
            let reply = self.reply.get_or_insert_with(ReplyProfile::default);
            if incoming.challenger_url.is_some() {
                reply.challenger_url = incoming.challenger_url;
            }
            if incoming.target_url.is_some() {
                reply.target_url = incoming.target_url;
            }
        }
        if other.channel.is_some() {
            self.channel = other.channel;
        }
        self.extra.extend(other.extra);
    }
}

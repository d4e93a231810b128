//! The match engine: every rule of a match in one place.
//!
//! All reads and writes go through [`SessionStore::update`], so each check
//! and the change it guards happen in one critical section. Notifications
//! are sent afterwards, with the lock released.

use std::sync::Arc;

use throwdown_rules::MoveCatalog;
use throwdown_session::{Metadata, Session, SessionId, SessionStatus, SessionStore};
use tracing::{debug, info, warn};

use crate::{
    Delivery, Destination, IdentityResolver, MatchConfig, MatchError, Notice, Notifier, Resolution,
};

/// What happened to a submitted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveReceipt {
    /// Recorded; the other player has not moved yet.
    Pending,
    /// This move completed the pair and settled the match.
    Resolved {
        resolution: Resolution,
        delivery: Delivery,
    },
    /// The match was already settled. Nothing changed and nobody was
    /// notified; the original result is returned.
    AlreadyResolved(Resolution),
}

/// Result of the store-side half of a move submission.
enum Step {
    Pending,
    Completed(Resolution, Metadata),
    Late(Resolution),
}

/// Drives matches from challenge to resolution.
///
/// Cheap to share: wrap it in an `Arc` and hand it to every request
/// handler. The store is shared with the sweeper.
pub struct MatchEngine<R, N> {
    store: Arc<SessionStore>,
    catalog: Arc<MoveCatalog>,
    config: MatchConfig,
    resolver: R,
    notifier: N,
}

impl<R: IdentityResolver, N: Notifier> MatchEngine<R, N> {
    /// Creates an engine with the default [`MatchConfig`].
    pub fn new(store: Arc<SessionStore>, catalog: MoveCatalog, resolver: R, notifier: N) -> Self {
        Self {
            store,
            catalog: Arc::new(catalog),
            config: MatchConfig::default(),
            resolver,
            notifier,
        }
    }

    /// Replaces the match configuration.
    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &MoveCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Opens a match: `challenger` against whoever `raw_target` names.
    ///
    /// Nobody is notified; the caller replies to the challenge itself.
    ///
    /// # Errors
    /// - [`MatchError::UnresolvableTarget`]: the resolver found nobody
    /// - [`MatchError::SelfChallenge`]: the target is the challenger
    /// - [`MatchError::Store`]: no id could be allocated
    pub async fn challenge(
        &self,
        challenger: &str,
        raw_target: &str,
        metadata: Metadata,
    ) -> Result<SessionId, MatchError> {
        let target = self
            .resolver
            .resolve_target(raw_target)
            .await
            .inspect_err(|e| debug!(challenger, raw_target, error = %e, "challenge rejected"))?;

        if target == challenger {
            debug!(challenger, "self-challenge rejected");
            return Err(MatchError::SelfChallenge);
        }

        let id = self.store.create(challenger, target.as_str(), metadata).await?;
        info!(session_id = %id, challenger, target = %target, "challenge issued");
        Ok(id)
    }

    /// Accepts the challenge and prompts the challenger for a move.
    ///
    /// `metadata` (typically the target's reply address) is merged into the
    /// session in the same update that flips the status.
    ///
    /// # Errors
    /// - [`MatchError::UnknownSession`]: no such session
    /// - [`MatchError::AlreadyAccepted`]: status is not `Initiated`
    pub async fn accept(&self, id: &SessionId, metadata: Metadata) -> Result<Delivery, MatchError> {
        let session = self
            .store
            .update(id, |s| {
                if !s.status.can_transition_to(SessionStatus::Accepted) {
                    return Err(MatchError::AlreadyAccepted(s.id.clone()));
                }
                s.status = SessionStatus::Accepted;
                s.metadata.merge(metadata);
                Ok(s.clone())
            })
            .await
            .inspect_err(|e| debug!(session_id = %id, error = %e, "accept rejected"))?;

        info!(
            session_id = %id,
            challenger = %session.challenger,
            target = %session.target,
            "challenge accepted"
        );

        let notice = Notice::Accepted {
            session_id: session.id.clone(),
            challenger: session.challenger.clone(),
            target: session.target.clone(),
            moves: self.catalog.move_names(),
        };
        let destinations: Vec<Destination> = session
            .metadata
            .reply
            .as_ref()
            .and_then(|reply| reply.challenger_url.clone())
            .map(Destination::ResponseUrl)
            .into_iter()
            .collect();

        Ok(self.deliver(&destinations, &notice).await)
    }

    /// Records `participant`'s move and settles the match once both are in.
    ///
    /// A player may change their move until the other side has moved.
    /// Exactly one caller per session gets [`MoveReceipt::Resolved`]; any
    /// later submission gets [`MoveReceipt::AlreadyResolved`].
    ///
    /// # Errors
    /// - [`MatchError::InvalidMove`]: not in the catalog (checked first)
    /// - [`MatchError::UnknownSession`]: no such session
    /// - [`MatchError::UnauthorizedParticipant`]: not one of the two players
    /// - [`MatchError::NotAccepted`]: accept is required and still pending
    pub async fn submit_move(
        &self,
        id: &SessionId,
        participant: &str,
        move_name: &str,
    ) -> Result<MoveReceipt, MatchError> {
        if !self.catalog.contains(move_name) {
            debug!(session_id = %id, participant, move_name, "unknown move rejected");
            return Err(MatchError::InvalidMove(move_name.to_owned()));
        }

        let catalog = &self.catalog;
        let require_accept = self.config.require_accept;
        let step = self
            .store
            .update(id, |s| {
                let role = s
                    .role_of(participant)
                    .ok_or_else(|| MatchError::UnauthorizedParticipant {
                        session_id: s.id.clone(),
                        participant: participant.to_owned(),
                    })?;

                match s.status {
                    SessionStatus::Initiated if require_accept => {
                        return Err(MatchError::NotAccepted(s.id.clone()));
                    }
                    status if !status.can_transition_to(SessionStatus::Resolved) => {
                        return Resolution::of(s, catalog)
                            .map(Step::Late)
                            .ok_or_else(|| MatchError::UnknownSession(s.id.clone()));
                    }
                    _ => {}
                }

                s.set_move(role, move_name);
                match Resolution::of(s, catalog) {
                    Some(resolution) => {
                        s.status = SessionStatus::Resolved;
                        Ok(Step::Completed(resolution, s.metadata.clone()))
                    }
                    None => Ok(Step::Pending),
                }
            })
            .await
            .inspect_err(|e| debug!(session_id = %id, participant, error = %e, "move rejected"))?;

        match step {
            Step::Pending => {
                debug!(session_id = %id, participant, "move locked in");
                Ok(MoveReceipt::Pending)
            }
            Step::Late(resolution) => {
                debug!(session_id = %id, participant, "move after resolution ignored");
                Ok(MoveReceipt::AlreadyResolved(resolution))
            }
            Step::Completed(resolution, metadata) => {
                info!(
                    session_id = %id,
                    outcome = %resolution.outcome,
                    winner = resolution.winner().unwrap_or("none"),
                    challenger_move = %resolution.challenger_move,
                    target_move = %resolution.target_move,
                    "match resolved"
                );
                let delivery = self.announce(&resolution, &metadata).await;
                Ok(MoveReceipt::Resolved {
                    resolution,
                    delivery,
                })
            }
        }
    }

    /// Snapshot of a session, for diagnostics and tests.
    pub async fn get_session(&self, id: &SessionId) -> Option<Session> {
        self.store.get(id).await
    }

    // -----------------------------------------------------------------------
    // Notification
    // -----------------------------------------------------------------------

    /// Sends the result to the channel if there is one, else to both
    /// players' reply addresses.
    ///
    /// Channel posts name the players by the profile's display names.
    async fn announce(&self, resolution: &Resolution, metadata: &Metadata) -> Delivery {
        if let Some(channel) = &metadata.channel {
            let named = Resolution {
                challenger: display_name(&channel.challenger_name, &resolution.challenger),
                target: display_name(&channel.target_name, &resolution.target),
                ..resolution.clone()
            };
            let destination = Destination::Channel(channel.channel.clone());
            return self.deliver(&[destination], &Notice::Resolved(named)).await;
        }

        let destinations: Vec<Destination> = metadata
            .reply
            .iter()
            .flat_map(|reply| [&reply.challenger_url, &reply.target_url])
            .flatten()
            .cloned()
            .map(Destination::ResponseUrl)
            .collect();

        self.deliver(&destinations, &Notice::Resolved(resolution.clone()))
            .await
    }

    async fn deliver(&self, destinations: &[Destination], notice: &Notice) -> Delivery {
        if destinations.is_empty() {
            debug!(session_id = %notice.session_id(), "no destination for notice");
        }

        let mut delivery = Delivery::default();
        for destination in destinations {
            delivery.attempted += 1;
            if let Err(e) = self.notifier.notify(destination, notice).await {
                delivery.failed += 1;
                warn!(
                    session_id = %notice.session_id(),
                    ?destination,
                    error = %e,
                    "notice not delivered"
                );
            }
        }
        delivery
    }
}

fn display_name(profile_name: &str, identity: &str) -> String {
    if profile_name.is_empty() {
        identity.to_owned()
    } else {
        profile_name.to_owned()
    }
}

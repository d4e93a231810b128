//! The settled result of a match.

use serde::{Deserialize, Serialize};
use throwdown_rules::{MoveCatalog, Outcome};
use throwdown_session::{Session, SessionId};

/// Who played what and who won.
///
/// `outcome` is from the challenger's point of view: `FirstWins` means the
/// challenger won.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub session_id: SessionId,
    pub outcome: Outcome,
    pub challenger: String,
    pub target: String,
    pub challenger_move: String,
    pub target_move: String,
}

impl Resolution {
    /// Resolves a session holding both moves. `None` while a move is missing.
    pub fn of(session: &Session, catalog: &MoveCatalog) -> Option<Self> {
        let (challenger_move, target_move) = session.moves()?;
        Some(Self {
            session_id: session.id.clone(),
            outcome: catalog.resolve(challenger_move, target_move),
            challenger: session.challenger.clone(),
            target: session.target.clone(),
            challenger_move: challenger_move.to_owned(),
            target_move: target_move.to_owned(),
        })
    }

    /// The winner's identity, or `None` for a draw.
    pub fn winner(&self) -> Option<&str> {
        self.podium().map(|(winner, ..)| winner)
    }

    /// `(winner, loser, winning move, losing move)` when one side won.
    fn podium(&self) -> Option<(&str, &str, &str, &str)> {
        match self.outcome {
            Outcome::FirstWins => Some((
                &self.challenger,
                &self.target,
                &self.challenger_move,
                &self.target_move,
            )),
            Outcome::SecondWins => Some((
                &self.target,
                &self.challenger,
                &self.target_move,
                &self.challenger_move,
            )),
            Outcome::Draw | Outcome::Invalid => None,
        }
    }

    /// One-line announcement, winner first.
    ///
    /// `"@alice defeated @bob, rock beats scissors"` or
    /// `"@alice and @bob had a draw. Both played paper"`.
    pub fn summary(&self) -> String {
        if let Some((winner, loser, winning, losing)) = self.podium() {
            return format!("@{winner} defeated @{loser}, {winning} beats {losing}");
        }
        match self.outcome {
            Outcome::Draw => format!(
                "@{} and @{} had a draw. Both played {}",
                self.challenger, self.target, self.challenger_move
            ),
            _ => format!(
                "@{} and @{} could not be scored ({} vs {})",
                self.challenger, self.target, self.challenger_move, self.target_move
            ),
        }
    }
}

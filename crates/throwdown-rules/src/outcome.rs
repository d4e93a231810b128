//! The result of resolving two moves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of [`MoveCatalog::resolve`](crate::MoveCatalog::resolve).
///
/// "First" and "second" refer to argument order, not to who moved first
/// in time. The match layer always passes the challenger's move first.
///
/// `Invalid` is an ordinary value rather than an error: move names come
/// from remote users, so an unknown name is an expected input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The first move defeats the second.
    FirstWins,
    /// The second move defeats the first.
    SecondWins,
    /// Both moves are the same.
    Draw,
    /// At least one move is not in the catalog.
    Invalid,
}

impl Outcome {
    /// The same result seen with the arguments swapped.
    pub fn flipped(self) -> Self {
        match self {
            Self::FirstWins => Self::SecondWins,
            Self::SecondWins => Self::FirstWins,
            other => other,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstWins => write!(f, "first wins"),
            Self::SecondWins => write!(f, "second wins"),
            Self::Draw => write!(f, "draw"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flipped_swaps_winners_only() {
        assert_eq!(Outcome::FirstWins.flipped(), Outcome::SecondWins);
        assert_eq!(Outcome::SecondWins.flipped(), Outcome::FirstWins);
        assert_eq!(Outcome::Draw.flipped(), Outcome::Draw);
        assert_eq!(Outcome::Invalid.flipped(), Outcome::Invalid);
    }

}

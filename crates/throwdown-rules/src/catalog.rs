//! Move catalogs: the legal moves of a game and who beats whom.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::{CatalogError, Outcome};

const ROCK: &str = "rock";
const PAPER: &str = "paper";
const SCISSORS: &str = "scissors";

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A named move and the set of moves it defeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Unique name within its catalog (e.g. `"rock"`).
    pub name: String,
    /// Names of the moves this one beats.
    pub defeats: BTreeSet<String>,
}

impl Move {
    /// Returns `true` if this move beats `other`.
    pub fn beats(&self, other: &str) -> bool {
        self.defeats.contains(other)
    }
}

// ---------------------------------------------------------------------------
// MoveCatalog
// ---------------------------------------------------------------------------

/// An immutable, validated set of moves.
///
/// Built once at startup through [`MoveCatalog::builder`] (or one of the
/// presets) and then shared read-only. Construction guarantees a complete
/// tournament, so [`resolve`](Self::resolve) is total over every pair of
/// known moves.
#[derive(Debug, Clone)]
pub struct MoveCatalog {
    moves: HashMap<String, Move>,
    /// Display order used when offering moves to players.
    order: Vec<String>,
}

impl MoveCatalog {
    /// Starts building a custom catalog.
    pub fn builder() -> MoveCatalogBuilder {
        MoveCatalogBuilder::default()
    }

    /// Classic rock, paper, scissors.
    pub fn standard() -> Self {
        Self::builder()
            .with_move(ROCK, [SCISSORS])
            .with_move(PAPER, [ROCK])
            .with_move(SCISSORS, [PAPER])
            .build()
            .expect("standard catalog is a complete tournament")
    }

    /// Looks up a built-in variant by name.
    ///
    /// Meant for one-time selection at startup; the result is then handed
    /// to whatever needs it.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "standard" => Some(Self::standard()),
            _ => None,
        }
    }

    /// Resolves `first` against `second`.
    ///
    /// Unknown names yield [`Outcome::Invalid`] regardless of the other
    /// argument.
    pub fn resolve(&self, first: &str, second: &str) -> Outcome {
        let Some(first_move) = self.moves.get(first) else {
            return Outcome::Invalid;
        };
        if !self.moves.contains_key(second) {
            return Outcome::Invalid;
        }

        if first == second {
            Outcome::Draw
        } else if first_move.beats(second) {
            Outcome::FirstWins
        } else {
            Outcome::SecondWins
        }
    }

    /// Returns `true` if `name` is a legal move.
    pub fn contains(&self, name: &str) -> bool {
        self.moves.contains_key(name)
    }

    /// Looks up a move by name.
    pub fn get(&self, name: &str) -> Option<&Move> {
        self.moves.get(name)
    }

    /// Iterates over the moves in display order.
    pub fn moves(&self) -> impl Iterator<Item = &Move> {
        self.order.iter().filter_map(|name| self.moves.get(name))
    }

    /// Move names in display order.
    pub fn move_names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always `false` for a built catalog; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for MoveCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects move definitions and validates them into a [`MoveCatalog`].
///
/// Moves are displayed in the order they were added.
#[derive(Debug, Default)]
pub struct MoveCatalogBuilder {
    moves: Vec<Move>,
}

impl MoveCatalogBuilder {
    /// Adds a move and the names of the moves it defeats.
    pub fn with_move<I, S>(mut self, name: impl Into<String>, defeats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.moves.push(Move {
            name: name.into(),
            defeats: defeats.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Validates the definitions and builds the catalog.
    ///
    /// # Errors
    /// Returns the first [`CatalogError`] found, checking in this order:
    /// empty catalog, duplicate names, self-defeat, unknown references,
    /// then every unordered pair for exactly one winning direction.
    pub fn build(self) -> Result<MoveCatalog, CatalogError> {
        if self.moves.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut moves = HashMap::with_capacity(self.moves.len());
        let mut order = Vec::with_capacity(self.moves.len());
        for mv in self.moves {
            if moves.contains_key(&mv.name) {
                return Err(CatalogError::DuplicateMove(mv.name));
            }
            if mv.beats(&mv.name) {
                return Err(CatalogError::SelfDefeat(mv.name));
            }
            order.push(mv.name.clone());
            moves.insert(mv.name.clone(), mv);
        }

        for name in &order {
            let mv = &moves[name];
            if let Some(unknown) = mv.defeats.iter().find(|d| !moves.contains_key(*d)) {
                return Err(CatalogError::UnknownMove {
                    referenced_by: name.clone(),
                    name: unknown.clone(),
                });
            }
        }

        for (i, a) in order.iter().enumerate() {
            for b in &order[i + 1..] {
                match (moves[a].beats(b), moves[b].beats(a)) {
                    (true, false) | (false, true) => {}
                    (true, true) => {
                        return Err(CatalogError::MutualDefeat(a.clone(), b.clone()));
                    }
                    (false, false) => {
                        return Err(CatalogError::MissingRelation(a.clone(), b.clone()));
                    }
                }
            }
        }

        Ok(MoveCatalog { moves, order })
    }
}

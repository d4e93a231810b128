//! Error types for catalog construction.

/// Reasons a set of moves does not form a playable catalog.
///
/// A catalog must be a complete tournament: every move is known, no move
/// beats itself, and for every pair of distinct moves exactly one of them
/// wins. Any violation is reported here when the catalog is built, so
/// resolution never has to deal with a half-defined relation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The catalog has no moves at all.
    #[error("catalog must define at least one move")]
    Empty,

    /// Two moves share the same name.
    #[error("move `{0}` is defined more than once")]
    DuplicateMove(String),

    /// A move lists itself in its own `defeats` set.
    #[error("move `{0}` cannot defeat itself")]
    SelfDefeat(String),

    /// A `defeats` set references a move the catalog doesn't define.
    #[error("move `{referenced_by}` defeats unknown move `{name}`")]
    UnknownMove {
        /// The move whose `defeats` set holds the bad reference.
        referenced_by: String,
        /// The undefined move name.
        name: String,
    },

    /// Both moves of a pair claim to defeat each other.
    #[error("moves `{0}` and `{1}` defeat each other")]
    MutualDefeat(String, String),

    /// Neither move of a pair defeats the other.
    #[error("no winner defined between `{0}` and `{1}`")]
    MissingRelation(String, String),
}

//! Game rules for Throwdown.
//!
//! This crate is the leaf of the workspace. It knows nothing about
//! sessions, players or networking; only about moves:
//!
//! - **Catalog** ([`MoveCatalog`], [`Move`]): the legal moves of a game
//!   variant and the "defeats" relation between them, validated once when
//!   the catalog is built.
//! - **Resolution** ([`MoveCatalog::resolve`], [`Outcome`]): a pure,
//!   total function from two move names to a result.
//! - **Errors** ([`CatalogError`]): what can be wrong with a catalog
//!   definition.
//!
//! ```text
//! Match layer (above)  ← validates submitted moves, resolves finished matches
//!     ↕
//! Rules layer (this crate)
//! ```

mod catalog;
mod error;
mod outcome;

pub use catalog::{Move, MoveCatalog, MoveCatalogBuilder};
pub use error::CatalogError;
pub use outcome::Outcome;

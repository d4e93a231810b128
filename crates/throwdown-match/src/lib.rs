//! Match state machine for Throwdown.
//!
//! A match moves through four steps, each driven by a message from one of
//! the two players:
//!
//! 1. **Challenge**: the challenger names a target ([`MatchEngine::challenge`])
//! 2. **Accept**: the target agrees to play ([`MatchEngine::accept`])
//! 3. **Move**: each side locks in a move ([`MatchEngine::submit_move`])
//! 4. **Resolve**: the second move settles the match and both sides hear
//!    about it
//!
//! The engine owns none of the outside world. Two collaborator traits plug
//! it into a messaging platform:
//!
//! - [`IdentityResolver`]: turns the raw target text into an identity
//! - [`Notifier`]: delivers [`Notice`]s to a [`Destination`]
//!
//! # How it fits in the stack
//!
//! ```text
//! Gateway (above)         ← decodes platform callbacks, renders replies
//!     ↕
//! Match Layer (this crate) ← enforces the rules of a match
//!     ↕
//! Session + Rules (below)  ← atomic storage, pure move resolution
//! ```

#![allow(async_fn_in_trait)]

mod config;
mod engine;
mod error;
mod identity;
mod notify;
mod resolution;

pub use config::MatchConfig;
pub use engine::{MatchEngine, MoveReceipt};
pub use error::{MatchError, NotifyError};
pub use identity::{IdentityResolver, VerbatimResolver};
pub use notify::{Delivery, Destination, Notice, Notifier};
pub use resolution::Resolution;

//! Match session storage for Throwdown.
//!
//! A "session" is one match between a challenger and a target, from the
//! challenge until it is resolved or swept away. This crate holds:
//!
//! 1. **Session types**: [`Session`], [`SessionId`], [`SessionStatus`]
//! 2. **Metadata**: typed per-collaborator profiles ([`Metadata`])
//! 3. **The store**: [`SessionStore`], the single owner of every record,
//!    safe to share between request handlers and the sweeper
//!
//! # How it fits in the stack
//!
//! ```text
//! Match layer / Sweeper (above)  ← mutate sessions only through the store
//!     ↕
//! Session Layer (this crate)     ← owns records, guarantees atomic updates
//! ```

mod error;
mod metadata;
mod session;
mod store;

pub use error::SessionError;
pub use metadata::{ChannelProfile, Metadata, ProfileKind, ReplyProfile};
pub use session::{Role, Session, SessionId, SessionStatus};
pub use store::SessionStore;

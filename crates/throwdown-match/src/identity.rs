//! Hook for turning a raw challenge target into a player identity.
//!
//! Chat platforms encode mentions in their own formats (`<@U123|bob>`,
//! `@bob`, ...). The engine only compares plain identity strings, so the
//! gateway supplies an [`IdentityResolver`] that knows the platform's
//! format. [`VerbatimResolver`] is the trivial one for plain names.

use crate::MatchError;

/// Normalises the target of a challenge.
///
/// Called once per challenge, before anything is stored. The returned
/// identity is what the target must present later to submit moves.
///
/// # Example
///
/// ```rust
/// use throwdown_match::{IdentityResolver, MatchError};
///
/// /// Accepts e-mail style handles and keeps the local part.
/// struct EmailResolver;
///
/// impl IdentityResolver for EmailResolver {
///     async fn resolve_target(&self, raw: &str) -> Result<String, MatchError> {
///         raw.split_once('@')
///             .map(|(local, _)| local.to_owned())
///             .filter(|local| !local.is_empty())
///             .ok_or_else(|| MatchError::UnresolvableTarget(raw.to_owned()))
///     }
/// }
/// ```
pub trait IdentityResolver: Send + Sync + 'static {
    /// Returns the identity `raw` refers to.
    ///
    /// # Errors
    /// [`MatchError::UnresolvableTarget`] when `raw` names nobody.
    fn resolve_target(
        &self,
        raw: &str,
    ) -> impl std::future::Future<Output = Result<String, MatchError>> + Send;
}

/// Takes the target as typed, minus surrounding whitespace and one leading
/// `@`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimResolver;

impl IdentityResolver for VerbatimResolver {
    async fn resolve_target(&self, raw: &str) -> Result<String, MatchError> {
        let trimmed = raw.trim();
        let name = trimmed.strip_prefix('@').unwrap_or(trimmed);
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(MatchError::UnresolvableTarget(raw.to_owned()));
        }
        Ok(name.to_owned())
    }
}

//! Turns Slack mention syntax into a plain identity.

use throwdown_match::{IdentityResolver, MatchError};

/// Resolves challenge targets written as Slack mentions.
///
/// | Input          | Identity |
/// |----------------|----------|
/// | `<@U123\|bob>` | `bob`    |
/// | `<@U123>`      | `U123`   |
/// | `@bob`         | `bob`    |
/// | `bob`          | `bob`    |
///
/// Plain names resolve to themselves, so resolving twice is harmless.
#[derive(Debug, Clone, Copy, Default)]
pub struct MentionResolver;

impl MentionResolver {
    /// The identity `raw` refers to, or `None` if it is empty or malformed.
    pub fn parse(raw: &str) -> Option<&str> {
        let raw = raw.trim();

        let name = if let Some(inner) = raw.strip_prefix("<@") {
            let inner = inner.strip_suffix('>')?;
            match inner.split_once('|') {
                Some((id, label)) if !id.is_empty() => label,
                Some(_) => return None,
                None => inner,
            }
        } else if raw.starts_with('<') || raw.ends_with('>') {
            return None;
        } else {
            raw.strip_prefix('@').unwrap_or(raw)
        };

        let valid = !name.is_empty()
            && !name
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '@' | '|'));
        valid.then_some(name)
    }
}

impl IdentityResolver for MentionResolver {
    async fn resolve_target(&self, raw: &str) -> Result<String, MatchError> {
        Self::parse(raw)
            .map(str::to_owned)
            .ok_or_else(|| MatchError::UnresolvableTarget(raw.to_owned()))
    }
}

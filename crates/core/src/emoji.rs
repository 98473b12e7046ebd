//! Custom emoji references.

use crate::error::{DomainError, DomainResult};
use crate::id::EmojiId;

/// A custom guild emoji the bot can react with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NinjaEmoji {
    pub id: EmojiId,
    pub name: String,
    pub animated: bool,
}

impl NinjaEmoji {
    pub fn new(id: EmojiId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            animated: false,
        }
    }

    /// Parse chat markup of the form `<:name:id>` or `<a:name:id>`.
    pub fn parse_mention(raw: &str) -> DomainResult<Self> {
        let invalid = || DomainError::validation(format!("not a custom emoji mention: {raw:?}"));

        let inner = raw
            .trim()
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .ok_or_else(invalid)?;

        let mut parts = inner.split(':');
        let animated = match parts.next() {
            Some("") => false,
            Some("a") => true,
            _ => return Err(invalid()),
        };
        let name = parts.next().filter(|n| !n.is_empty()).ok_or_else(invalid)?;
        let id: EmojiId = parts.next().ok_or_else(invalid)?.parse()?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            id,
            name: name.to_string(),
            animated,
        })
    }

    /// Chat markup for this emoji.
    pub fn mention(&self) -> String {
        let prefix = if self.animated { "a" } else { "" };
        format!("<{}:{}:{}>", prefix, self.name, self.id)
    }
}

impl core::fmt::Display for NinjaEmoji {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.mention())
    }
}

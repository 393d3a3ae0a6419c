//! Memory layers — the fixed, named set of documents the agent can surface.
//!
//! Each layer is backed by one markdown document (`<NAME>.md`) in the memory
//! directory. The enumeration order below is significant: it is the tie-break
//! order when two layers score the same.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One named category of persistent memory content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Layer {
    /// Permanent facts (creator, origin, standing memory)
    LongTerm,
    /// Personality and tone
    Soul,
    /// User profile
    User,
    /// Tool usage notes
    Tools,
    /// Agent instructions
    Agents,
    /// Project-scale context
    MediumTerm,
    /// Session-scale scratch context
    ShortTerm,
}

impl Layer {
    /// Every layer, in enumeration order.
    pub const ALL: [Layer; 7] = [
        Layer::LongTerm,
        Layer::Soul,
        Layer::User,
        Layer::Tools,
        Layer::Agents,
        Layer::MediumTerm,
        Layer::ShortTerm,
    ];

    /// The canonical layer name, also used as the metadata key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LongTerm => "LONG_TERM",
            Self::Soul => "SOUL",
            Self::User => "USER",
            Self::Tools => "TOOLS",
            Self::Agents => "AGENTS",
            Self::MediumTerm => "MEDIUM_TERM",
            Self::ShortTerm => "SHORT_TERM",
        }
    }

    /// Name of the backing document, e.g. `SOUL.md`.
    pub fn file_name(&self) -> String {
        format!("{}.md", self.as_str())
    }
}

impl AsRef<str> for Layer {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown memory layer: {0}")]
pub struct UnknownLayer(pub String);

impl FromStr for Layer {
    type Err = UnknownLayer;

    /// Case-insensitive; accepts `soul`, `SOUL` and `SOUL.md`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed
            .strip_suffix(".md")
            .unwrap_or(trimmed)
            .replace('-', "_")
            .to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|layer| layer.as_str() == name)
            .ok_or_else(|| UnknownLayer(s.to_string()))
    }
}

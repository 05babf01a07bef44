use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a Notion page or block.
///
/// Notion hands out IDs both as compact 32-hex strings (in page URLs) and as
/// hyphenated UUIDs (in API responses). Both parse to the same `BlockId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockId(String);

#[derive(Debug, thiserror::Error)]
#[error("Invalid Notion id '{input}': {source}")]
pub struct InvalidBlockId {
    input: String,
    #[source]
    source: uuid::Error,
}

impl BlockId {
    pub fn parse(s: &str) -> Result<Self, InvalidBlockId> {
        // Page URLs end in "<slug>-<32 hex>", optionally followed by a query or fragment
        let path = s.trim().split(['?', '#']).next().unwrap_or_default();
        let candidate = path.rsplit(['-', '/']).next().unwrap_or_default();
        let raw = if candidate.len() == 32 { candidate } else { path };

        Uuid::parse_str(raw)
            .map(|id| Self(id.hyphenated().to_string()))
            .map_err(|source| InvalidBlockId {
                input: s.to_string(),
                source,
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Uuid> for BlockId {
    fn from(id: Uuid) -> Self {
        Self(id.hyphenated().to_string())
    }
}

impl FromStr for BlockId {
    type Err = InvalidBlockId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BlockId {
    type Error = InvalidBlockId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<BlockId> for String {
    fn from(id: BlockId) -> Self {
        id.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

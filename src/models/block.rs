use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{flatten, BlockId, RichText};

/// A node in a page's block tree, as returned by `GET /blocks/{id}/children`.
///
/// Notion nests the type-specific body under a key named after the type tag
/// (`{"type": "callout", "callout": {...}}`). Only the rich text of that body
/// is kept; equation blocks and child databases are folded into a single run
/// so every kind flattens the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBlock", into = "RawBlock")]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    pub has_children: bool,
    pub rich_text: Vec<RichText>,
}

/// The type tag of a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Callout,
    Equation,
    Heading1,
    Heading2,
    Heading3,
    BulletedListItem,
    NumberedListItem,
    ToDo,
    Toggle,
    Quote,
    ChildPage,
    ChildDatabase,
    /// Any tag this crate does not interpret. Kept verbatim.
    Other(String),
}

impl BlockKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Callout => "callout",
            Self::Equation => "equation",
            Self::Heading1 => "heading_1",
            Self::Heading2 => "heading_2",
            Self::Heading3 => "heading_3",
            Self::BulletedListItem => "bulleted_list_item",
            Self::NumberedListItem => "numbered_list_item",
            Self::ToDo => "to_do",
            Self::Toggle => "toggle",
            Self::Quote => "quote",
            Self::ChildPage => "child_page",
            Self::ChildDatabase => "child_database",
            Self::Other(tag) => tag,
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "paragraph" => Self::Paragraph,
            "callout" => Self::Callout,
            "equation" => Self::Equation,
            "heading_1" => Self::Heading1,
            "heading_2" => Self::Heading2,
            "heading_3" => Self::Heading3,
            "bulleted_list_item" => Self::BulletedListItem,
            "numbered_list_item" => Self::NumberedListItem,
            "to_do" => Self::ToDo,
            "toggle" => Self::Toggle,
            "quote" => Self::Quote,
            "child_page" => Self::ChildPage,
            "child_database" => Self::ChildDatabase,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for BlockKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Block {
    pub fn new(id: BlockId, kind: BlockKind, rich_text: Vec<RichText>) -> Self {
        Self {
            id,
            kind,
            has_children: false,
            rich_text,
        }
    }

    pub fn is_callout(&self) -> bool {
        self.kind == BlockKind::Callout
    }

    pub fn is_paragraph(&self) -> bool {
        self.kind == BlockKind::Paragraph
    }

    /// Concatenated text of every run (equation runs contribute their expression).
    pub fn text(&self) -> String {
        flatten(&self.rich_text)
    }

    /// Case-sensitive substring match against any of `phrases`.
    pub fn contains_any(&self, phrases: &[String]) -> bool {
        let text = self.text();
        phrases.iter().any(|p| text.contains(p.as_str()))
    }
}

/// Wire shape of a block. The body sits under the key named by `type`.
#[derive(Debug, Serialize, Deserialize)]
struct RawBlock {
    id: BlockId,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl TryFrom<RawBlock> for Block {
    type Error = serde_json::Error;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let kind = BlockKind::from_tag(&raw.kind);
        let body = raw.rest.get(&raw.kind);

        let rich_text = match (&kind, body) {
            (BlockKind::Equation, Some(body)) => body
                .get("expression")
                .and_then(Value::as_str)
                .map(|expr| vec![RichText::equation(expr)])
                .unwrap_or_default(),
            (BlockKind::ChildPage | BlockKind::ChildDatabase, Some(body)) => body
                .get("title")
                .and_then(Value::as_str)
                .map(|title| vec![RichText::text(title, None)])
                .unwrap_or_default(),
            (_, Some(body)) => match body.get("rich_text") {
                Some(runs) => serde_json::from_value(runs.clone())?,
                None => Vec::new(),
            },
            (_, None) => Vec::new(),
        };

        Ok(Self {
            id: raw.id,
            kind,
            has_children: raw.has_children,
            rich_text,
        })
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        let body = match block.kind {
            BlockKind::Equation => serde_json::json!({ "expression": block.text() }),
            BlockKind::ChildPage | BlockKind::ChildDatabase => {
                serde_json::json!({ "title": block.text() })
            }
            _ => serde_json::json!({ "rich_text": block.rich_text }),
        };

        let tag = block.kind.as_str().to_string();
        let mut rest = Map::new();
        rest.insert("object".to_string(), Value::String("block".to_string()));
        rest.insert(tag.clone(), body);

        Self {
            id: block.id,
            kind: tag,
            has_children: block.has_children,
            rest,
        }
    }
}

//! Request bodies for block writes.

use serde_json::{json, Value};

use crate::models::{flatten, BlockKind, RichText};

/// Body for `PATCH /blocks/{id}` replacing a block's rich text.
///
/// Equation blocks have no rich text; they take the flattened runs as their
/// expression.
pub fn rich_text_update(kind: &BlockKind, runs: Vec<RichText>) -> Value {
    match kind {
        BlockKind::Equation => json!({ "equation": { "expression": flatten(&runs) } }),
        _ => json!({ kind.as_str(): { "rich_text": runs } }),
    }
}

/// A new paragraph block for `PATCH /blocks/{id}/children`.
pub fn paragraph(runs: Vec<RichText>) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": { "rich_text": runs }
    })
}

/// A new callout block with an emoji icon and background color.
pub fn callout(runs: Vec<RichText>, emoji: &str, color: &str) -> Value {
    json!({
        "object": "block",
        "type": "callout",
        "callout": {
            "rich_text": runs,
            "icon": { "emoji": emoji },
            "color": color
        }
    })
}

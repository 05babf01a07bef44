//! Key message card: free text rendered as a stacked monospace equation.

use super::{Change, UpdateError};
use crate::models::{BlockId, BlockKind, RichText};
use crate::notion::{payload, BlockSink, BlockSource};

pub const PLACEHOLDER: &str = "Placeholder";

const LINE_SEPARATOR: &str = r" \\[-0.1em] ";

fn format_line(line: &str) -> String {
    format!(r"\texttt{{\scriptsize \color{{black}}{{{}}}}}", line)
}

/// One `\texttt` group per non-blank line, stacked with a tight line gap.
/// Text made only of blank lines is wrapped whole.
pub fn message_expression(text: &str) -> String {
    let lines: Vec<String> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(format_line)
        .collect();

    if lines.is_empty() {
        format_line(text)
    } else {
        lines.join(LINE_SEPARATOR)
    }
}

/// Write `text` into the first paragraph under `callout_id`, creating a
/// placeholder paragraph first when the callout has none.
pub async fn update_key_message<S>(
    store: &S,
    callout_id: &BlockId,
    text: &str,
) -> Result<Change, UpdateError>
where
    S: BlockSource + BlockSink + ?Sized,
{
    let existing = store
        .fetch_children(callout_id)
        .await?
        .into_iter()
        .find(|block| block.is_paragraph());

    let change = match existing {
        Some(block) => Change::Updated(block.id),
        None => {
            tracing::info!(callout = %callout_id, "No paragraph under callout, creating one");
            let created = store
                .append_children(
                    callout_id,
                    vec![payload::paragraph(vec![RichText::text(PLACEHOLDER, None)])],
                )
                .await?;
            let block = created
                .into_iter()
                .next()
                .ok_or_else(|| UpdateError::NothingCreated(callout_id.clone()))?;
            Change::Created(block.id)
        }
    };

    store
        .update_block(
            change.block_id(),
            payload::rich_text_update(
                &BlockKind::Paragraph,
                vec![RichText::equation(message_expression(text))],
            ),
        )
        .await?;

    tracing::info!(block = %change.block_id(), "Key message updated");
    Ok(change)
}

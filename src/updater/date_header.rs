//! Date line at the top of the page's first callout, rendered in KST.

use chrono::{Datelike, Duration, NaiveDateTime, Utc};

use super::{Change, UpdateError};
use crate::locator::{Locator, LocatorConfig};
use crate::models::{Block, BlockId, BlockKind, RichText, RichTextKind};
use crate::notion::{payload, BlockSink, BlockSource};

/// Equations containing these belong to the news card, not the date line.
pub const EXCLUDED_PHRASES: [&str; 2] = ["오늘의 뉴스", "News"];

const KST_OFFSET_HOURS: i64 = 9;

/// Current wall-clock time in Korea Standard Time.
pub fn kst_now() -> NaiveDateTime {
    (Utc::now() + Duration::hours(KST_OFFSET_HOURS)).naive_utc()
}

/// `YY 년 M 월 D 일 Ddd` laid out as a single LaTeX expression.
pub fn date_expression(now: NaiveDateTime) -> String {
    format!(
        r"\texttt{{\small {yy}}} \texttt{{\tiny \ 년}} \quad \texttt{{\huge {m}}} \texttt{{\tiny \ 월}} \quad \texttt{{\huge {d}}} \texttt{{\tiny \ 일}} \quad\texttt{{\large {day}}}",
        yy = now.format("%y"),
        m = now.month(),
        d = now.day(),
        day = now.format("%a"),
    )
}

/// A paragraph holding an equation that looks like a date line.
pub fn is_date_block(block: &Block) -> bool {
    block.is_paragraph()
        && block.rich_text.iter().any(|run| {
            let Some(eq) = run.equation.as_ref().filter(|_| run.kind == RichTextKind::Equation)
            else {
                return false;
            };
            let expr = eq.expression.as_str();
            (expr.contains("text") || expr.contains("20"))
                && !EXCLUDED_PHRASES.iter().any(|p| expr.contains(p))
        })
}

/// Rewrite the date line on `page_id`.
///
/// Only the page's direct children are searched for the callout. When no
/// date line is found, `fallback` is patched instead; with no fallback the
/// call returns `Ok(None)` and writes nothing.
pub async fn update_date_header<S>(
    store: &S,
    page_id: &BlockId,
    fallback: Option<&BlockId>,
    now: NaiveDateTime,
) -> Result<Option<Change>, UpdateError>
where
    S: BlockSource + BlockSink + ?Sized,
{
    let config = LocatorConfig::default().with_depth_limit(0);
    let mut locator = Locator::new(store, &config);

    let mut target = None;
    if let Some(callout) = locator.find_container(page_id).await? {
        if callout.has_children {
            target = locator
                .children(&callout.id)
                .await?
                .into_iter()
                .find(is_date_block)
                .map(|block| block.id);
        }
    }

    let Some(target) = target.or_else(|| fallback.cloned()) else {
        tracing::warn!(page = %page_id, "Date block not found and no fallback given");
        return Ok(None);
    };

    let expression = date_expression(now);
    store
        .update_block(
            &target,
            payload::rich_text_update(
                &BlockKind::Paragraph,
                vec![RichText::equation(expression)],
            ),
        )
        .await?;

    tracing::info!(
        block = %target,
        date = %now.format("%y.%-m.%-d (%a)"),
        "Date header updated"
    );
    Ok(Some(Change::Updated(target)))
}

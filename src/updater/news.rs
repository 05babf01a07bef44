//! Daily news card: a header equation plus one linked headline.
//!
//! Expected layout, created on demand when parts are missing:
//!
//! ```text
//! callout (container)
//! └── callout (header, "오늘의 뉴스")
//!     └── paragraph (linked headline)
//! ```

use serde::Serialize;

use super::{Change, UpdateError};
use crate::locator::{locate, LocatorConfig};
use crate::models::{Annotations, BlockId, RichText};
use crate::notion::{payload, BlockSink, BlockSource};

pub const HEADER_EXPRESSION: &str = r"\substack{ \color{gray} \textsf{\scriptsize 오늘의 뉴스 📊} }";
pub const HEADER_ICON: &str = "📰";
pub const HEADER_COLOR: &str = "gray_background";

/// A headline to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsReport {
    pub container_id: BlockId,
    /// `None` when a new header was requested but Notion created nothing.
    pub header: Option<Change>,
    pub content: Change,
}

/// Rewrite the header and headline of the page's news card.
///
/// Returns `Ok(None)` without writing anything when the page has no callout.
pub async fn update_daily_news<S>(
    store: &S,
    page_id: &BlockId,
    config: &LocatorConfig,
    item: &NewsItem,
) -> Result<Option<NewsReport>, UpdateError>
where
    S: BlockSource + BlockSink + ?Sized,
{
    let located = locate(store, page_id, config).await?;

    let Some(container_id) = located.container_id.clone() else {
        tracing::warn!(page = %page_id, "Could not find main callout");
        return Ok(None);
    };

    let header_runs = vec![RichText::equation(HEADER_EXPRESSION)];

    let (header, attach_to) = match located.header_id.as_ref().zip(located.header_kind.as_ref()) {
        Some((header_id, kind)) => {
            tracing::info!(header = %header_id, kind = %kind, "Updating header");
            store
                .update_block(header_id, payload::rich_text_update(kind, header_runs))
                .await?;

            let attach_to = located
                .attach_point()
                .cloned()
                .unwrap_or_else(|| container_id.clone());
            (Some(Change::Updated(header_id.clone())), attach_to)
        }
        None => {
            tracing::info!(container = %container_id, "Header not found, creating nested callout");
            let created = store
                .append_children(
                    &container_id,
                    vec![payload::callout(header_runs, HEADER_ICON, HEADER_COLOR)],
                )
                .await?;

            match created.into_iter().next() {
                Some(block) => (Some(Change::Created(block.id.clone())), block.id),
                None => {
                    tracing::warn!("Header append returned nothing, attaching headline to container");
                    (None, container_id.clone())
                }
            }
        }
    };

    let headline = vec![
        RichText::text(&item.title, Some(item.link.as_str())).with_annotations(Annotations::default())
    ];

    // A content match only counts when it sits under an existing header.
    // Without one, the first paragraph of the container belongs to something else.
    let existing_content = located
        .header_id
        .as_ref()
        .and(located.content_id.as_ref().zip(located.content_kind.as_ref()));

    let content = match existing_content {
        Some((content_id, kind)) => {
            store
                .update_block(content_id, payload::rich_text_update(kind, headline))
                .await?;
            Change::Updated(content_id.clone())
        }
        None => {
            tracing::info!(parent = %attach_to, "Content block not found, appending");
            let created = store
                .append_children(&attach_to, vec![payload::paragraph(headline)])
                .await?;
            let block = created
                .into_iter()
                .next()
                .ok_or_else(|| UpdateError::NothingCreated(attach_to.clone()))?;
            Change::Created(block.id)
        }
    };

    Ok(Some(NewsReport {
        container_id,
        header,
        content,
    }))
}

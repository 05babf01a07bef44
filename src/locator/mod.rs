//! Heuristic locator for the callout "card" a batch job rewrites.
//!
//! A search runs in three steps over a page's block tree:
//!
//! 1. **Container**: the first callout in depth-first pre-order, no deeper than
//!    [`LocatorConfig::depth_limit`] levels below the page.
//! 2. **Header**: a direct child of the container whose kind is listed in
//!    [`LocatorConfig::header_kinds`]. Kinds are tried in list order and the
//!    first child of the first kind present wins. A callout header is a
//!    container itself; any other header is a sibling of the content it labels.
//! 3. **Content**: the first block in the header's scope whose flattened text
//!    contains one of [`LocatorConfig::phrases`].
//!
//! Every field of [`LocateResult`] may be absent. Absence means the caller has
//! to create the missing structure; it is not an error.

mod config;

pub use config::*;

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::models::{Block, BlockId, BlockKind};
use crate::notion::{BlockSource, ClientError};

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("Failed to fetch children of {block_id}: {source}")]
    Fetch {
        block_id: BlockId,
        #[source]
        source: ClientError,
    },
}

/// Outcome of a locator run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocateResult {
    pub container_id: Option<BlockId>,
    pub header_id: Option<BlockId>,
    pub content_id: Option<BlockId>,
    /// Kind of the header block. Updates must be keyed by it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_kind: Option<BlockKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_kind: Option<BlockKind>,
    /// True when the header is a callout, so new content belongs inside it.
    pub header_is_container: bool,
    /// Blocks whose children could not be fetched under [`FetchPolicy::FailOpen`].
    /// A non-empty list means an absent field may be "unknown" rather than "missing".
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_fetches: Vec<BlockId>,
}

impl LocateResult {
    /// Where a newly created content block should be appended.
    pub fn attach_point(&self) -> Option<&BlockId> {
        match (&self.header_id, self.header_is_container) {
            (Some(header), true) => Some(header),
            _ => self.container_id.as_ref(),
        }
    }
}

/// One locator run. Children fetched during the run are memoized, so every
/// block is fetched at most once.
pub struct Locator<'a, S: BlockSource + ?Sized> {
    source: &'a S,
    config: &'a LocatorConfig,
    cache: HashMap<BlockId, Vec<Block>>,
    failed: Vec<BlockId>,
}

impl<'a, S: BlockSource + ?Sized> Locator<'a, S> {
    pub fn new(source: &'a S, config: &'a LocatorConfig) -> Self {
        Self {
            source,
            config,
            cache: HashMap::new(),
            failed: Vec::new(),
        }
    }

    /// Children of `block_id`, from cache or a single fetch.
    ///
    /// Under [`FetchPolicy::FailOpen`] a failed fetch yields an empty list and
    /// is recorded; under [`FetchPolicy::Propagate`] it aborts the run.
    pub async fn children(&mut self, block_id: &BlockId) -> Result<Vec<Block>, LocateError> {
        if let Some(children) = self.cache.get(block_id) {
            return Ok(children.clone());
        }

        let children = match self.source.fetch_children(block_id).await {
            Ok(children) => children,
            Err(source) => match self.config.fetch_policy {
                FetchPolicy::FailOpen => {
                    tracing::warn!(block = %block_id, error = %source, "Fetch failed, treating as no children");
                    self.failed.push(block_id.clone());
                    Vec::new()
                }
                FetchPolicy::Propagate => {
                    return Err(LocateError::Fetch {
                        block_id: block_id.clone(),
                        source,
                    })
                }
            },
        };

        self.cache.insert(block_id.clone(), children.clone());
        Ok(children)
    }

    /// First callout under `page_id` in depth-first pre-order.
    ///
    /// The page's own children sit at depth 0. Children of a block at depth
    /// `d` are only fetched when `d + 1` is within the depth limit, so deeper
    /// branches are left unsearched.
    pub async fn find_container(&mut self, page_id: &BlockId) -> Result<Option<Block>, LocateError> {
        let mut stack: Vec<(Block, usize)> = self
            .children(page_id)
            .await?
            .into_iter()
            .rev()
            .map(|block| (block, 0))
            .collect();

        while let Some((block, depth)) = stack.pop() {
            if block.is_callout() {
                tracing::debug!(block = %block.id, depth, "Found container callout");
                return Ok(Some(block));
            }
            if block.has_children && depth < self.config.depth_limit {
                let children = self.children(&block.id).await?;
                stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
            }
        }

        Ok(None)
    }

    /// Run all three search steps against `page_id`.
    pub async fn locate(mut self, page_id: &BlockId) -> Result<LocateResult, LocateError> {
        let mut result = LocateResult::default();

        let Some(container) = self.find_container(page_id).await? else {
            tracing::info!(page = %page_id, "No callout found in page");
            result.failed_fetches = self.failed;
            return Ok(result);
        };
        result.container_id = Some(container.id.clone());

        let container_children = if container.has_children {
            self.children(&container.id).await?
        } else {
            Vec::new()
        };

        let header_pos = self.config.header_kinds.iter().find_map(|kind| {
            container_children
                .iter()
                .position(|block| &block.kind == kind)
        });

        let scope = match header_pos {
            Some(pos) => {
                let header = &container_children[pos];
                result.header_id = Some(header.id.clone());
                result.header_kind = Some(header.kind.clone());
                result.header_is_container = header.is_callout();

                if header.is_callout() {
                    if header.has_children {
                        self.children(&header.id).await?
                    } else {
                        Vec::new()
                    }
                } else {
                    container_children[pos + 1..].to_vec()
                }
            }
            None => {
                tracing::debug!(container = %container.id, "No header block in container");
                container_children
            }
        };

        if let Some(content) = scope.iter().find(|block| self.matches_content(block)) {
            result.content_id = Some(content.id.clone());
            result.content_kind = Some(content.kind.clone());
        }

        result.failed_fetches = self.failed;
        Ok(result)
    }

    /// Content rule: any configured phrase, or the first paragraph when none
    /// are configured.
    fn matches_content(&self, block: &Block) -> bool {
        if self.config.phrases.is_empty() {
            block.is_paragraph()
        } else {
            block.contains_any(&self.config.phrases)
        }
    }
}

/// Convenience wrapper for a single run with a fresh cache.
pub async fn locate<S: BlockSource + ?Sized>(
    source: &S,
    page_id: &BlockId,
    config: &LocatorConfig,
) -> Result<LocateResult, LocateError> {
    Locator::new(source, config).locate(page_id).await
}

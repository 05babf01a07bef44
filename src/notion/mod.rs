//! Notion API access.
//!
//! The locator and updaters talk to Notion only through [`BlockSource`] and
//! [`BlockSink`], so tests can substitute an in-memory block tree.

mod client;
pub mod payload;

pub use client::*;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{Block, BlockId};

/// Read side: list a block's children in source order.
#[async_trait]
pub trait BlockSource: Send + Sync {
    async fn fetch_children(&self, block_id: &BlockId) -> Result<Vec<Block>, ClientError>;
}

/// Write side: the patch and append calls issued after locating.
#[async_trait]
pub trait BlockSink: Send + Sync {
    async fn update_block(&self, block_id: &BlockId, body: Value) -> Result<(), ClientError>;

    async fn append_children(
        &self,
        parent_id: &BlockId,
        children: Vec<Value>,
    ) -> Result<Vec<Block>, ClientError>;
}

#[async_trait]
impl BlockSource for NotionClient {
    async fn fetch_children(&self, block_id: &BlockId) -> Result<Vec<Block>, ClientError> {
        self.get_children(block_id).await
    }
}

#[async_trait]
impl BlockSink for NotionClient {
    async fn update_block(&self, block_id: &BlockId, body: Value) -> Result<(), ClientError> {
        NotionClient::update_block(self, block_id, &body).await.map(|_| ())
    }

    async fn append_children(
        &self,
        parent_id: &BlockId,
        children: Vec<Value>,
    ) -> Result<Vec<Block>, ClientError> {
        NotionClient::append_children(self, parent_id, &children).await
    }
}

//! HTTP client for the Notion blocks API.
//!
//! Only the three block endpoints the locator and updaters need are wrapped:
//! listing children, patching a block, and appending children.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::NotionConfig;
use crate::models::{Block, BlockId};

/// Maximum page size the children endpoint accepts.
const PAGE_SIZE: u32 = 100;

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: integration token missing or invalid")]
    Unauthorized,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// One page of a paginated children listing.
#[derive(Debug, Deserialize)]
pub struct ChildrenPage {
    pub results: Vec<Block>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// HTTP client for the Notion API.
#[derive(Debug, Clone)]
pub struct NotionClient {
    base_url: String,
    token: String,
    version: String,
    client: Client,
}

impl NotionClient {
    /// Create client from environment-derived configuration.
    pub fn new(config: &NotionConfig) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            version: config.version.clone(),
            client,
        })
    }

    /// Build a request with auth and version headers.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.version)
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
                StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(body)),
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::TOO_MANY_REQUESTS => Err(ClientError::RateLimited(body)),
                _ => Err(ClientError::Server(format!("{}: {}", status, body))),
            }
        }
    }

    // ============================================================
    // Block Operations
    // ============================================================

    /// Fetch one page of a block's children.
    pub async fn list_children_page(
        &self,
        block_id: &BlockId,
        start_cursor: Option<&str>,
    ) -> Result<ChildrenPage, ClientError> {
        let page_size = PAGE_SIZE.to_string();
        let mut params = vec![("page_size", page_size.as_str())];
        if let Some(cursor) = start_cursor {
            params.push(("start_cursor", cursor));
        }

        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/blocks/{}/children", block_id),
            )
            .query(&params)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Fetch every child of a block, following pagination cursors.
    pub async fn get_children(&self, block_id: &BlockId) -> Result<Vec<Block>, ClientError> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.list_children_page(block_id, cursor.as_deref()).await?;
            blocks.extend(page.results);

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        tracing::debug!(block = %block_id, count = blocks.len(), "Fetched children");
        Ok(blocks)
    }

    /// Patch a block's type-specific body.
    pub async fn update_block(&self, block_id: &BlockId, body: &Value) -> Result<Block, ClientError> {
        let response = self
            .request(reqwest::Method::PATCH, &format!("/blocks/{}", block_id))
            .json(body)
            .send()
            .await?;
        let block = self.handle_response(response).await?;
        tracing::info!(block = %block_id, "Block updated");
        Ok(block)
    }

    /// Append blocks under a parent. Returns the blocks Notion created.
    pub async fn append_children(
        &self,
        parent_id: &BlockId,
        children: &[Value],
    ) -> Result<Vec<Block>, ClientError> {
        let response = self
            .request(
                reqwest::Method::PATCH,
                &format!("/blocks/{}/children", parent_id),
            )
            .json(&serde_json::json!({ "children": children }))
            .send()
            .await?;
        let page: ChildrenPage = self.handle_response(response).await?;
        tracing::info!(parent = %parent_id, count = page.results.len(), "Appended children");
        Ok(page.results)
    }
}

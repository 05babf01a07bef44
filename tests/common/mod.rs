//! In-memory Notion workspace shared by the integration specs.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use notion_locator::models::{Block, BlockId, BlockKind, RichText};
use notion_locator::notion::{BlockSink, BlockSource, ClientError};
use serde_json::Value;
use uuid::Uuid;

#[derive(Default)]
struct State {
    children: HashMap<BlockId, Vec<Block>>,
    failing: HashSet<BlockId>,
    fetches: Vec<BlockId>,
    updates: Vec<(BlockId, Value)>,
    appends: Vec<(BlockId, Vec<Value>)>,
    /// Number of upcoming appends that create nothing.
    empty_appends: usize,
}

/// A block tree that records every call made against it.
#[derive(Default)]
pub struct FakeWorkspace {
    state: Mutex<State>,
}

pub fn new_id() -> BlockId {
    BlockId::from(Uuid::new_v4())
}

impl FakeWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block under `parent` and return its id. The parent's
    /// `has_children` flag is raised wherever it is listed.
    pub fn add(&self, parent: &BlockId, kind: BlockKind, runs: Vec<RichText>) -> BlockId {
        let id = new_id();
        let block = Block::new(id.clone(), kind, runs);
        let mut state = self.state.lock().unwrap();
        for list in state.children.values_mut() {
            for b in list.iter_mut().filter(|b| &b.id == parent) {
                b.has_children = true;
            }
        }
        state.children.entry(parent.clone()).or_default().push(block);
        id
    }

    pub fn add_text(&self, parent: &BlockId, kind: BlockKind, text: &str) -> BlockId {
        self.add(parent, kind, vec![RichText::text(text, None)])
    }

    /// Mark a block as having children without giving it any listing, so a
    /// fetch for it hits `failing` or returns nothing.
    pub fn set_has_children(&self, id: &BlockId) {
        let mut state = self.state.lock().unwrap();
        for list in state.children.values_mut() {
            for b in list.iter_mut().filter(|b| &b.id == id) {
                b.has_children = true;
            }
        }
    }

    pub fn fail_fetches_of(&self, id: &BlockId) {
        self.state.lock().unwrap().failing.insert(id.clone());
    }

    pub fn make_appends_return_nothing(&self) {
        self.state.lock().unwrap().empty_appends = usize::MAX;
    }

    pub fn make_next_append_return_nothing(&self) {
        self.state.lock().unwrap().empty_appends = 1;
    }

    pub fn fetch_count(&self, id: &BlockId) -> usize {
        self.state
            .lock()
            .unwrap()
            .fetches
            .iter()
            .filter(|f| *f == id)
            .count()
    }

    pub fn total_fetches(&self) -> usize {
        self.state.lock().unwrap().fetches.len()
    }

    pub fn updates(&self) -> Vec<(BlockId, Value)> {
        self.state.lock().unwrap().updates.clone()
    }

    pub fn appends(&self) -> Vec<(BlockId, Vec<Value>)> {
        self.state.lock().unwrap().appends.clone()
    }

    pub fn children_of(&self, id: &BlockId) -> Vec<Block> {
        self.state
            .lock()
            .unwrap()
            .children
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn find(&self, id: &BlockId) -> Option<Block> {
        self.state
            .lock()
            .unwrap()
            .children
            .values()
            .flatten()
            .find(|b| &b.id == id)
            .cloned()
    }
}

#[async_trait]
impl BlockSource for FakeWorkspace {
    async fn fetch_children(&self, block_id: &BlockId) -> Result<Vec<Block>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.fetches.push(block_id.clone());
        if state.failing.contains(block_id) {
            return Err(ClientError::Server(format!("502 Bad Gateway: {}", block_id)));
        }
        Ok(state.children.get(block_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl BlockSink for FakeWorkspace {
    async fn update_block(&self, block_id: &BlockId, body: Value) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        let block = state
            .children
            .values_mut()
            .flatten()
            .find(|b| &b.id == block_id)
            .ok_or_else(|| ClientError::NotFound(block_id.to_string()))?;

        if let Some(runs) = body
            .get(block.kind.as_str())
            .and_then(|b| b.get("rich_text"))
        {
            block.rich_text = serde_json::from_value(runs.clone())
                .map_err(|e| ClientError::BadRequest(e.to_string()))?;
        }

        state.updates.push((block_id.clone(), body));
        Ok(())
    }

    async fn append_children(
        &self,
        parent_id: &BlockId,
        children: Vec<Value>,
    ) -> Result<Vec<Block>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.appends.push((parent_id.clone(), children.clone()));
        if state.empty_appends > 0 {
            state.empty_appends -= 1;
            return Ok(Vec::new());
        }

        let mut created = Vec::new();
        for mut child in children {
            child["id"] = Value::String(new_id().to_string());
            let block: Block = serde_json::from_value(child)
                .map_err(|e| ClientError::BadRequest(e.to_string()))?;
            created.push(block);
        }

        for list in state.children.values_mut() {
            for b in list.iter_mut().filter(|b| &b.id == parent_id) {
                b.has_children = true;
            }
        }
        state
            .children
            .entry(parent_id.clone())
            .or_default()
            .extend(created.iter().cloned());
        Ok(created)
    }
}

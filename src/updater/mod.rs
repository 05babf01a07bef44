//! Batch jobs that locate blocks on a page and rewrite them.
//!
//! - [`news`]: Today's news headline inside the page's callout card.
//! - [`date_header`]: The date equation at the top of the card.
//! - [`key_message`]: A multi-line equation under a known callout.

pub mod date_header;
pub mod key_message;
pub mod news;

use serde::Serialize;
use thiserror::Error;

use crate::locator::LocateError;
use crate::models::BlockId;
use crate::notion::ClientError;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Append under {0} returned no blocks")]
    NothingCreated(BlockId),
}

/// What an updater did to a single block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "block_id", rename_all = "snake_case")]
pub enum Change {
    Updated(BlockId),
    Created(BlockId),
}

impl Change {
    pub fn block_id(&self) -> &BlockId {
        match self {
            Self::Updated(id) | Self::Created(id) => id,
        }
    }
}

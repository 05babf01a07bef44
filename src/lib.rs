//! Locate and rewrite callout "cards" on a Notion page.
//!
//! The [`locator`] finds the container, header and content blocks of a card;
//! the [`updater`] jobs patch them or create whatever is missing.

pub mod config;
pub mod locator;
pub mod models;
pub mod notion;
pub mod tree_render;
pub mod updater;

//! Domain models for the Notion block tree.
//!
//! # Core Concepts
//!
//! - [`Block`]: A node in a page's content tree. Only blocks with
//!   `has_children` need another fetch to reveal what is under them.
//! - [`RichText`]: A typed span inside a block. Equation runs carry a LaTeX
//!   expression instead of ordinary text.
//! - [`BlockId`]: A Notion identifier, normalized to the hyphenated UUID form.

mod block;
mod id;
mod rich_text;

pub use block::*;
pub use id::*;
pub use rich_text::*;

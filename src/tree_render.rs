//! ASCII tree rendering for a page's block tree.

use std::collections::HashMap;

use crate::models::{Block, BlockId, BlockKind};
use crate::notion::{BlockSource, ClientError};

const CALLOUT: char = '▣';
const PARAGRAPH: char = '¶';
const EQUATION: char = '∑';
const HEADING: char = '#';
const OTHER: char = '•';

/// Characters of flattened text shown per line.
const SNIPPET_LEN: usize = 40;

/// A block with its fetched children.
#[derive(Debug, Clone)]
pub struct BlockTreeNode {
    pub block: Block,
    pub children: Vec<BlockTreeNode>,
}

/// Get the symbol for a block kind.
fn kind_symbol(kind: &BlockKind) -> char {
    match kind {
        BlockKind::Callout => CALLOUT,
        BlockKind::Paragraph => PARAGRAPH,
        BlockKind::Equation => EQUATION,
        BlockKind::Heading1 | BlockKind::Heading2 | BlockKind::Heading3 => HEADING,
        _ => OTHER,
    }
}

fn snippet(block: &Block) -> String {
    let text = block.text().replace('\n', " ");
    if text.chars().count() > SNIPPET_LEN {
        let cut: String = text.chars().take(SNIPPET_LEN).collect();
        format!("{}…", cut)
    } else {
        text
    }
}

/// Fetch the block tree under `root_id`, expanding at most `depth_limit`
/// levels below the root's children. Fetch errors are returned, not skipped.
pub async fn fetch_tree<S: BlockSource + ?Sized>(
    source: &S,
    root_id: &BlockId,
    depth_limit: usize,
) -> Result<Vec<BlockTreeNode>, ClientError> {
    let roots = source.fetch_children(root_id).await?;

    let mut fetched: HashMap<BlockId, Vec<Block>> = HashMap::new();
    let mut pending: Vec<(BlockId, usize)> = roots
        .iter()
        .filter(|b| b.has_children)
        .map(|b| (b.id.clone(), 0))
        .collect();

    while let Some((id, depth)) = pending.pop() {
        if depth >= depth_limit || fetched.contains_key(&id) {
            continue;
        }
        let children = source.fetch_children(&id).await?;
        pending.extend(
            children
                .iter()
                .filter(|b| b.has_children)
                .map(|b| (b.id.clone(), depth + 1)),
        );
        fetched.insert(id, children);
    }

    Ok(roots
        .into_iter()
        .map(|block| build_node(block, &mut fetched))
        .collect())
}

fn build_node(block: Block, fetched: &mut HashMap<BlockId, Vec<Block>>) -> BlockTreeNode {
    let children = fetched
        .remove(&block.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| build_node(child, fetched))
        .collect();
    BlockTreeNode { block, children }
}

/// Render a block tree as ASCII art under a title line.
///
/// Example output:
/// ```text
/// page 2f90d907-031e-80e8-928d-c7617241966f
/// ├── ▣ callout
/// │   ├── ¶ paragraph \texttt{\small 26}
/// │   └── ▣ callout \substack{ \color{gray} \textsf{\scrip…
/// │       └── ¶ paragraph Markets rally on rate cut
/// └── ¶ paragraph
/// ```
pub fn render_tree(title: &str, nodes: &[BlockTreeNode]) -> String {
    let mut output = String::new();
    output.push_str(title);
    output.push('\n');
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i == nodes.len() - 1;
        render_node(&mut output, node, "", is_last);
    }
    output
}

/// Recursively render a node and its children.
fn render_node(output: &mut String, node: &BlockTreeNode, prefix: &str, is_last: bool) {
    let branch = if is_last { "└── " } else { "├── " };
    output.push_str(prefix);
    output.push_str(branch);
    output.push(kind_symbol(&node.block.kind));
    output.push(' ');
    output.push_str(node.block.kind.as_str());

    let text = snippet(&node.block);
    if !text.is_empty() {
        output.push(' ');
        output.push_str(&text);
    }
    output.push('\n');

    let continuation = if is_last { "    " } else { "│   " };
    let child_prefix = format!("{}{}", prefix, continuation);

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last);
    }
}

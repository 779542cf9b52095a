//! Typed document tree consumed by the change monitor.
//!
//! Editors hand the monitor a sequence of top-level blocks. Each node is either
//! a `Block` holding children or an `Inline` text run, and both expose the same
//! size and text accessors so the monitor never inspects editor internals.
//!
//! Size accounting follows the block-editor convention: an inline run counts
//! its characters, and a block counts its content plus one opening and one
//! closing token.

/// Kind of a block node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    /// Heading with level 1..=6.
    Heading(u8),
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Block { kind: BlockKind, children: Vec<Node> },
    Inline { text: String },
}

impl Node {
    /// A paragraph holding one text run, or no children if `text` is empty.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::block_with_text(BlockKind::Paragraph, text.into())
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::block_with_text(BlockKind::Heading(level.clamp(1, 6)), text.into())
    }

    pub fn inline(text: impl Into<String>) -> Self {
        Node::Inline { text: text.into() }
    }

    fn block_with_text(kind: BlockKind, text: String) -> Self {
        let children = if text.is_empty() {
            Vec::new()
        } else {
            vec![Node::Inline { text }]
        };
        Node::Block { kind, children }
    }

    /// Length of the node's content: characters for text, summed child sizes for blocks.
    pub fn content_len(&self) -> usize {
        match self {
            Node::Inline { text } => text.chars().count(),
            Node::Block { children, .. } => children.iter().map(Node::node_size).sum(),
        }
    }

    /// Size the node occupies inside its parent.
    pub fn node_size(&self) -> usize {
        match self {
            Node::Inline { .. } => self.content_len(),
            Node::Block { .. } => self.content_len() + 2,
        }
    }

    /// Text of the first inline node reached by following first children.
    pub fn first_text(&self) -> Option<&str> {
        match self {
            Node::Inline { text } => Some(text),
            Node::Block { children, .. } => children.first().and_then(Node::first_text),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Block { children, .. } => children,
            Node::Inline { .. } => &[],
        }
    }
}

/// Depth-first visitor over document nodes.
///
/// `visit` returns `true` to descend into the node's children.
pub trait NodeVisitor {
    fn visit(&mut self, node: &Node, depth: usize) -> bool;
}

/// Walks `node` and its descendants in document order.
pub fn walk<V: NodeVisitor + ?Sized>(node: &Node, visitor: &mut V) {
    walk_at(node, 0, visitor);
}

fn walk_at<V: NodeVisitor + ?Sized>(node: &Node, depth: usize, visitor: &mut V) {
    if visitor.visit(node, depth) {
        for child in node.children() {
            walk_at(child, depth + 1, visitor);
        }
    }
}

/// Sums `content_len` of top-level blocks without descending.
#[derive(Debug, Default)]
struct ContentSize {
    total: usize,
}

impl NodeVisitor for ContentSize {
    fn visit(&mut self, node: &Node, _depth: usize) -> bool {
        self.total += node.content_len();
        false
    }
}

/// Collects `"\n" + first_text` for top-level blocks longer than `min_len`.
#[derive(Debug)]
struct FlattenText {
    min_len: usize,
    out: String,
}

impl NodeVisitor for FlattenText {
    fn visit(&mut self, node: &Node, _depth: usize) -> bool {
        if node.content_len() > self.min_len {
            if let Some(text) = node.first_text() {
                self.out.push('\n');
                self.out.push_str(text);
            }
        }
        false
    }
}

/// An ordered sequence of top-level blocks, as delivered on every change event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Node>,
}

impl Document {
    pub fn new(blocks: Vec<Node>) -> Self {
        Self { blocks }
    }

    /// Sum of the content lengths of all top-level blocks.
    ///
    /// Independent of the `min_len` threshold used by [`Document::flatten_text`].
    pub fn content_size(&self) -> usize {
        let mut size = ContentSize::default();
        self.visit_blocks(&mut size);
        size.total
    }

    /// Plain-text excerpt sent for analysis.
    pub fn flatten_text(&self, min_len: usize) -> String {
        let mut flatten = FlattenText { min_len, out: String::new() };
        self.visit_blocks(&mut flatten);
        flatten.out
    }

    /// Runs `visitor` over every top-level block.
    pub fn visit_blocks<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) {
        for block in &self.blocks {
            walk(block, visitor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_block_token_accounting() {
        let p = Node::paragraph("hello");
        assert_eq!(p.content_len(), 5);
        assert_eq!(p.node_size(), 7);

        let nested = Node::Block {
            kind: BlockKind::Paragraph,
            children: vec![Node::paragraph("abc"), Node::inline("de")],
        };
        // (3 + 2) + 2
        assert_eq!(nested.content_len(), 7);
        assert_eq!(nested.first_text(), Some("abc"));
    }

    #[test]
    fn content_size_counts_chars_not_bytes() {
        let doc = Document::new(vec![Node::paragraph("héllo"), Node::paragraph("")]);
        assert_eq!(doc.content_size(), 5);
    }

    #[test]
    fn flatten_skips_short_and_empty_blocks() {
        let doc = Document::new(vec![
            Node::heading(1, "Title"),
            Node::paragraph("First paragraph."),
            Node::paragraph(""),
            Node::paragraph("tiny"),
            Node::paragraph("Second one here"),
        ]);
        assert_eq!(doc.flatten_text(5), "\nFirst paragraph.\nSecond one here");
        // "Title" has exactly 5 chars and does not exceed the threshold.
        assert_eq!(doc.content_size(), 5 + 16 + 0 + 4 + 15);
    }

    #[test]
    fn flatten_uses_first_text_only() {
        let doc = Document::new(vec![Node::Block {
            kind: BlockKind::Paragraph,
            children: vec![Node::inline("bold part "), Node::inline("plain part")],
        }]);
        assert_eq!(doc.flatten_text(5), "\nbold part ");
    }

    #[test]
    fn walk_visits_in_document_order() {
        struct Depths(Vec<usize>);
        impl NodeVisitor for Depths {
            fn visit(&mut self, _node: &Node, depth: usize) -> bool {
                self.0.push(depth);
                true
            }
        }
        let tree = Node::Block {
            kind: BlockKind::Paragraph,
            children: vec![Node::paragraph("a"), Node::inline("b")],
        };
        let mut depths = Depths(Vec::new());
        walk(&tree, &mut depths);
        assert_eq!(depths.0, vec![0, 1, 2, 1]);
    }
}

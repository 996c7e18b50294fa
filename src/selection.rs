//! Caret and selection preservation across content replacement.
//!
//! A selection boundary is recorded as a [`BoundaryPath`]: the child-index steps
//! from the text container's root to the boundary node plus an offset inside it.
//! Paths survive a re-render that rebuilds the node tree, which live node handles
//! do not. The tree itself is reached through [`SelectionHost`], so the same logic
//! drives a browser DOM or the in-memory [`MemoryTree`].

use serde::{Deserialize, Serialize};

/// Size of a node as seen by an offset: chars for text nodes, children for elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeLength {
    Text(usize),
    Children(usize),
}

impl NodeLength {
    pub fn max_offset(self) -> usize {
        match self {
            NodeLength::Text(n) | NodeLength::Children(n) => n,
        }
    }
}

/// One end of a live selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary<N> {
    pub node: N,
    pub offset: usize,
}

/// Read/write access to a text container's node tree and its live selection.
pub trait SelectionHost {
    type Node: Clone + PartialEq;

    /// The container's root node.
    fn root(&self) -> Self::Node;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    /// Position of `node` among its parent's children.
    fn index_in_parent(&self, node: &Self::Node) -> Option<usize>;
    fn child(&self, node: &Self::Node, index: usize) -> Option<Self::Node>;
    fn length(&self, node: &Self::Node) -> NodeLength;
    /// Current selection as (start, end), if any.
    fn selection(&self) -> Option<(Boundary<Self::Node>, Boundary<Self::Node>)>;
    fn set_selection(&mut self, start: Boundary<Self::Node>, end: Boundary<Self::Node>);
}

/// Address of one boundary relative to the container root.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundaryPath {
    pub path: Vec<usize>,
    pub offset: usize,
}

/// A captured selection, independent of any node handles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionPath {
    pub start: BoundaryPath,
    pub end: BoundaryPath,
}

impl SelectionPath {
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// How a restore ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Both boundaries were found (offsets possibly clamped).
    Restored,
    /// A boundary path no longer resolves; caret collapsed at end of content.
    FellBackToEnd,
}

fn path_to<H: SelectionHost>(host: &H, node: &H::Node) -> Option<Vec<usize>> {
    let root = host.root();
    let mut steps = Vec::new();
    let mut current = node.clone();
    while current != root {
        steps.push(host.index_in_parent(&current)?);
        current = host.parent(&current)?;
    }
    steps.reverse();
    Some(steps)
}

fn resolve<H: SelectionHost>(host: &H, path: &[usize]) -> Option<H::Node> {
    path.iter()
        .try_fold(host.root(), |node, &index| host.child(&node, index))
}

/// Records the container's current selection as paths.
///
/// Returns `None` when there is no selection or it lies outside the container.
pub fn capture<H: SelectionHost>(host: &H) -> Option<SelectionPath> {
    let (start, end) = host.selection()?;
    let start_path = path_to(host, &start.node)?;
    let end_path = path_to(host, &end.node)?;
    Some(SelectionPath {
        start: BoundaryPath {
            path: start_path,
            offset: start.offset,
        },
        end: BoundaryPath {
            path: end_path,
            offset: end.offset,
        },
    })
}

/// Re-applies a captured selection to the (possibly re-rendered) container.
///
/// Offsets are clamped to the target node's length. If either path cannot be
/// resolved the caret collapses at the end of the content instead.
pub fn restore<H: SelectionHost>(host: &mut H, captured: &SelectionPath) -> RestoreOutcome {
    let start = resolve(host, &captured.start.path);
    let end = resolve(host, &captured.end.path);
    match (start, end) {
        (Some(start), Some(end)) => {
            let start_offset = captured
                .start
                .offset
                .min(host.length(&start).max_offset());
            let end_offset = captured.end.offset.min(host.length(&end).max_offset());
            host.set_selection(
                Boundary {
                    node: start,
                    offset: start_offset,
                },
                Boundary {
                    node: end,
                    offset: end_offset,
                },
            );
            RestoreOutcome::Restored
        }
        _ => {
            log::debug!("Selection path no longer resolves, collapsing caret at end");
            collapse_to_end(host);
            RestoreOutcome::FellBackToEnd
        }
    }
}

/// The deepest last node of the container and its length: where "end of content" is.
pub fn end_boundary<H: SelectionHost>(host: &H) -> Boundary<H::Node> {
    let mut node = host.root();
    loop {
        match host.length(&node) {
            NodeLength::Children(n) if n > 0 => match host.child(&node, n - 1) {
                Some(last) => node = last,
                None => return Boundary { node, offset: n },
            },
            length => {
                return Boundary {
                    node,
                    offset: length.max_offset(),
                }
            }
        }
    }
}

/// Collapses the caret at the end of the container's content.
pub fn collapse_to_end<H: SelectionHost>(host: &mut H) {
    let end = end_boundary(host);
    host.set_selection(end.clone(), end);
}

/// A node of the in-memory rich-text tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryNode {
    Element(Vec<MemoryNode>),
    Text(String),
}

impl MemoryNode {
    pub fn text(s: impl Into<String>) -> Self {
        MemoryNode::Text(s.into())
    }
}

/// A self-contained text container: a node tree plus a selection held as paths.
///
/// Node handles are paths from the root, so a handle goes stale when the tree is
/// rebuilt just like a detached DOM node would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTree {
    root: MemoryNode,
    selection: Option<(Boundary<Vec<usize>>, Boundary<Vec<usize>>)>,
}

impl MemoryTree {
    pub fn new(children: Vec<MemoryNode>) -> Self {
        MemoryTree {
            root: MemoryNode::Element(children),
            selection: None,
        }
    }

    /// A container holding `text`, with one `<br>`-like empty element between lines.
    pub fn from_plain_text(text: &str) -> Self {
        let mut tree = MemoryTree::new(Vec::new());
        tree.set_plain_text(text);
        tree
    }

    /// Re-renders the content from plain text; the selection goes stale.
    pub fn set_plain_text(&mut self, text: &str) {
        let mut children = Vec::new();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                children.push(MemoryNode::Element(Vec::new()));
            }
            if !line.is_empty() {
                children.push(MemoryNode::text(line));
            }
        }
        self.replace_children(children);
    }

    /// Replaces the content; the live selection is left pointing at the old paths.
    pub fn replace_children(&mut self, children: Vec<MemoryNode>) {
        self.root = MemoryNode::Element(children);
    }

    fn node_at(&self, path: &[usize]) -> Option<&MemoryNode> {
        let mut node = &self.root;
        for &index in path {
            node = match node {
                MemoryNode::Element(children) => children.get(index)?,
                MemoryNode::Text(_) => return None,
            };
        }
        Some(node)
    }

    pub fn caret(&self) -> Option<&(Boundary<Vec<usize>>, Boundary<Vec<usize>>)> {
        self.selection.as_ref()
    }

    pub fn select(&mut self, start: (Vec<usize>, usize), end: (Vec<usize>, usize)) {
        self.selection = Some((
            Boundary {
                node: start.0,
                offset: start.1,
            },
            Boundary {
                node: end.0,
                offset: end.1,
            },
        ));
    }
}

impl SelectionHost for MemoryTree {
    type Node = Vec<usize>;

    fn root(&self) -> Self::Node {
        Vec::new()
    }

    fn parent(&self, node: &Self::Node) -> Option<Self::Node> {
        let (_, parent) = node.split_last()?;
        Some(parent.to_vec())
    }

    fn index_in_parent(&self, node: &Self::Node) -> Option<usize> {
        node.last().copied()
    }

    fn child(&self, node: &Self::Node, index: usize) -> Option<Self::Node> {
        match self.node_at(node)? {
            MemoryNode::Element(children) if index < children.len() => {
                let mut path = node.clone();
                path.push(index);
                Some(path)
            }
            _ => None,
        }
    }

    fn length(&self, node: &Self::Node) -> NodeLength {
        match self.node_at(node) {
            Some(MemoryNode::Element(children)) => NodeLength::Children(children.len()),
            Some(MemoryNode::Text(text)) => NodeLength::Text(text.chars().count()),
            None => NodeLength::Children(0),
        }
    }

    fn selection(&self) -> Option<(Boundary<Self::Node>, Boundary<Self::Node>)> {
        let (start, end) = self.selection.clone()?;
        // A stale path behaves like a detached node: not inside the container.
        if self.node_at(&start.node).is_none() || self.node_at(&end.node).is_none() {
            return None;
        }
        Some((start, end))
    }

    fn set_selection(&mut self, start: Boundary<Self::Node>, end: Boundary<Self::Node>) {
        self.selection = Some((start, end));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> MemoryTree {
        // <root>"Hello "<b>"bold"</b>" tail"</root>
        MemoryTree::new(vec![
            MemoryNode::text("Hello "),
            MemoryNode::Element(vec![MemoryNode::text("bold")]),
            MemoryNode::text(" tail"),
        ])
    }

    #[test]
    fn capture_records_paths_and_offsets() {
        let mut t = tree();
        t.select((vec![0], 2), (vec![1, 0], 3));
        let captured = capture(&t).unwrap();
        assert_eq!(captured.start, BoundaryPath { path: vec![0], offset: 2 });
        assert_eq!(captured.end, BoundaryPath { path: vec![1, 0], offset: 3 });
        assert!(!captured.is_collapsed());
    }

    #[test]
    fn collapsed_caret_at_end_survives_identity_edit() {
        let mut t = tree();
        let end = end_boundary(&t);
        assert_eq!(end, Boundary { node: vec![2], offset: 5 });
        t.set_selection(end.clone(), end);

        let captured = capture(&t).unwrap();
        assert!(captured.is_collapsed());

        let same = tree().root;
        if let MemoryNode::Element(children) = same {
            t.replace_children(children);
        }
        assert_eq!(restore(&mut t, &captured), RestoreOutcome::Restored);
        let (start, end) = t.caret().unwrap();
        assert_eq!(start, end);
        assert_eq!(start.node, vec![2]);
        assert_eq!(start.offset, 5);
    }

    #[test]
    fn restore_clamps_offsets_when_text_shrinks() {
        let mut t = tree();
        t.select((vec![2], 5), (vec![2], 5));
        let captured = capture(&t).unwrap();
        t.replace_children(vec![
            MemoryNode::text("Hi"),
            MemoryNode::Element(vec![]),
            MemoryNode::text("x"),
        ]);
        assert_eq!(restore(&mut t, &captured), RestoreOutcome::Restored);
        assert_eq!(t.caret().unwrap().0.offset, 1);
    }

    #[test]
    fn restore_falls_back_to_end_when_structure_changed() {
        let mut t = tree();
        t.select((vec![1, 0], 1), (vec![1, 0], 2));
        let captured = capture(&t).unwrap();
        t.replace_children(vec![MemoryNode::text("flat text")]);
        assert_eq!(restore(&mut t, &captured), RestoreOutcome::FellBackToEnd);
        let (start, end) = t.caret().unwrap();
        assert_eq!(start, end);
        assert_eq!(start.node, vec![0]);
        assert_eq!(start.offset, 9);
    }

    #[test]
    fn empty_container_collapses_at_root() {
        let mut t = MemoryTree::new(Vec::new());
        collapse_to_end(&mut t);
        let (start, _) = t.caret().unwrap();
        assert_eq!(start.node, Vec::<usize>::new());
        assert_eq!(start.offset, 0);
        assert!(capture(&t).unwrap().is_collapsed());
    }

    #[test]
    fn plain_text_rerender_leaves_selection_stale() {
        let mut t = MemoryTree::from_plain_text("Q3 Review\nDraft");
        t.select((vec![2], 2), (vec![2], 2));
        let captured = capture(&t).unwrap();

        t.set_plain_text("Q3");
        assert_eq!(restore(&mut t, &captured), RestoreOutcome::FellBackToEnd);
        let (start, end) = t.caret().unwrap();
        assert_eq!(start, end);
        assert_eq!((start.node.clone(), start.offset), (vec![0], 2));
    }
}

//! Composed documents: an arena of generic nodes.
//!
//! A [`Document`] owns every node it contains. Nodes refer to each other by
//! [`NodeId`], so an alias simply reuses the id of the anchored node. This
//! gives aliases reference identity with their anchor and lets cyclic
//! documents exist without reference counting.
//!
//! Read access goes through cheap borrowed views:
//!
//! - [`NodeRef`] for any node
//! - [`MappingRef`] for the entries of a mapping
//! - [`SequenceRef`] for the elements of a sequence

use crate::Mark;
use crate::event::MERGE_TAG;

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Scalar(String),
    Sequence(Vec<NodeId>),
    /// Key/value pairs in document order. Keys are not required to be unique.
    Mapping(Vec<(NodeId, NodeId)>),
}

/// A node together with its parse metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,

    /// Anchor name the node was declared with (`&name`).
    pub anchor: Option<String>,

    /// Fully resolved explicit tag.
    pub tag: Option<String>,

    /// True for scalars written without quotes; always true for collections.
    pub plain: bool,

    /// Start position in the source.
    pub mark: Mark,

    /// This mapping contains a merge key (`<<`).
    pub merged: bool,

    /// An alias inside this node refers back to the node itself. Consumers
    /// walking the graph must not assume it is a tree.
    pub two_steps_construction: bool,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, mark: Mark, tag: Option<String>, plain: bool) -> Self {
        Self {
            kind,
            anchor: None,
            tag,
            plain,
            mark,
            merged: false,
            two_steps_construction: false,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, NodeKind::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping(_))
    }

    /// Whether this node, used as a mapping key, is the merge key.
    pub fn is_merge_key(&self) -> bool {
        match &self.kind {
            NodeKind::Scalar(value) => match &self.tag {
                Some(tag) => tag == MERGE_TAG,
                None => self.plain && value == "<<",
            },
            _ => false,
        }
    }
}

/// One composed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    start: Mark,
}

impl Document {
    pub(crate) fn new(nodes: Vec<Node>, root: NodeId, start: Mark) -> Self {
        Self { nodes, root, start }
    }

    /// Position of the document start event.
    pub fn start(&self) -> Mark {
        self.start
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.node(self.root)
    }

    /// The root node's entries, if the root is a mapping.
    pub fn root_mapping(&self) -> Option<MappingRef<'_>> {
        self.root().as_mapping()
    }

    /// View of the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced for this document.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id.0 < self.nodes.len(), "node id out of range");
        NodeRef { doc: self, id }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of distinct nodes. Aliases do not add nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Borrowed view of one node.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn node(&self) -> &'a Node {
        &self.doc.nodes[self.id.0]
    }

    pub fn kind(&self) -> &'a NodeKind {
        &self.node().kind
    }

    pub fn mark(&self) -> Mark {
        self.node().mark
    }

    pub fn anchor(&self) -> Option<&'a str> {
        self.node().anchor.as_deref()
    }

    pub fn tag(&self) -> Option<&'a str> {
        self.node().tag.as_deref()
    }

    pub fn is_merged(&self) -> bool {
        self.node().merged
    }

    pub fn is_two_steps_construction(&self) -> bool {
        self.node().two_steps_construction
    }

    pub fn is_merge_key(&self) -> bool {
        self.node().is_merge_key()
    }

    /// Scalar text, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<MappingRef<'a>> {
        match self.kind() {
            NodeKind::Mapping(entries) => Some(MappingRef {
                doc: self.doc,
                id: self.id,
                entries,
            }),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<SequenceRef<'a>> {
        match self.kind() {
            NodeKind::Sequence(items) => Some(SequenceRef {
                doc: self.doc,
                id: self.id,
                items,
            }),
            _ => None,
        }
    }
}

/// Two views are equal when they denote the same node of the same document.
impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

/// Borrowed view of a mapping's entries.
#[derive(Debug, Clone, Copy)]
pub struct MappingRef<'a> {
    doc: &'a Document,
    id: NodeId,
    entries: &'a [(NodeId, NodeId)],
}

impl<'a> MappingRef<'a> {
    /// The mapping node itself.
    pub fn node(&self) -> NodeRef<'a> {
        self.doc.node(self.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in document order, duplicates included.
    pub fn iter(self) -> impl Iterator<Item = (NodeRef<'a>, NodeRef<'a>)> + 'a {
        let doc = self.doc;
        self.entries
            .iter()
            .map(move |&(key, value)| (doc.node(key), doc.node(value)))
    }

    /// Value of the first entry whose key is a scalar equal to `key`.
    pub fn get(&self, key: &str) -> Option<NodeRef<'a>> {
        self.iter()
            .find(|(k, _)| k.as_scalar() == Some(key))
            .map(|(_, value)| value)
    }

    /// Scalar text of the first entry named `key`.
    pub fn get_scalar(&self, key: &str) -> Option<&'a str> {
        self.get(key)?.as_scalar()
    }
}

/// Borrowed view of a sequence's elements.
#[derive(Debug, Clone, Copy)]
pub struct SequenceRef<'a> {
    doc: &'a Document,
    id: NodeId,
    items: &'a [NodeId],
}

impl<'a> SequenceRef<'a> {
    /// The sequence node itself.
    pub fn node(&self) -> NodeRef<'a> {
        self.doc.node(self.id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        self.items.iter().map(move |&id| doc.node(id))
    }

    pub fn get(&self, index: usize) -> Option<NodeRef<'a>> {
        self.items.get(index).map(|&id| self.doc.node(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(value: &str) -> Node {
        Node::new(NodeKind::Scalar(value.into()), Mark::default(), None, true)
    }

    fn sample() -> Document {
        // {a: x, a: y, list: [x]}
        let nodes = vec![
            Node::new(
                NodeKind::Mapping(vec![
                    (NodeId(1), NodeId(2)),
                    (NodeId(3), NodeId(4)),
                    (NodeId(5), NodeId(6)),
                ]),
                Mark::default(),
                None,
                true,
            ),
            scalar("a"),
            scalar("x"),
            scalar("a"),
            scalar("y"),
            scalar("list"),
            Node::new(
                NodeKind::Sequence(vec![NodeId(2)]),
                Mark::default(),
                None,
                true,
            ),
        ];
        Document::new(nodes, NodeId(0), Mark::default())
    }

    #[test]
    fn test_mapping_get_returns_first_duplicate() {
        let doc = sample();
        let root = doc.root_mapping().unwrap();
        assert_eq!(root.len(), 3);
        assert_eq!(root.get_scalar("a"), Some("x"));
        assert!(root.get("missing").is_none());
    }

    #[test]
    fn test_shared_node_identity() {
        let doc = sample();
        let root = doc.root_mapping().unwrap();
        let first = root.get("a").unwrap();
        let element = root.get("list").unwrap().as_sequence().unwrap().get(0).unwrap();
        assert_eq!(first, element);
        assert_ne!(first, root.iter().nth(1).unwrap().1);
    }

    #[test]
    fn test_merge_key_detection() {
        assert!(scalar("<<").is_merge_key());
        assert!(!scalar("merge").is_merge_key());

        let quoted = Node::new(NodeKind::Scalar("<<".into()), Mark::default(), None, false);
        assert!(!quoted.is_merge_key());

        let tagged = Node::new(
            NodeKind::Scalar("anything".into()),
            Mark::default(),
            Some(MERGE_TAG.into()),
            false,
        );
        assert!(tagged.is_merge_key());
    }
}

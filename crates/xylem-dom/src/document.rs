//! Arena document model.
//!
//! Nodes live in a single `Vec` owned by [`Document`]; a [`NodeId`] is an
//! index into that arena. Parent/child links are ids rather than pointers,
//! so the tree has no lifetime entanglement and clones cheaply.

use indexmap::IndexMap;

/// Handle to a node in a [`Document`] arena.
///
/// Ids are allocated during the parse in document order, so the derived
/// ordering on `NodeId` is document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Index of the node in the document arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeRecord {
    pub(crate) name: String,
    pub(crate) attributes: IndexMap<String, String>,
    pub(crate) text: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

/// A parsed tree document: named nodes with attributes, character data, and
/// ordered children.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) nodes: Vec<NodeRecord>,
    pub(crate) root: NodeId,
}

impl Document {
    fn record(&self, id: NodeId) -> &NodeRecord {
        &self.nodes[id.index()]
    }

    /// The root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of element nodes in the document.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` addresses a node of this document.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Element name.
    pub fn name(&self, id: NodeId) -> &str {
        &self.record(id).name
    }

    /// Attributes in source order.
    pub fn attributes(&self, id: NodeId) -> &IndexMap<String, String> {
        &self.record(id).attributes
    }

    /// A single attribute value.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.record(id).attributes.get(name).map(String::as_str)
    }

    /// Character data of the node, if any.
    ///
    /// Whitespace-only content of elements that also have element children
    /// is dropped during the parse; leaf text is preserved verbatim.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.record(id).text.as_deref()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.record(id).parent
    }

    /// Direct children in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.record(id).children
    }

    /// First direct child named `name`.
    pub fn child_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.record(id)
            .children
            .iter()
            .copied()
            .find(|&child| self.name(child) == name)
    }

    /// All strict descendants of `id`, preorder (document order).
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.children(id) {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }
}

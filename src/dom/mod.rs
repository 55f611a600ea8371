//! Document Model
//!
//! Arena-backed DOM mirror of the page served by the development server.
//!
//! # Layout
//!
//! ```text
//! Page
//! └── nodes: Vec<Slot>     # NodeId(n) indexes into this vector
//!     [0] Document         # synthetic root, never detached
//!     [1] Doctype
//!     [2] <html>           # document element
//!     ...
//! ```
//!
//! A replaced node is only detached from its parent, so a `NodeId` stays
//! valid and unique until the next [`Page::compact`], which drops detached
//! nodes and renumbers the rest. Side-tables keyed by `NodeId` must be
//! remapped with the returned table.
//!
//! # Modules
//!
//! - `parse` - HTML to arena conversion (via `tl`)
//! - `serialize` - arena to HTML

mod parse;
mod serialize;

use rustc_hash::FxHashMap;
use thiserror::Error;

// =============================================================================
// Types
// =============================================================================

/// Handle to a node in a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An element's tag and attributes, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    /// `None` value = boolean attribute (`<input disabled>`)
    pub attrs: Vec<(String, Option<String>)>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Doctype(String),
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Slot {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Error)]
pub enum DomError {
    #[error("failed to parse html: {0}")]
    Parse(String),

    #[error("node {0} is not an element")]
    NotElement(NodeId),

    #[error("node {0} has no parent")]
    NoParent(NodeId),

    #[error("node {0} is detached from the document")]
    Detached(NodeId),
}

// =============================================================================
// Page
// =============================================================================

/// The document tree.
#[derive(Debug, Clone)]
pub struct Page {
    nodes: Vec<Slot>,
}

const DOCUMENT: NodeId = NodeId(0);

impl Default for Page {
    fn default() -> Self {
        Self {
            nodes: vec![Slot {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }
}

impl Page {
    /// Build a page from a full HTML document.
    pub fn parse(html: &str) -> Result<Self, DomError> {
        let mut page = Self::default();
        let nodes = parse::parse_into(&mut page, html)?;
        for node in nodes {
            page.attach(DOCUMENT, node);
        }
        Ok(page)
    }

    pub const fn document(&self) -> NodeId {
        DOCUMENT
    }

    /// First element child of the document (`<html>` for a full page).
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(DOCUMENT)
            .iter()
            .copied()
            .find(|&id| self.element(id).is_some())
    }

    pub fn is_document_element(&self, id: NodeId) -> bool {
        self.document_element() == Some(id)
    }

    pub fn head(&self) -> Option<NodeId> {
        self.child_with_tag(self.document_element()?, "head")
    }

    /// The `<body>` element, or the document element for fragment-like pages.
    pub fn body(&self) -> Option<NodeId> {
        let root = self.document_element()?;
        self.child_with_tag(root, "body").or(Some(root))
    }

    fn child_with_tag(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&id| self.tag(id) == Some(tag))
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|elem| elem.tag.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Whether the node is reachable from the document node.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == DOCUMENT {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Every node in the subtree rooted at `id` (inclusive), in document order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Elements in the subtree rooted at `id` (inclusive), in document order.
    pub fn elements_under(&self, id: NodeId) -> Vec<NodeId> {
        self.subtree(id)
            .into_iter()
            .filter(|&node| self.element(node).is_some())
            .collect()
    }

    /// All attached elements, in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.elements_under(DOCUMENT)
    }

    /// Attached elements whose attribute `name` equals `value`, in document order.
    pub fn elements_where(&self, name: &str, value: &str) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|&id| self.attr(id, name) == Some(value))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let NodeKind::Element(elem) = &mut self.nodes[id.0].kind else {
            return Err(DomError::NotElement(id));
        };
        match elem.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = Some(value.to_string()),
            None => elem.attrs.push((name.to_string(), Some(value.to_string()))),
        }
        Ok(())
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        let NodeKind::Element(elem) = &mut self.nodes[id.0].kind else {
            return None;
        };
        let pos = elem.attrs.iter().position(|(key, _)| key == name)?;
        let (_, value) = elem.attrs.remove(pos);
        Some(value.unwrap_or_default())
    }

    /// Replace `id` (including itself) with the parsed fragment.
    ///
    /// Returns the fragment's top-level nodes in document order. The replaced
    /// node is detached but keeps its id.
    pub fn replace_with_html(&mut self, id: NodeId, html: &str) -> Result<Vec<NodeId>, DomError> {
        if !self.is_attached(id) {
            return Err(DomError::Detached(id));
        }
        let inserted = parse::parse_into(self, html)?;
        self.splice(id, &inserted)?;
        Ok(inserted)
    }

    /// Replace `id` with a new element holding `text` verbatim.
    pub fn replace_with_text_element(&mut self, id: NodeId, elem: Element, text: &str) -> Result<NodeId, DomError> {
        if !self.is_attached(id) {
            return Err(DomError::Detached(id));
        }
        let new = self.alloc(NodeKind::Element(elem));
        if !text.is_empty() {
            let child = self.alloc(NodeKind::Text(text.to_string()));
            self.attach(new, child);
        }
        self.splice(id, &[new])?;
        Ok(new)
    }

    /// Put `inserted` where `id` is and detach `id`.
    fn splice(&mut self, id: NodeId, inserted: &[NodeId]) -> Result<(), DomError> {
        let parent = self.parent(id).ok_or(DomError::NoParent(id))?;
        let siblings = &mut self.nodes[parent.0].children;
        let pos = siblings
            .iter()
            .position(|&child| child == id)
            .ok_or(DomError::Detached(id))?;
        siblings.splice(pos..=pos, inserted.iter().copied());

        for &node in inserted {
            self.nodes[node.0].parent = Some(parent);
        }
        self.nodes[id.0].parent = None;
        Ok(())
    }

    /// Append the parsed fragment as the last children of `parent`.
    pub fn append_html(&mut self, parent: NodeId, html: &str) -> Result<Vec<NodeId>, DomError> {
        if self.element(parent).is_none() && parent != DOCUMENT {
            return Err(DomError::NotElement(parent));
        }
        let inserted = parse::parse_into(self, html)?;
        for &node in &inserted {
            self.attach(parent, node);
        }
        Ok(inserted)
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Slot {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    // -------------------------------------------------------------------------
    // Compaction
    // -------------------------------------------------------------------------

    /// Arena slots, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes reachable from the document node.
    pub fn attached_len(&self) -> usize {
        self.subtree(DOCUMENT).len()
    }

    /// Rebuild the arena from the attached nodes only, in document order.
    ///
    /// Every `NodeId` taken before the call is invalid afterwards; the
    /// returned table maps old ids of surviving nodes to their new ids.
    pub fn compact(&mut self) -> FxHashMap<NodeId, NodeId> {
        let order = self.subtree(DOCUMENT);
        let remap: FxHashMap<NodeId, NodeId> = order
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, NodeId(new)))
            .collect();

        let mut nodes = Vec::with_capacity(order.len());
        for &old in &order {
            let slot = &mut self.nodes[old.0];
            let kind = std::mem::replace(&mut slot.kind, NodeKind::Document);
            nodes.push(Slot {
                kind,
                parent: slot.parent.and_then(|p| remap.get(&p).copied()),
                children: slot.children.iter().filter_map(|c| remap.get(c).copied()).collect(),
            });
        }
        self.nodes = nodes;
        remap
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        serialize::to_html(self, DOCUMENT)
    }

    /// Serialize one node including itself.
    pub fn outer_html(&self, id: NodeId) -> String {
        serialize::to_html(self, id)
    }
}

// =============================================================================
// Tests
// =============================================================================

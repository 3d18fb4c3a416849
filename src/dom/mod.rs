//! Headless document model backing the dialog system
//!
//! Dialogs render into a retained element tree rather than a live browser
//! document. The tree implements the small contract the lifecycle controller
//! needs: an id-indexed lookup, parent/child attachment, class and attribute
//! mutation, modal open/close flags, bounding rectangles for hit tests, and
//! per-node event listeners (see [`events`]).

pub mod events;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use events::{ClickListener, TransitionEndListener};
use thiserror::Error;

/// Unique identifier for an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Get the raw id value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Errors raised by document mutations.
#[derive(Debug, Error)]
pub enum DomError {
    #[error("node {0:?} does not exist in the document")]
    NodeNotFound(NodeId),

    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("node {child:?} is already attached to a parent")]
    AlreadyAttached { child: NodeId },
}

/// Axis-aligned rectangle in logical pixels, used for backdrop hit tests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check whether a point falls inside the rectangle.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.y <= y && y <= self.y + self.height && self.x <= x && x <= self.x + self.width
    }
}

/// A single element in the document tree.
#[derive(Default)]
pub struct Element {
    /// Tag name ("dialog", "div", ...).
    pub tag: String,

    /// Element id, mirrored in the document's id index when set.
    pub id: Option<String>,

    /// CSS class tokens in insertion order.
    classes: Vec<String>,

    /// Plain string attributes (aria-modal, role, ...).
    attributes: HashMap<String, String>,

    /// Child nodes in insertion order; stacking follows this order.
    children: Vec<NodeId>,

    /// Parent node, `None` while detached.
    parent: Option<NodeId>,

    /// Modal open flag (dialog elements only).
    open: bool,

    /// Layout rectangle assigned by the embedder.
    rect: Rect,

    /// Click listeners, dispatched by [`events::dispatch_click`].
    pub(crate) click_listeners: Vec<ClickListener>,

    /// Transition-end listeners, dispatched by [`events::dispatch_transition_end`].
    pub(crate) transition_listeners: Vec<TransitionEndListener>,
}

impl Element {
    fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Tag name of the element.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Check whether a class token is present.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Class tokens in insertion order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Read an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child nodes in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent node, `None` while detached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Modal open flag.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Layout rectangle assigned by the embedder.
    pub fn bounding_rect(&self) -> Rect {
        self.rect
    }
}

/// Retained element tree with an id index.
///
/// # Invariants
///
/// - Every attached node's `parent` back-pointer matches exactly one `children`
///   entry of that parent.
/// - The id index maps each registered id to exactly one live node.
/// - Child order is insertion order and is only changed by explicit removal.
#[derive(Default)]
pub struct Document {
    nodes: HashMap<NodeId, Element>,
    id_index: HashMap<String, NodeId>,
    next_node: u64,
    root: Option<NodeId>,
}

/// Shared handle to a [`Document`].
///
/// The dialog system is single-threaded event-loop code; the mutex exists so
/// handles, listeners and timers can share ownership, not for parallelism.
pub type DocumentHandle = Arc<Mutex<Document>>;

/// Create a new shared document with a root element.
pub fn new_document() -> DocumentHandle {
    Arc::new(Mutex::new(Document::new()))
}

impl Document {
    /// Create an empty document with a `body` root.
    pub fn new() -> Self {
        let mut doc = Self::default();
        let root = doc.create_element("body");
        doc.root = Some(root);
        doc
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        // Set once in `new` and never removed.
        self.root.expect("document root")
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(id, Element::new(tag));
        id
    }

    /// Access an element.
    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(&node)
    }

    /// Look up a node by element id.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// Check that a node exists in the document.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Assign an element id and register it in the id index.
    pub fn set_id(&mut self, node: NodeId, id: impl Into<String>) -> Result<(), DomError> {
        let id = id.into();
        let element = self.nodes.get_mut(&node).ok_or(DomError::NodeNotFound(node))?;
        if let Some(old) = element.id.replace(id.clone()) {
            self.id_index.remove(&old);
        }
        self.id_index.insert(id, node);
        Ok(())
    }

    /// Set a string attribute.
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let element = self.nodes.get_mut(&node).ok_or(DomError::NodeNotFound(node))?;
        element.attributes.insert(name.into(), value.into());
        Ok(())
    }

    /// Add a class token if not already present.
    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        let element = self.nodes.get_mut(&node).ok_or(DomError::NodeNotFound(node))?;
        if !element.has_class(class) {
            element.classes.push(class.to_string());
        }
        Ok(())
    }

    /// Remove a class token if present.
    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        let element = self.nodes.get_mut(&node).ok_or(DomError::NodeNotFound(node))?;
        element.classes.retain(|c| c != class);
        Ok(())
    }

    /// Append a detached node as the last child of a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.nodes.contains_key(&parent) {
            return Err(DomError::NodeNotFound(parent));
        }
        let child_el = self.nodes.get_mut(&child).ok_or(DomError::NodeNotFound(child))?;
        if child_el.parent.is_some() {
            return Err(DomError::AlreadyAttached { child });
        }
        child_el.parent = Some(parent);
        // Parent verified above.
        self.nodes
            .get_mut(&parent)
            .expect("parent element")
            .children
            .push(child);
        Ok(())
    }

    /// Detach a child from its parent. The node stays in the document.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_el = self.nodes.get_mut(&parent).ok_or(DomError::NodeNotFound(parent))?;
        let index = parent_el
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(DomError::NotAChild { parent, child })?;
        parent_el.children.remove(index);
        if let Some(child_el) = self.nodes.get_mut(&child) {
            child_el.parent = None;
        }
        Ok(())
    }

    /// Remove a node and its whole subtree from the document, detaching it
    /// from its parent first and dropping all listeners and id registrations.
    pub fn remove_subtree(&mut self, node: NodeId) -> Result<(), DomError> {
        if !self.nodes.contains_key(&node) {
            return Err(DomError::NodeNotFound(node));
        }
        if let Some(parent) = self.nodes[&node].parent {
            // Ignore a stale back-pointer; the subtree is going away anyway.
            let _ = self.remove_child(parent, node);
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(element) = self.nodes.remove(&current) {
                if let Some(id) = element.id {
                    self.id_index.remove(&id);
                }
                stack.extend(element.children);
            }
        }
        Ok(())
    }

    /// Walk parent pointers to check whether a node is attached to the root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if Some(current) == self.root {
                return true;
            }
            match self.nodes.get(&current).and_then(|e| e.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Number of children of a node (0 when the node is unknown).
    pub fn child_count(&self, node: NodeId) -> usize {
        self.nodes.get(&node).map_or(0, |e| e.children.len())
    }

    /// Open a node as a modal surface. No-op if the node is detached.
    pub fn show_modal(&mut self, node: NodeId) {
        if self.is_connected(node) {
            if let Some(element) = self.nodes.get_mut(&node) {
                element.open = true;
            }
        }
    }

    /// Native close: clear the open flag. Must not fail on a node that was
    /// already removed from the document.
    pub fn close(&mut self, node: NodeId) {
        if let Some(element) = self.nodes.get_mut(&node) {
            element.open = false;
        }
    }

    /// Assign the layout rectangle the embedder computed for a node.
    pub fn set_bounding_rect(&mut self, node: NodeId, rect: Rect) -> Result<(), DomError> {
        let element = self.nodes.get_mut(&node).ok_or(DomError::NodeNotFound(node))?;
        element.rect = rect;
        Ok(())
    }
}

// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node tree primitive: shared handles, parent/child linkage, and text nodes.
//!
//! Nodes are reference counted. A parent owns its children through its
//! `child_nodes` list; a child refers back to its parent weakly. Handles
//! compare by identity.

use core::cell::RefCell;
use core::fmt;
use alloc::rc::{Rc, Weak};

use crate::document::Document;
use crate::element::{Element, ElementData};

/// Type tag of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// An element: has a backing box, children, listeners and style.
    Element,
    /// A text node: contributes to its parent element's aggregate text.
    Text,
}

pub(crate) struct NodeInner {
    pub(crate) document: Document,
    parent: RefCell<Weak<NodeInner>>,
    child_nodes: RefCell<Vec<Node>>,
    pub(crate) data: NodeData,
}

pub(crate) enum NodeData {
    Element(ElementData),
    Text(RefCell<String>),
}

impl NodeInner {
    pub(crate) fn new(document: Document, data: NodeData) -> Self {
        Self {
            document,
            parent: RefCell::new(Weak::new()),
            child_nodes: RefCell::new(Vec::new()),
            data,
        }
    }
}

impl Drop for NodeInner {
    fn drop(&mut self) {
        if let NodeData::Element(data) = &self.data {
            self.document.release_box(data.backing);
        }
    }
}

/// A shared handle to a node in the tree.
#[derive(Clone)]
pub struct Node(pub(crate) Rc<NodeInner>);

impl Node {
    pub(crate) fn upgrade(weak: &Weak<NodeInner>) -> Option<Self> {
        weak.upgrade().map(Self)
    }

    pub(crate) fn downgrade(&self) -> Weak<NodeInner> {
        Rc::downgrade(&self.0)
    }

    /// Type of this node.
    pub fn node_type(&self) -> NodeType {
        match self.0.data {
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
        }
    }

    /// Returns `true` for element nodes.
    pub fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    /// Returns `true` for text nodes.
    pub fn is_text(&self) -> bool {
        self.node_type() == NodeType::Text
    }

    /// View this node as an element.
    pub fn as_element(&self) -> Option<Element> {
        self.is_element().then(|| Element(self.clone()))
    }

    /// View this node as a text node.
    pub fn as_text(&self) -> Option<Text> {
        self.is_text().then(|| Text(self.clone()))
    }

    /// Document that created this node.
    pub fn document(&self) -> &Document {
        &self.0.document
    }

    /// Parent element, if attached.
    pub fn parent_node(&self) -> Option<Element> {
        Self::upgrade(&self.0.parent.borrow()).map(Element)
    }

    /// Snapshot of the children, elements and text nodes in document order.
    pub fn child_nodes(&self) -> Vec<Self> {
        self.0.child_nodes.borrow().clone()
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.0.child_nodes.borrow().len()
    }

    /// First child.
    pub fn first_child(&self) -> Option<Self> {
        self.0.child_nodes.borrow().first().cloned()
    }

    /// Last child.
    pub fn last_child(&self) -> Option<Self> {
        self.0.child_nodes.borrow().last().cloned()
    }

    /// Sibling following this node in its parent.
    pub fn next_sibling(&self) -> Option<Self> {
        let parent = self.parent_node()?;
        let siblings = parent.0.0.child_nodes.borrow();
        let index = siblings.iter().position(|n| n == self)?;
        siblings.get(index + 1).cloned()
    }

    /// Sibling preceding this node in its parent.
    pub fn previous_sibling(&self) -> Option<Self> {
        let parent = self.parent_node()?;
        let siblings = parent.0.0.child_nodes.borrow();
        let index = siblings.iter().position(|n| n == self)?;
        index.checked_sub(1).and_then(|i| siblings.get(i).cloned())
    }

    /// Whether `self` is `other` or one of its ancestors.
    pub fn is_inclusive_ancestor_of(&self, other: &Self) -> bool {
        let mut cur = Some(other.clone());
        while let Some(node) = cur {
            if &node == self {
                return true;
            }
            cur = node.parent_node().map(|e| e.0);
        }
        false
    }

    /// Position of `child` in this node's children.
    pub(crate) fn index_of_child(&self, child: &Self) -> Option<usize> {
        self.0.child_nodes.borrow().iter().position(|n| n == child)
    }

    /// Link a detached `child` at `position` in this node's children.
    pub(crate) fn attach(&self, child: &Self, position: usize) {
        debug_assert!(child.parent_node().is_none(), "attach requires a detached child");
        let mut children = self.0.child_nodes.borrow_mut();
        let position = position.min(children.len());
        children.insert(position, child.clone());
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
    }

    /// Unlink `child` from this node's children, returning its former position.
    pub(crate) fn detach(&self, child: &Self) -> Option<usize> {
        let position = self.index_of_child(child)?;
        let removed = self.0.child_nodes.borrow_mut().remove(position);
        *removed.0.parent.borrow_mut() = Weak::new();
        Some(position)
    }

    /// Concatenated data of the text children, in document order.
    pub(crate) fn collect_text(&self) -> String {
        self.0
            .child_nodes
            .borrow()
            .iter()
            .filter_map(|n| match &n.0.data {
                NodeData::Text(data) => Some(data.borrow().clone()),
                NodeData::Element(_) => None,
            })
            .collect()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.data {
            NodeData::Element(data) => f
                .debug_struct("Element")
                .field("kind", &data.kind)
                .field("box", &data.backing)
                .field("children", &self.child_count())
                .finish_non_exhaustive(),
            NodeData::Text(data) => f.debug_tuple("Text").field(&data.borrow()).finish(),
        }
    }
}

/// A text node.
///
/// Text nodes have no native counterpart. Their data is merged, in document
/// order, into the aggregate text of their parent element.
#[derive(Clone, PartialEq, Eq)]
pub struct Text(pub(crate) Node);

impl Text {
    fn cell(&self) -> &RefCell<String> {
        match &self.0.0.data {
            NodeData::Text(data) => data,
            NodeData::Element(_) => unreachable!("Text handle over an element node"),
        }
    }

    /// Character data of this node.
    pub fn data(&self) -> String {
        self.cell().borrow().clone()
    }

    /// Replace the character data and refresh the parent's aggregate text.
    pub fn set_data(&self, data: &str) {
        {
            let mut cell = self.cell().borrow_mut();
            cell.clear();
            cell.push_str(data);
        }
        if let Some(parent) = self.parent_node() {
            parent.update_text();
        }
    }

    /// This node as a plain [`Node`].
    pub fn as_node(&self) -> &Node {
        &self.0
    }
}

impl core::ops::Deref for Text {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.0
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        text.0
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

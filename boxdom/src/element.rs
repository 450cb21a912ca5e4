// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Elements: logical nodes mirrored 1:1 by native boxes.
//!
//! Every structural mutation on an element updates the logical tree first,
//! mirrors the change into the engine, and then verifies that the element
//! children and the native children still agree (count, then identity at
//! each index). A disagreement is returned as [`DomError::ParityViolation`]
//! and is never repaired.

use alloc::rc::Weak;
use core::cell::{Cell, Ref, RefCell};
use core::fmt;

use kurbo::Point;

use boxdom_native::{BoxId, InteractionState, NativeStyle, ScrollMetrics};

use crate::dispatch;
use crate::error::{DomError, ParityFault};
use crate::event::Event;
use crate::listener::{Listener, ListenerRegistry, ListenerSnapshot};
use crate::node::{Node, NodeData, NodeInner};
use crate::style::{self, StyleDeclaration, StyleObject};

pub(crate) struct ElementData {
    pub(crate) kind: String,
    pub(crate) backing: BoxId,
    children: RefCell<Vec<Element>>,
    listeners: RefCell<ListenerRegistry>,
    text: RefCell<String>,
    focusable: Cell<bool>,
    wheel_scroll: Cell<bool>,
}

impl ElementData {
    pub(crate) fn new(kind: &str, backing: BoxId, wheel_scroll: bool) -> Self {
        Self {
            kind: kind.to_owned(),
            backing,
            children: RefCell::new(Vec::new()),
            listeners: RefCell::new(ListenerRegistry::new()),
            text: RefCell::new(String::new()),
            focusable: Cell::new(false),
            wheel_scroll: Cell::new(wheel_scroll),
        }
    }
}

/// An element node with a backing native box.
///
/// Cloning an `Element` clones the handle, not the node.
#[derive(Clone, PartialEq, Eq)]
pub struct Element(pub(crate) Node);

impl Element {
    fn data(&self) -> &ElementData {
        match &self.0.0.data {
            NodeData::Element(data) => data,
            NodeData::Text(_) => unreachable!("Element handle over a text node"),
        }
    }

    /// This element as a plain [`Node`].
    pub fn as_node(&self) -> &Node {
        &self.0
    }

    /// A handle that does not keep the element, or its box, alive.
    pub fn downgrade(&self) -> WeakElement {
        WeakElement(self.0.downgrade())
    }

    /// Box kind the element was created with, e.g. `"Div"`.
    pub fn kind(&self) -> &str {
        &self.data().kind
    }

    /// Handle of the backing native box.
    pub fn box_id(&self) -> BoxId {
        self.data().backing
    }

    /// Element children, in order. Mirrors the native child list.
    pub fn children(&self) -> Vec<Self> {
        self.data().children.borrow().clone()
    }

    /// Number of element children.
    pub fn child_element_count(&self) -> usize {
        self.data().children.borrow().len()
    }

    /// Aggregate text of the text children, in document order.
    pub fn text(&self) -> String {
        self.data().text.borrow().clone()
    }

    /// Whether pointer presses move focus to this element.
    pub fn focusable(&self) -> bool {
        self.data().focusable.get()
    }

    /// Set the focusable flag.
    pub fn set_focusable(&self, focusable: bool) {
        self.data().focusable.set(focusable);
    }

    /// Whether wheel events scroll this element.
    pub fn wheel_scroll(&self) -> bool {
        self.data().wheel_scroll.get()
    }

    /// Enable or suppress the built-in wheel → scroll behavior.
    pub fn set_wheel_scroll(&self, enabled: bool) {
        self.data().wheel_scroll.set(enabled);
    }

    /// Elements from the root of this element's tree down to this element.
    pub fn get_path(&self) -> Vec<Self> {
        dispatch::path_to(self).into_vec()
    }

    // --- structure ---

    /// Insert `child` before `before`, or at the end when `before` is `None`.
    ///
    /// `before` must be a child of this element and of the same node type as
    /// `child`. A `child` already in a tree is moved. All checks happen
    /// before anything is mutated.
    pub fn insert_before(&self, child: &Node, before: Option<&Node>) -> Result<(), DomError> {
        if let Some(before) = before {
            if before.node_type() != child.node_type() {
                return Err(DomError::InvalidNodeType {
                    child: child.node_type(),
                    reference: before.node_type(),
                });
            }
            if self.0.index_of_child(before).is_none() {
                return Err(DomError::NotFound);
            }
            if before == child {
                return Ok(());
            }
        }
        if child.is_inclusive_ancestor_of(&self.0) {
            return Err(DomError::HierarchyRequest);
        }

        if let Some(old_parent) = child.parent_node() {
            old_parent.remove_child(child)?;
        }

        let position = before
            .and_then(|b| self.0.index_of_child(b))
            .unwrap_or_else(|| self.0.child_count());
        self.0.attach(child, position);

        match child.as_element() {
            Some(element) => {
                let index = self.0.child_nodes()[..position]
                    .iter()
                    .filter(|n| n.is_element())
                    .count();
                self.mirror_insert(&element, index)
            }
            None => {
                self.update_text();
                Ok(())
            }
        }
    }

    /// Insert an element at `index` among the element children.
    ///
    /// `index == children().len()` appends. The node is placed in the full
    /// child list just before the element currently at `index`, as with
    /// [`insert_before`](Self::insert_before). When `child` already sits
    /// earlier in this element, it is detached first, so it ends up at
    /// `index - 1`.
    pub fn insert_child_element(&self, child: &Self, index: usize) -> Result<(), DomError> {
        let reference = {
            let children = self.data().children.borrow();
            if index > children.len() {
                return Err(DomError::IndexOutOfBounds {
                    index,
                    len: children.len(),
                });
            }
            children.get(index).cloned()
        };
        self.insert_before(child, reference.as_ref().map(Self::as_node))
    }

    /// Append a node.
    pub fn append_child(&self, child: &Node) -> Result<(), DomError> {
        self.insert_before(child, None)
    }

    /// Detach `child` and return it.
    ///
    /// For an element the backing box is removed from this element's box
    /// and parity is verified. It stays alive until the last handle drops.
    pub fn remove_child(&self, child: &Node) -> Result<Node, DomError> {
        self.0.detach(child).ok_or(DomError::NotFound)?;
        match child.as_element() {
            Some(element) => {
                {
                    let mut children = self.data().children.borrow_mut();
                    if let Some(i) = children.iter().position(|c| c == &element) {
                        children.remove(i);
                    }
                }
                let (parent, removed) = (self.box_id(), element.box_id());
                self.document()
                    .with_engine_mut(|engine| engine.remove_child(parent, removed));
                tracing::debug!(%parent, child = %removed, "removed element");
                self.check_consistency()?;
            }
            None => self.update_text(),
        }
        Ok(child.clone())
    }

    fn mirror_insert(&self, child: &Self, index: usize) -> Result<(), DomError> {
        self.data().children.borrow_mut().insert(index, child.clone());
        let (parent, inserted) = (self.box_id(), child.box_id());
        self.document()
            .with_engine_mut(|engine| engine.insert_child(parent, inserted, index));
        tracing::debug!(%parent, child = %inserted, index, "inserted element");
        self.check_consistency()
    }

    /// Verify that the element children and the native children agree.
    pub fn check_consistency(&self) -> Result<(), DomError> {
        let children = self.data().children.borrow();
        let parent = self.box_id();
        let fault = self.document().with_engine(|engine| {
            let native = engine.child_count(parent);
            if native != children.len() {
                return Some(ParityFault::ChildCount {
                    logical: children.len(),
                    native,
                });
            }
            children.iter().enumerate().find_map(|(index, child)| {
                let native = engine.child_at(parent, index);
                (native != Some(child.box_id())).then(|| ParityFault::ChildMismatch {
                    index,
                    logical: child.box_id(),
                    native,
                })
            })
        });
        match fault {
            None => Ok(()),
            Some(fault) => {
                tracing::error!(%parent, %fault, "tree parity violated");
                Err(DomError::ParityViolation(fault))
            }
        }
    }

    /// Recompute the aggregate text from the text children and push it to the box.
    pub(crate) fn update_text(&self) {
        let text = self.0.collect_text();
        let id = self.box_id();
        self.document()
            .with_engine_mut(|engine| engine.set_text_content(id, &text));
        *self.data().text.borrow_mut() = text;
    }

    // --- events ---

    /// Register a listener. `None` is ignored.
    pub fn add_event_listener(
        &self,
        event_type: &str,
        listener: impl Into<Option<Listener>>,
        use_capture: bool,
    ) {
        self.data()
            .listeners
            .borrow_mut()
            .add(event_type, listener, use_capture);
    }

    /// Remove the first registration matching `listener` and `use_capture`.
    pub fn remove_event_listener<'a>(
        &self,
        event_type: &str,
        listener: impl Into<Option<&'a Listener>>,
        use_capture: bool,
    ) -> bool {
        self.data()
            .listeners
            .borrow_mut()
            .remove(event_type, listener, use_capture)
    }

    /// The listener registry.
    pub fn listeners(&self) -> Ref<'_, ListenerRegistry> {
        self.data().listeners.borrow()
    }

    pub(crate) fn listener_snapshot(&self, event_type: &str, capture: bool) -> ListenerSnapshot {
        self.data().listeners.borrow().matching(event_type, capture)
    }

    /// Dispatch `event` with this element as target.
    ///
    /// Returns `Ok(false)` if a listener called
    /// [`prevent_default`](Event::prevent_default) on a cancelable event.
    pub fn dispatch_event(&self, event: &mut Event) -> Result<bool, DomError> {
        dispatch::dispatch(self, event)
    }

    pub(crate) fn install_wheel_scroll(&self) {
        let weak = self.downgrade();
        let listener = Listener::new(move |event| {
            let Some(element) = weak.upgrade() else {
                return Ok(());
            };
            if !element.wheel_scroll() {
                return Ok(());
            }
            let delta = event.wheel_event().map_or(0.0, |w| w.delta_y());
            element.set_scroll_top(element.scroll_top() + delta);
            element.dispatch_event(&mut Event::custom("scroll"))?;
            Ok(())
        });
        self.add_event_listener("mousewheel", listener, false);
    }

    // --- style ---

    /// Apply a style object, partitioned by interaction state.
    ///
    /// Properties not mentioned keep their current values; `Null` unsets.
    pub fn set_style(&self, style: &StyleObject) -> Result<(), DomError> {
        style::apply(self, style)
    }

    /// Property-level access to the default-state style.
    pub fn style(&self) -> StyleDeclaration<'_> {
        StyleDeclaration::new(self)
    }

    /// Native style registered for `state`.
    pub fn get_style(&self, state: InteractionState) -> Option<NativeStyle> {
        let id = self.box_id();
        self.document().with_engine(|engine| engine.style(id, state))
    }

    pub(crate) fn merge_native_style(&self, update: &NativeStyle, state: InteractionState) {
        let id = self.box_id();
        self.document().with_engine_mut(|engine| {
            let mut merged = engine.style(id, state).unwrap_or_default();
            for (name, value) in update.iter() {
                merged.set(name, value.clone());
            }
            engine.set_style(id, &merged, state);
        });
    }

    pub(crate) fn replace_native_style(&self, style: &NativeStyle, state: InteractionState) {
        let id = self.box_id();
        self.document()
            .with_engine_mut(|engine| engine.set_style(id, style, state));
    }

    /// Current interaction state of the box.
    pub fn state(&self) -> InteractionState {
        let id = self.box_id();
        self.document().with_engine(|engine| engine.state(id))
    }

    /// Change the interaction state of the box.
    pub fn set_state(&self, state: InteractionState) {
        let id = self.box_id();
        self.document()
            .with_engine_mut(|engine| engine.set_state(id, state));
    }

    // --- geometry ---

    /// Whether the screen point is inside this element's box.
    pub fn hit(&self, point: Point) -> bool {
        let id = self.box_id();
        self.document().with_engine(|engine| engine.hit(id, point))
    }

    /// Deepest element in this subtree under the screen point.
    pub fn search(&self, point: Point) -> Option<Self> {
        let id = self.box_id();
        let found = self.document().with_engine(|engine| engine.search(id, point))?;
        self.document().element_for_box(found)
    }

    /// Screen point in this element's client space.
    pub fn to_client(&self, point: Point) -> Point {
        let id = self.box_id();
        self.document().with_engine(|engine| engine.to_client(id, point))
    }

    /// Screen point in this element's offset space.
    pub fn to_offset(&self, point: Point) -> Point {
        let id = self.box_id();
        self.document().with_engine(|engine| engine.to_offset(id, point))
    }

    /// Text the engine lays out in this box.
    pub fn text_content(&self) -> String {
        let id = self.box_id();
        self.document().with_engine(|engine| engine.text_content(id))
    }

    /// Overwrite the text the engine lays out in this box.
    pub fn set_text_content(&self, text: &str) {
        let id = self.box_id();
        self.document()
            .with_engine_mut(|engine| engine.set_text_content(id, text));
    }

    // --- scrolling ---

    /// Scroll offsets and extents.
    pub fn scroll_metrics(&self) -> ScrollMetrics {
        let id = self.box_id();
        self.document().with_engine(|engine| engine.scroll_metrics(id))
    }

    /// Vertical scroll offset.
    pub fn scroll_top(&self) -> f64 {
        self.scroll_metrics().scroll_top
    }

    /// Set the vertical scroll offset.
    pub fn set_scroll_top(&self, value: f64) {
        let id = self.box_id();
        self.document()
            .with_engine_mut(|engine| engine.set_scroll_top(id, value));
    }

    /// Horizontal scroll offset.
    pub fn scroll_left(&self) -> f64 {
        self.scroll_metrics().scroll_left
    }

    /// Set the horizontal scroll offset.
    pub fn set_scroll_left(&self, value: f64) {
        let id = self.box_id();
        self.document()
            .with_engine_mut(|engine| engine.set_scroll_left(id, value));
    }

    /// Scrollable content width.
    pub fn scroll_width(&self) -> f64 {
        self.scroll_metrics().scroll_width
    }

    /// Scrollable content height.
    pub fn scroll_height(&self) -> f64 {
        self.scroll_metrics().scroll_height
    }

    /// Width of the client area.
    pub fn client_width(&self) -> f64 {
        self.scroll_metrics().client_width
    }

    /// Height of the client area.
    pub fn client_height(&self) -> f64 {
        self.scroll_metrics().client_height
    }

    /// Largest vertical scroll offset.
    pub fn scroll_top_max(&self) -> f64 {
        self.scroll_metrics().scroll_top_max()
    }

    /// Largest horizontal scroll offset.
    pub fn scroll_left_max(&self) -> f64 {
        self.scroll_metrics().scroll_left_max()
    }
}

/// A non-owning element handle, obtained from [`Element::downgrade`].
///
/// Listeners that need their own element should capture one of these (or
/// use [`Event::current_target`]); a strong [`Element`] captured by a
/// listener registered on that same element forms a cycle and the box is
/// never released.
#[derive(Clone, Default)]
pub struct WeakElement(Weak<NodeInner>);

impl WeakElement {
    /// The element, if it is still alive.
    pub fn upgrade(&self) -> Option<Element> {
        Node::upgrade(&self.0).map(Element)
    }
}

impl fmt::Debug for WeakElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(element) => f.debug_tuple("WeakElement").field(&element.box_id()).finish(),
            None => f.write_str("WeakElement(dropped)"),
        }
    }
}

impl core::ops::Deref for Element {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.0
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        element.0
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;
    use alloc::rc::Rc;

    use boxdom_native::{LayoutEngine, RetainedEngine};

    use crate::{Document, DomError, NodeType};

    fn doc() -> (Rc<RefCell<RetainedEngine>>, Document) {
        let engine = Rc::new(RefCell::new(RetainedEngine::new()));
        (engine.clone(), Document::new(engine))
    }

    #[test]
    fn insert_before_places_elements_in_order() {
        let (engine, doc) = doc();
        let parent = doc.create_element("Div");
        let a = doc.create_element("Div");
        let b = doc.create_element("Div");
        let c = doc.create_element("Div");
        parent.append_child(&a).unwrap();
        parent.append_child(&c).unwrap();
        parent.insert_before(&b, Some(c.as_node())).unwrap();
        assert_eq!(parent.children(), vec![a.clone(), b.clone(), c.clone()]);
        let native = engine.borrow().children(parent.box_id()).to_vec();
        assert_eq!(native, vec![a.box_id(), b.box_id(), c.box_id()]);
    }

    #[test]
    fn element_index_skips_text_nodes() {
        let (engine, doc) = doc();
        let parent = doc.create_element("Div");
        let t = doc.create_text_node("x");
        let a = doc.create_element("Div");
        let b = doc.create_element("Div");
        parent.append_child(&a).unwrap();
        parent.append_child(&t).unwrap();
        parent.append_child(&b).unwrap();
        let c = doc.create_element("Div");
        parent.insert_child_element(&c, 1).unwrap();
        assert_eq!(parent.children(), vec![a.clone(), c.clone(), b.clone()]);
        assert_eq!(parent.child_nodes()[2], *c.as_node());
        assert_eq!(engine.borrow().child_at(parent.box_id(), 1), Some(c.box_id()));
        assert!(matches!(
            parent.insert_child_element(&doc.create_element("Div"), 9),
            Err(DomError::IndexOutOfBounds { index: 9, len: 3 })
        ));
    }

    #[test]
    fn moving_forward_within_a_parent_lands_before_the_reference() {
        let (engine, doc) = doc();
        let parent = doc.create_element("Div");
        let [a, b, c] = [(); 3].map(|()| doc.create_element("Div"));
        for el in [&a, &b, &c] {
            parent.append_child(el).unwrap();
        }
        parent.insert_child_element(&a, 2).unwrap();
        assert_eq!(parent.children(), vec![b.clone(), a.clone(), c.clone()]);
        let native = engine.borrow().children(parent.box_id()).to_vec();
        assert_eq!(native, vec![b.box_id(), a.box_id(), c.box_id()]);
    }

    #[test]
    fn moving_between_parents_keeps_both_in_parity() {
        let (engine, doc) = doc();
        let p1 = doc.create_element("Div");
        let p2 = doc.create_element("Div");
        let child = doc.create_element("Div");
        p1.append_child(&child).unwrap();
        p2.append_child(&child).unwrap();
        assert!(p1.children().is_empty());
        assert_eq!(p2.children(), vec![child.clone()]);
        assert_eq!(child.parent_node(), Some(p2.clone()));
        assert_eq!(engine.borrow().child_count(p1.box_id()), 0);
        assert_eq!(engine.borrow().parent_of(child.box_id()), Some(p2.box_id()));
    }

    #[test]
    fn cannot_insert_ancestor() {
        let (_engine, doc) = doc();
        let outer = doc.create_element("Div");
        let inner = doc.create_element("Div");
        outer.append_child(&inner).unwrap();
        assert!(matches!(
            inner.append_child(&outer),
            Err(DomError::HierarchyRequest)
        ));
        assert!(matches!(
            outer.append_child(&outer),
            Err(DomError::HierarchyRequest)
        ));
    }

    #[test]
    fn reference_must_be_a_child() {
        let (_engine, doc) = doc();
        let parent = doc.create_element("Div");
        let stranger = doc.create_element("Div");
        let child = doc.create_element("Div");
        assert!(matches!(
            parent.insert_before(&child, Some(stranger.as_node())),
            Err(DomError::NotFound)
        ));
        assert!(child.parent_node().is_none());
        assert!(matches!(parent.remove_child(&child), Err(DomError::NotFound)));
    }

    #[test]
    fn type_mismatch_is_reported_with_both_types() {
        let (_engine, doc) = doc();
        let parent = doc.create_element("Div");
        let text = doc.create_text_node("t");
        parent.append_child(&text).unwrap();
        let err = parent
            .insert_before(&doc.create_element("Div"), Some(text.as_node()))
            .unwrap_err();
        assert!(matches!(
            err,
            DomError::InvalidNodeType {
                child: NodeType::Element,
                reference: NodeType::Text
            }
        ));
    }

    #[test]
    fn insert_before_self_is_a_noop() {
        let (_engine, doc) = doc();
        let parent = doc.create_element("Div");
        let a = doc.create_element("Div");
        parent.append_child(&a).unwrap();
        parent.insert_before(&a, Some(a.as_node())).unwrap();
        assert_eq!(parent.children(), vec![a]);
    }

    #[test]
    fn dropping_removed_subtree_releases_boxes() {
        let (engine, doc) = doc();
        let root = doc.create_element("Div");
        {
            let child = doc.create_element("Div");
            let grandchild = doc.create_element("Div");
            child.append_child(&grandchild).unwrap();
            root.append_child(&child).unwrap();
        }
        assert_eq!(engine.borrow().len(), 3);
        let child = root.first_child().unwrap();
        root.remove_child(&child).unwrap();
        assert_eq!(engine.borrow().len(), 3);
        drop(child);
        assert_eq!(engine.borrow().len(), 1);
    }

    #[test]
    fn text_content_tracks_text_children() {
        let (_engine, doc) = doc();
        let el = doc.create_element("Span");
        let hello = doc.create_text_node("hello");
        el.append_child(&hello).unwrap();
        el.append_child(&doc.create_text_node(" world")).unwrap();
        assert_eq!(el.text(), "hello world");
        assert_eq!(el.text_content(), "hello world");
        hello.set_data("goodbye");
        assert_eq!(el.text_content(), "goodbye world");
    }
}

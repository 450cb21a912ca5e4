// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shadow-sync behavior: parity after mutations, text aggregation, faults.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use boxdom::kurbo::Point;
use boxdom::{
    BoxId, Document, DomError, Element, Event, InteractionState, LayoutEngine, Listener,
    NativeStyle, NodeType, ParityFault, RetainedEngine, ScrollMetrics,
};

fn setup() -> (Rc<RefCell<RetainedEngine>>, Document) {
    let engine = Rc::new(RefCell::new(RetainedEngine::new()));
    let doc = Document::new(engine.clone());
    (engine, doc)
}

fn assert_parity(engine: &RefCell<RetainedEngine>, element: &Element) {
    let logical: Vec<BoxId> = element.children().iter().map(Element::box_id).collect();
    let engine = engine.borrow();
    assert_eq!(engine.children(element.box_id()), logical.as_slice());
    assert_eq!(engine.child_count(element.box_id()), logical.len());
}

#[test]
fn parity_holds_across_a_mutation_sequence() {
    let (engine, doc) = setup();
    let root = doc.create_element("Div");
    let items: Vec<Element> = (0..6).map(|_| doc.create_element("Item")).collect();

    root.append_child(&items[0]).unwrap();
    assert_parity(&engine, &root);
    root.append_child(&doc.create_text_node("label")).unwrap();
    root.append_child(&items[1]).unwrap();
    assert_parity(&engine, &root);
    root.insert_before(&items[2], Some(items[0].as_node())).unwrap();
    assert_parity(&engine, &root);
    root.insert_child_element(&items[3], 2).unwrap();
    assert_parity(&engine, &root);
    root.remove_child(&items[0]).unwrap();
    assert_parity(&engine, &root);
    root.append_child(&items[2]).unwrap();
    assert_parity(&engine, &root);
    root.insert_child_element(&items[4], 0).unwrap();
    root.insert_child_element(&items[5], root.child_element_count()).unwrap();
    assert_parity(&engine, &root);

    assert_eq!(
        root.children(),
        vec![
            items[4].clone(),
            items[3].clone(),
            items[1].clone(),
            items[2].clone(),
            items[5].clone()
        ]
    );
    root.check_consistency().unwrap();
}

#[test]
fn node_type_mismatch_leaves_tree_unchanged() {
    let (engine, doc) = setup();
    let parent = doc.create_element("Div");
    let existing = doc.create_element("Div");
    let text = doc.create_text_node("t");
    parent.append_child(&existing).unwrap();
    parent.append_child(&text).unwrap();

    let newcomer = doc.create_element("Div");
    let err = parent
        .insert_before(&newcomer, Some(text.as_node()))
        .unwrap_err();
    assert!(matches!(
        err,
        DomError::InvalidNodeType {
            child: NodeType::Element,
            reference: NodeType::Text
        }
    ));

    let stray = doc.create_text_node("s");
    assert!(matches!(
        parent.insert_before(&stray, Some(existing.as_node())),
        Err(DomError::InvalidNodeType { .. })
    ));

    assert_eq!(parent.child_count(), 2);
    assert_eq!(parent.children(), vec![existing]);
    assert!(newcomer.parent_node().is_none());
    assert!(stray.parent_node().is_none());
    assert_eq!(parent.text(), "t");
    assert_parity(&engine, &parent);
}

#[test]
fn text_aggregates_in_document_order() {
    let (engine, doc) = setup();
    let el = doc.create_element("Text");
    let a = doc.create_text_node("a");
    let b = doc.create_text_node("b");
    let c = doc.create_text_node("c");
    el.append_child(&a).unwrap();
    el.append_child(&b).unwrap();
    el.append_child(&c).unwrap();
    assert_eq!(el.text(), "abc");
    assert_eq!(engine.borrow().text_content(el.box_id()), "abc");

    el.remove_child(&b).unwrap();
    assert_eq!(el.text(), "ac");
    assert_eq!(engine.borrow().text_content(el.box_id()), "ac");

    el.insert_before(&b, Some(a.as_node())).unwrap();
    assert_eq!(el.text(), "bac");
    assert_eq!(engine.borrow().child_count(el.box_id()), 0);
}

#[test]
fn text_interleaved_with_elements_ignores_elements() {
    let (_engine, doc) = setup();
    let el = doc.create_element("Div");
    el.append_child(&doc.create_text_node("x")).unwrap();
    el.append_child(&doc.create_element("Div")).unwrap();
    el.append_child(&doc.create_text_node("y")).unwrap();
    assert_eq!(el.text(), "xy");
}

#[test]
fn sibling_accessors_span_all_node_types() {
    let (_engine, doc) = setup();
    let el = doc.create_element("Div");
    let a = doc.create_element("Div");
    let t = doc.create_text_node("t");
    let b = doc.create_element("Div");
    for n in [a.as_node(), t.as_node(), b.as_node()] {
        el.append_child(n).unwrap();
    }
    assert_eq!(a.next_sibling().as_ref(), Some(t.as_node()));
    assert_eq!(b.previous_sibling().as_ref(), Some(t.as_node()));
    assert_eq!(a.previous_sibling(), None);
    assert_eq!(el.first_child().as_ref(), Some(a.as_node()));
    assert_eq!(el.last_child().as_ref(), Some(b.as_node()));
    assert_eq!(b.get_path(), vec![el.clone(), b.clone()]);
}

/// Delegates to a [`RetainedEngine`] but can be told to lose insertions.
struct LossyEngine {
    inner: RetainedEngine,
    drop_inserts: Cell<bool>,
}

impl LayoutEngine for LossyEngine {
    fn create_box(&mut self, kind: &str) -> BoxId {
        self.inner.create_box(kind)
    }
    fn release_box(&mut self, id: BoxId) {
        self.inner.release_box(id);
    }
    fn insert_child(&mut self, parent: BoxId, child: BoxId, index: usize) {
        if !self.drop_inserts.get() {
            self.inner.insert_child(parent, child, index);
        }
    }
    fn remove_child(&mut self, parent: BoxId, child: BoxId) {
        self.inner.remove_child(parent, child);
    }
    fn child_count(&self, parent: BoxId) -> usize {
        self.inner.child_count(parent)
    }
    fn child_at(&self, parent: BoxId, index: usize) -> Option<BoxId> {
        self.inner.child_at(parent, index)
    }
    fn set_style(&mut self, id: BoxId, style: &NativeStyle, state: InteractionState) {
        self.inner.set_style(id, style, state);
    }
    fn style(&self, id: BoxId, state: InteractionState) -> Option<NativeStyle> {
        self.inner.style(id, state)
    }
    fn state(&self, id: BoxId) -> InteractionState {
        self.inner.state(id)
    }
    fn set_state(&mut self, id: BoxId, state: InteractionState) {
        self.inner.set_state(id, state);
    }
    fn hit(&self, id: BoxId, point: Point) -> bool {
        self.inner.hit(id, point)
    }
    fn search(&self, id: BoxId, point: Point) -> Option<BoxId> {
        self.inner.search(id, point)
    }
    fn to_client(&self, id: BoxId, point: Point) -> Point {
        self.inner.to_client(id, point)
    }
    fn to_offset(&self, id: BoxId, point: Point) -> Point {
        self.inner.to_offset(id, point)
    }
    fn scroll_metrics(&self, id: BoxId) -> ScrollMetrics {
        self.inner.scroll_metrics(id)
    }
    fn set_scroll_top(&mut self, id: BoxId, value: f64) {
        self.inner.set_scroll_top(id, value);
    }
    fn set_scroll_left(&mut self, id: BoxId, value: f64) {
        self.inner.set_scroll_left(id, value);
    }
    fn text_content(&self, id: BoxId) -> String {
        self.inner.text_content(id)
    }
    fn set_text_content(&mut self, id: BoxId, text: &str) {
        self.inner.set_text_content(id, text);
    }
}

#[test]
fn lost_insertion_is_a_parity_violation() {
    let engine = Rc::new(RefCell::new(LossyEngine {
        inner: RetainedEngine::new(),
        drop_inserts: Cell::new(false),
    }));
    let doc = Document::new(engine.clone());
    let parent = doc.create_element("Div");
    parent.append_child(&doc.create_element("Div")).unwrap();

    engine.borrow().drop_inserts.set(true);
    let err = parent.append_child(&doc.create_element("Div")).unwrap_err();
    assert!(matches!(
        err,
        DomError::ParityViolation(ParityFault::ChildCount {
            logical: 2,
            native: 1
        })
    ));
    // Not resynchronized.
    assert_eq!(parent.child_element_count(), 2);
    assert!(parent.check_consistency().is_err());
}

#[test]
fn reordered_native_children_are_a_mismatch() {
    let (engine, doc) = setup();
    let parent = doc.create_element("Div");
    let a = doc.create_element("Div");
    let b = doc.create_element("Div");
    parent.append_child(&a).unwrap();
    parent.append_child(&b).unwrap();

    // Reorder behind the DOM's back.
    engine.borrow_mut().insert_child(parent.box_id(), b.box_id(), 0);
    let err = parent.check_consistency().unwrap_err();
    assert!(matches!(
        err,
        DomError::ParityViolation(ParityFault::ChildMismatch { index: 0, .. })
    ));
}

#[test]
fn removal_keeps_box_until_last_handle_drops() {
    let (engine, doc) = setup();
    let parent = doc.create_element("Div");
    let child = doc.create_element("Div");
    let id = child.box_id();
    parent.append_child(&child).unwrap();
    parent.remove_child(&child).unwrap();
    assert!(engine.borrow().is_alive(id));
    assert_eq!(engine.borrow().parent_of(id), None);
    drop(child);
    assert!(!engine.borrow().is_alive(id));
    assert!(doc.element_for_box(id).is_none());
}

#[test]
fn attached_children_outlive_their_handles() {
    let (engine, doc) = setup();
    let parent = doc.create_element("Div");
    let id = {
        let child = doc.create_element("Div");
        parent.append_child(&child).unwrap();
        child.box_id()
    };
    assert!(engine.borrow().is_alive(id));
    assert_eq!(parent.children()[0].box_id(), id);
}

#[test]
fn self_listeners_with_weak_handles_do_not_pin_the_box() {
    let (engine, doc) = setup();
    let parent = doc.create_element("Div");
    let child = doc.create_element("Div");
    let id = child.box_id();
    parent.append_child(&child).unwrap();

    let hits = Rc::new(Cell::new(0));
    let me = child.downgrade();
    let h = hits.clone();
    child.add_event_listener(
        "ping",
        Listener::from_fn(move |_| {
            if let Some(me) = me.upgrade() {
                h.set(h.get() + me.child_element_count() + 1);
            }
        }),
        false,
    );
    let h = hits.clone();
    child.add_event_listener(
        "ping",
        Listener::from_fn(move |e| {
            if e.current_target().is_some() {
                h.set(h.get() + 1);
            }
        }),
        false,
    );
    child.dispatch_event(&mut Event::custom("ping")).unwrap();
    assert_eq!(hits.get(), 2);

    let weak = child.downgrade();
    parent.remove_child(&child).unwrap();
    drop(child);
    assert!(weak.upgrade().is_none());
    assert!(!engine.borrow().is_alive(id));
    assert_eq!(engine.borrow().len(), 1);
}

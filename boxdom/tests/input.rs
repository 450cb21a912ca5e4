// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input bridge: hover, press, click, focus and keyboard routing.

use std::cell::RefCell;
use std::rc::Rc;

use boxdom::kurbo::{Point, Rect, Size, Vec2};
use boxdom::{
    Document, Element, InputBridge, InteractionState, KeyboardEventInit, Listener, RetainedEngine,
};

type Log = Rc<RefCell<Vec<String>>>;

struct Scene {
    engine: Rc<RefCell<RetainedEngine>>,
    root: Element,
    left: Element,
    right: Element,
    log: Log,
}

/// A 200×200 root with two 50×50 children side by side.
fn scene() -> Scene {
    let engine = Rc::new(RefCell::new(RetainedEngine::new()));
    let doc = Document::new(engine.clone());
    let root = doc.create_element("Root");
    let left = doc.create_element("Div");
    let right = doc.create_element("Div");
    root.append_child(&left).unwrap();
    root.append_child(&right).unwrap();
    {
        let mut e = engine.borrow_mut();
        e.set_frame(root.box_id(), Rect::new(0.0, 0.0, 200.0, 200.0));
        e.set_frame(left.box_id(), Rect::new(10.0, 10.0, 60.0, 60.0));
        e.set_frame(right.box_id(), Rect::new(100.0, 10.0, 150.0, 60.0));
    }
    let log = Log::default();
    for (el, name) in [(&root, "root"), (&left, "left"), (&right, "right")] {
        for ty in [
            "mouseover", "mouseout", "mousedown", "mouseup", "click", "focusin", "focusout",
            "keydown", "mousewheel",
        ] {
            let log = log.clone();
            let name = name.to_owned();
            el.add_event_listener(
                ty,
                Listener::from_fn(move |e| {
                    // Only record at the target to keep logs short.
                    if e.current_target() == e.target() {
                        log.borrow_mut().push(format!("{}@{name}", e.event_type()));
                    }
                }),
                false,
            );
        }
    }
    Scene {
        engine,
        root,
        left,
        right,
        log,
    }
}

fn take(log: &Log) -> Vec<String> {
    core::mem::take(&mut *log.borrow_mut())
}

#[test]
fn hover_moves_between_siblings() {
    let s = scene();
    let mut input = InputBridge::new(s.root.clone());

    input.pointer_move(Point::new(20.0, 20.0), 0).unwrap();
    assert_eq!(input.hovered(), Some(&s.left));
    assert_eq!(take(&s.log), ["mouseover@left"]);
    assert_eq!(s.left.state(), InteractionState::Hover);
    assert_eq!(s.root.state(), InteractionState::Hover);

    input.pointer_move(Point::new(120.0, 20.0), 0).unwrap();
    assert_eq!(take(&s.log), ["mouseout@left", "mouseover@right"]);
    assert_eq!(s.left.state(), InteractionState::Default);
    assert_eq!(s.right.state(), InteractionState::Hover);
    assert_eq!(s.root.state(), InteractionState::Hover);

    input.pointer_move(Point::new(120.0, 30.0), 0).unwrap();
    assert!(take(&s.log).is_empty());

    input.pointer_move(Point::new(500.0, 500.0), 0).unwrap();
    assert_eq!(take(&s.log), ["mouseout@right"]);
    assert_eq!(input.hovered(), None);
    assert_eq!(s.root.state(), InteractionState::Default);
}

#[test]
fn click_requires_release_over_pressed_element() {
    let s = scene();
    let mut input = InputBridge::new(s.root.clone());

    input.pointer_down(Point::new(20.0, 20.0), 0).unwrap();
    assert_eq!(s.left.state(), InteractionState::Active);
    assert_eq!(input.pressed(), Some(&s.left));
    input.pointer_up(Point::new(25.0, 25.0), 0).unwrap();
    assert_eq!(take(&s.log), ["mousedown@left", "mouseup@left", "click@left"]);
    assert_eq!(s.left.state(), InteractionState::Default);
    assert!(input.pressed().is_none());

    input.pointer_down(Point::new(20.0, 20.0), 0).unwrap();
    input.pointer_up(Point::new(120.0, 20.0), 0).unwrap();
    assert_eq!(take(&s.log), ["mousedown@left", "mouseup@right"]);
}

#[test]
fn press_focuses_nearest_focusable_ancestor() {
    let s = scene();
    s.root.set_focusable(true);
    s.right.set_focusable(true);
    let mut input = InputBridge::new(s.root.clone());

    input.pointer_down(Point::new(20.0, 20.0), 0).unwrap();
    assert_eq!(input.focused(), Some(&s.root));
    input.pointer_up(Point::new(20.0, 20.0), 0).unwrap();
    take(&s.log);

    input.pointer_down(Point::new(120.0, 20.0), 0).unwrap();
    assert_eq!(input.focused(), Some(&s.right));
    assert_eq!(
        take(&s.log),
        ["mousedown@right", "focusout@root", "focusin@right"]
    );
    input.pointer_up(Point::new(120.0, 20.0), 0).unwrap();
    assert_eq!(s.right.state(), InteractionState::Focus);

    input.pointer_down(Point::new(500.0, 500.0), 0).unwrap();
    assert!(input.focused().is_none());
    assert_eq!(s.right.state(), InteractionState::Default);
}

#[test]
fn focus_events_carry_the_other_element() {
    let s = scene();
    let mut input = InputBridge::new(s.root.clone());
    let related = Rc::new(RefCell::new(Vec::new()));
    for el in [&s.left, &s.right] {
        let related = related.clone();
        for ty in ["focusin", "focusout"] {
            let related = related.clone();
            el.add_event_listener(
                ty,
                Listener::from_fn(move |e| {
                    let other = e.focus_event().and_then(|f| f.related_target().cloned());
                    related.borrow_mut().push((e.event_type().to_owned(), other));
                }),
                false,
            );
        }
    }
    input.set_focus(Some(s.left.clone())).unwrap();
    input.set_focus(Some(s.right.clone())).unwrap();
    let related = related.borrow();
    assert_eq!(related[0], ("focusin".to_owned(), None));
    assert_eq!(related[1], ("focusout".to_owned(), Some(s.right.clone())));
    assert_eq!(related[2], ("focusin".to_owned(), Some(s.left.clone())));
}

#[test]
fn keys_go_to_focus_or_root() {
    let s = scene();
    let mut input = InputBridge::new(s.root.clone());
    let key = || KeyboardEventInit {
        key: "a".into(),
        code: "KeyA".into(),
        ..Default::default()
    };

    input.key_down(key()).unwrap();
    assert_eq!(take(&s.log), ["keydown@root"]);

    input.set_focus(Some(s.left.clone())).unwrap();
    take(&s.log);
    input.key_down(key()).unwrap();
    input.key_up(key()).unwrap();
    assert_eq!(take(&s.log), ["keydown@left"]);
}

#[test]
fn wheel_scrolls_the_element_under_the_pointer() {
    let s = scene();
    s.engine
        .borrow_mut()
        .set_content_size(s.left.box_id(), Size::new(50.0, 300.0));
    let mut input = InputBridge::new(s.root.clone());
    input.wheel(Point::new(20.0, 20.0), Vec2::new(0.0, 25.0)).unwrap();
    assert_eq!(take(&s.log), ["mousewheel@left"]);
    assert_eq!(s.left.scroll_top(), 25.0);
    assert_eq!(s.root.scroll_top(), 0.0);
}

#[test]
fn removed_focus_falls_back_to_root() {
    let s = scene();
    let mut input = InputBridge::new(s.root.clone());
    input.set_focus(Some(s.left.clone())).unwrap();
    take(&s.log);

    let id = s.left.box_id();
    let Scene { engine, root, left, right: _right, log } = s;
    root.remove_child(&left).unwrap();
    drop(left);

    input.key_down(KeyboardEventInit::default()).unwrap();
    assert_eq!(take(&log), ["keydown@root"]);
    assert!(input.focused().is_none());
    assert!(!engine.borrow().is_alive(id));
}

#[test]
fn removed_hover_target_is_left_quietly() {
    let s = scene();
    let mut input = InputBridge::new(s.root.clone());
    input.pointer_move(Point::new(20.0, 20.0), 0).unwrap();
    input.pointer_down(Point::new(20.0, 20.0), 0).unwrap();
    take(&s.log);

    s.root.remove_child(&s.left).unwrap();
    input.pointer_move(Point::new(120.0, 20.0), 0).unwrap();
    assert_eq!(take(&s.log), ["mouseover@right"]);
    assert!(input.pressed().is_none());
    assert_eq!(input.hovered(), Some(&s.right));
}

#[test]
fn hover_stops_at_the_bridge_root() {
    let s = scene();
    let doc = s.root.document().clone();
    let outer = doc.create_element("Window");
    s.engine
        .borrow_mut()
        .set_frame(outer.box_id(), Rect::new(0.0, 0.0, 400.0, 400.0));
    outer.append_child(&s.root).unwrap();

    let mut input = InputBridge::new(s.root.clone());
    input.pointer_move(Point::new(20.0, 20.0), 0).unwrap();
    assert_eq!(s.root.state(), InteractionState::Hover);
    assert_eq!(outer.state(), InteractionState::Default);

    input.pointer_move(Point::new(500.0, 500.0), 0).unwrap();
    assert_eq!(s.root.state(), InteractionState::Default);
    assert_eq!(outer.state(), InteractionState::Default);
}

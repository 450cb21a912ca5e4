// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boxdom: a browser-like DOM subtree over a native retained-mode layout engine.
//!
//! ## Overview
//!
//! Renderers written against the DOM (`appendChild`, `addEventListener`,
//! `dispatchEvent`, style assignment) drive an [`Element`] tree. Every element
//! owns one box in a [`LayoutEngine`]; the crate keeps the two trees in
//! lock-step and turns DOM-level operations into native calls.
//!
//! - **Shadow sync.** Structural mutations update the logical tree, mirror
//!   the change into the engine, and verify that element children and native
//!   children still agree. A disagreement is a [`DomError::ParityViolation`];
//!   it is reported, never repaired.
//! - **Text.** Text nodes have no native counterpart. Their data is merged
//!   into the parent element's aggregate text, which is pushed to its box.
//! - **Events.** [`Element::dispatch_event`] walks the root→target path
//!   twice: capture listeners root-first, then bubble listeners target-first.
//!   Pointer coordinates of `mousedown`, `mouseup` and `mousemove` are
//!   recomputed for each node that has listeners.
//! - **Wheel scrolling.** Every element scrolls on `mousewheel` by the
//!   vertical delta and then dispatches `scroll` on itself, unless
//!   [`Element::set_wheel_scroll`] turns it off.
//! - **Style.** [`StyleObject`]s are partitioned by interaction state and
//!   normalized (colors, transforms, box shorthands) before reaching the box.
//!
//! ## Example
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use boxdom::{Document, Event, Listener, RetainedEngine};
//!
//! let doc = Document::new(Rc::new(RefCell::new(RetainedEngine::new())));
//! let outer = doc.create_element("Div");
//! let inner = doc.create_element("Div");
//! outer.append_child(&inner).unwrap();
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let l = log.clone();
//! outer.add_event_listener("ping", Listener::from_fn(move |_| l.borrow_mut().push("out")), true);
//! let l = log.clone();
//! inner.add_event_listener("ping", Listener::from_fn(move |_| l.borrow_mut().push("in")), false);
//!
//! inner.dispatch_event(&mut Event::custom("ping")).unwrap();
//! assert_eq!(*log.borrow(), ["out", "in"]);
//! ```
//!
//! ## Threading
//!
//! Everything is single-threaded (`Rc`/`RefCell`). Listeners run
//! synchronously inside [`Element::dispatch_event`] and may dispatch again;
//! each dispatch owns its event and path. Hold no engine borrow across DOM
//! calls.

extern crate alloc;

mod dispatch;
mod document;
mod element;
mod error;
mod event;
mod input;
mod listener;
mod node;
pub mod style;

pub use document::{Document, DocumentConfig};
pub use element::{Element, WeakElement};
pub use error::{DomError, ParityFault};
pub use event::{
    DeltaMode, Event, EventInit, EventPayload, EventPhase, FocusEvent, FocusEventInit, KeyLocation,
    KeyboardEvent, KeyboardEventInit, Modifiers, MouseEvent, MouseEventInit, PayloadKind,
    WheelEvent, WheelEventInit,
};
pub use input::{InputBridge, PathState, PathTransition};
pub use listener::{Listener, ListenerRegistry, ListenerResult};
pub use node::{Node, NodeType, Text};
pub use style::{StyleDeclaration, StyleObject, StyleValue};

pub use boxdom_native::{
    BoxId, InteractionState, LayoutEngine, NativeStyle, NativeValue, RetainedEngine, ScrollMetrics,
};
pub use kurbo;

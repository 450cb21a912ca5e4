// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input bridge: raw pointer and key input to dispatched DOM events.
//!
//! ## Usage
//! 1) Create an [`InputBridge`] rooted at the element that covers the window.
//! 2) Forward platform input to [`pointer_move`](InputBridge::pointer_move),
//!    [`pointer_down`](InputBridge::pointer_down), [`pointer_up`](InputBridge::pointer_up),
//!    [`wheel`](InputBridge::wheel), [`key_down`](InputBridge::key_down) and
//!    [`key_up`](InputBridge::key_up).
//! 3) The bridge hit-tests, dispatches through the normal two-phase engine,
//!    and keeps hover, press and focus interaction states on the boxes.
//!
//! ## Path transitions
//!
//! [`PathState`] computes enter/leave transitions between root→target paths:
//!
//! ```
//! use boxdom::{PathState, PathTransition};
//! let mut hover: PathState<u32> = PathState::new();
//! assert_eq!(
//!     hover.update_path(&[1, 2]),
//!     vec![PathTransition::Enter(1), PathTransition::Enter(2)]
//! );
//! assert_eq!(
//!     hover.update_path(&[1, 3]),
//!     vec![PathTransition::Leave(2), PathTransition::Enter(3)]
//! );
//! ```

use kurbo::{Point, Vec2};

use boxdom_native::InteractionState;

use crate::element::Element;
use crate::error::DomError;
use crate::event::{
    Event, EventInit, FocusEventInit, KeyboardEventInit, Modifiers, MouseEventInit, WheelEventInit,
};

/// A path state machine over root→target paths.
///
/// Leave transitions are emitted inner-most first; enter transitions
/// outer-most first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathState<K: Clone + PartialEq> {
    current: Vec<K>,
}

/// A path transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathTransition<K> {
    /// The path now includes this node.
    Enter(K),
    /// The path no longer includes this node.
    Leave(K),
}

impl<K: Clone + PartialEq> PathState<K> {
    /// Empty state.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// Current root→target path.
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// Inner-most node of the current path.
    pub fn target(&self) -> Option<&K> {
        self.current.last()
    }

    /// Clear the path, returning leave transitions.
    pub fn clear(&mut self) -> Vec<PathTransition<K>> {
        let out = self
            .current
            .iter()
            .rev()
            .cloned()
            .map(PathTransition::Leave)
            .collect();
        self.current.clear();
        out
    }

    /// Move to a new path and return the transitions.
    pub fn update_path(&mut self, new_path: &[K]) -> Vec<PathTransition<K>> {
        let shared = self
            .current
            .iter()
            .zip(new_path)
            .take_while(|(a, b)| a == b)
            .count();

        let mut out = Vec::new();
        out.extend(
            self.current[shared..]
                .iter()
                .rev()
                .cloned()
                .map(PathTransition::Leave),
        );
        out.extend(new_path[shared..].iter().cloned().map(PathTransition::Enter));
        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }
}

/// DOM `buttons` bit for a `button` number.
fn button_mask(button: i16) -> u16 {
    match button {
        0 => 1,
        1 => 4,
        2 => 2,
        3..=15 => 1_u16 << button,
        _ => 0,
    }
}

const POINTER: EventInit = EventInit {
    bubbles: true,
    cancelable: true,
};

/// Turns raw input into events on a tree rooted at one element.
///
/// All methods return `Ok(false)` when a listener prevented the default
/// action of the primary event, and `Ok(true)` otherwise (including when
/// nothing was hit).
#[derive(Debug)]
pub struct InputBridge {
    root: Element,
    hover: PathState<Element>,
    pressed: Option<Element>,
    focused: Option<Element>,
    last_pointer: Option<Point>,
    buttons: u16,
    modifiers: Modifiers,
}

impl InputBridge {
    /// A bridge over the subtree of `root`.
    pub fn new(root: Element) -> Self {
        Self {
            root,
            hover: PathState::new(),
            pressed: None,
            focused: None,
            last_pointer: None,
            buttons: 0,
            modifiers: Modifiers::empty(),
        }
    }

    /// Root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Element under the pointer after the last pointer event.
    pub fn hovered(&self) -> Option<&Element> {
        self.hover.target()
    }

    /// Element that received the last unreleased press.
    pub fn pressed(&self) -> Option<&Element> {
        self.pressed.as_ref()
    }

    /// Focused element.
    ///
    /// An element removed from the root's subtree is forgotten at the next
    /// input call.
    pub fn focused(&self) -> Option<&Element> {
        self.focused.as_ref()
    }

    /// Modifiers applied to subsequent pointer events.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    fn mouse_init(&mut self, screen: Point, button: i16) -> MouseEventInit {
        let movement = self.last_pointer.map_or(Vec2::ZERO, |last| screen - last);
        self.last_pointer = Some(screen);
        MouseEventInit {
            event: POINTER,
            button,
            buttons: self.buttons,
            screen,
            client: screen,
            movement,
            modifiers: self.modifiers,
        }
    }

    fn attached(&self, element: &Element) -> bool {
        self.root.is_inclusive_ancestor_of(element)
    }

    /// Forget elements that left the root's subtree since the last call.
    fn prune_detached(&mut self) {
        if self.focused.as_ref().is_some_and(|f| !self.attached(f)) {
            tracing::debug!("focused element left the tree; focus cleared");
            self.focused = None;
        }
        if self.pressed.as_ref().is_some_and(|p| !self.attached(p)) {
            self.pressed = None;
        }
        let kept = self
            .hover
            .current_path()
            .iter()
            .take_while(|el| self.attached(el))
            .count();
        if kept < self.hover.current_path().len() {
            let path = self.hover.current_path()[..kept].to_vec();
            for transition in self.hover.update_path(&path) {
                if let PathTransition::Leave(el) = transition
                    && el.state() == InteractionState::Hover
                {
                    el.set_state(InteractionState::Default);
                }
            }
        }
    }

    /// Path from the bridge root down to `target`.
    fn path_from_root(&self, target: &Element) -> Vec<Element> {
        let mut path = target.get_path();
        if let Some(start) = path.iter().position(|el| el == &self.root) {
            path.drain(..start);
        }
        path
    }

    fn resting_state(&self, element: &Element) -> InteractionState {
        if self.focused.as_ref() == Some(element) {
            InteractionState::Focus
        } else if self.hover.current_path().contains(element) {
            InteractionState::Hover
        } else {
            InteractionState::Default
        }
    }

    /// Pointer moved to `screen`.
    pub fn pointer_move(&mut self, screen: Point, buttons: u16) -> Result<bool, DomError> {
        let previous = self.hover.target().filter(|p| self.attached(p)).cloned();
        self.prune_detached();
        self.buttons = buttons;
        let init = self.mouse_init(screen, 0);
        let target = self.root.search(screen);
        let path = target
            .as_ref()
            .map(|t| self.path_from_root(t))
            .unwrap_or_default();

        for transition in self.hover.update_path(&path) {
            match transition {
                PathTransition::Leave(el) if el.state() == InteractionState::Hover => {
                    el.set_state(InteractionState::Default);
                }
                PathTransition::Enter(el) if el.state() == InteractionState::Default => {
                    el.set_state(InteractionState::Hover);
                }
                _ => {}
            }
        }

        if previous != target {
            if let Some(previous) = &previous {
                previous.dispatch_event(&mut Event::mouse("mouseout", init.clone()))?;
            }
            if let Some(target) = &target {
                target.dispatch_event(&mut Event::mouse("mouseover", init.clone()))?;
            }
        }

        match target {
            Some(target) => target.dispatch_event(&mut Event::mouse("mousemove", init)),
            None => Ok(true),
        }
    }

    /// Button `button` pressed at `screen`.
    ///
    /// Focus moves to the nearest focusable element at or above the target,
    /// or is cleared when there is none.
    pub fn pointer_down(&mut self, screen: Point, button: i16) -> Result<bool, DomError> {
        self.prune_detached();
        self.buttons |= button_mask(button);
        let init = self.mouse_init(screen, button);
        let Some(target) = self.root.search(screen) else {
            self.set_focus(None)?;
            return Ok(true);
        };

        let proceed = target.dispatch_event(&mut Event::mouse("mousedown", init))?;
        target.set_state(InteractionState::Active);
        self.pressed = Some(target.clone());

        let focus = self
            .path_from_root(&target)
            .into_iter()
            .rev()
            .find(Element::focusable);
        self.set_focus(focus)?;
        Ok(proceed)
    }

    /// Button `button` released at `screen`. Fires `click` when released over
    /// the pressed element.
    pub fn pointer_up(&mut self, screen: Point, button: i16) -> Result<bool, DomError> {
        self.prune_detached();
        self.buttons &= !button_mask(button);
        let init = self.mouse_init(screen, button);
        let target = self.root.search(screen);

        let mut proceed = true;
        if let Some(target) = &target {
            proceed = target.dispatch_event(&mut Event::mouse("mouseup", init.clone()))?;
        }
        if let Some(pressed) = self.pressed.take() {
            pressed.set_state(self.resting_state(&pressed));
            if target.as_ref() == Some(&pressed) {
                proceed &= pressed.dispatch_event(&mut Event::mouse("click", init))?;
            }
        }
        Ok(proceed)
    }

    /// Wheel turned over `screen`.
    pub fn wheel(&mut self, screen: Point, delta: Vec2) -> Result<bool, DomError> {
        self.prune_detached();
        let mouse = self.mouse_init(screen, 0);
        let Some(target) = self.root.search(screen) else {
            return Ok(true);
        };
        target.dispatch_event(&mut Event::wheel(
            "mousewheel",
            WheelEventInit {
                mouse,
                delta_x: delta.x,
                delta_y: delta.y,
                ..Default::default()
            },
        ))
    }

    fn key_target(&mut self) -> Element {
        self.prune_detached();
        self.focused.clone().unwrap_or_else(|| self.root.clone())
    }

    /// Key pressed. Goes to the focused element, or the root.
    pub fn key_down(&mut self, init: KeyboardEventInit) -> Result<bool, DomError> {
        self.modifiers = init.modifiers;
        self.key_target()
            .dispatch_event(&mut Event::keyboard("keydown", init))
    }

    /// Key released. Goes to the focused element, or the root.
    pub fn key_up(&mut self, init: KeyboardEventInit) -> Result<bool, DomError> {
        self.modifiers = init.modifiers;
        self.key_target()
            .dispatch_event(&mut Event::keyboard("keyup", init))
    }

    /// Move focus, firing `focusout` on the old element then `focusin` on the new one.
    pub fn set_focus(&mut self, element: Option<Element>) -> Result<(), DomError> {
        self.prune_detached();
        if self.focused == element {
            return Ok(());
        }
        let old = self.focused.take();
        self.focused = element.clone();
        let init = |related_target| FocusEventInit {
            event: EventInit {
                bubbles: true,
                cancelable: false,
            },
            related_target,
        };

        if let Some(old) = &old {
            if old.state() == InteractionState::Focus {
                old.set_state(self.resting_state(old));
            }
            old.dispatch_event(&mut Event::focus("focusout", init(element.clone())))?;
        }
        if let Some(new) = &element {
            if new.state() != InteractionState::Active {
                new.set_state(InteractionState::Focus);
            }
            new.dispatch_event(&mut Event::focus("focusin", init(old.clone())))?;
        }
        tracing::debug!(
            from = ?old.as_ref().map(Element::box_id),
            to = ?element.as_ref().map(Element::box_id),
            "focus moved"
        );
        Ok(())
    }
}

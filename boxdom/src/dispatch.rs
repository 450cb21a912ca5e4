// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-phase propagation.
//!
//! The path from the root to the target is computed once. The capture pass
//! walks it forward and delivers `use_capture = true` listeners; the bubble
//! pass walks it backward and delivers `use_capture = false` listeners. At
//! the target both passes report [`EventPhase::AtTarget`].

use smallvec::SmallVec;

use crate::element::Element;
use crate::error::DomError;
use crate::event::{Event, EventPhase, PayloadKind, uses_local_coordinates};

/// Root → target path of a dispatch.
pub(crate) type DispatchPath = SmallVec<[Element; 16]>;

/// Elements from the root of `target`'s tree down to `target`, inclusive.
pub(crate) fn path_to(target: &Element) -> DispatchPath {
    let mut path = DispatchPath::new();
    let mut cur = Some(target.clone());
    while let Some(element) = cur {
        cur = element.parent_node();
        path.push(element);
    }
    path.reverse();
    path
}

/// Dispatch `event` at `target`. Returns `Ok(!default_prevented)`.
///
/// A listener error aborts delivery and is returned as is; the event keeps
/// the traversal state it had when the listener failed.
pub(crate) fn dispatch(target: &Element, event: &mut Event) -> Result<bool, DomError> {
    if let Some(expected) = PayloadKind::for_event_type(event.event_type()) {
        let found = event.payload().kind();
        if found != expected {
            return Err(DomError::PayloadMismatch {
                event_type: event.event_type().to_owned(),
                expected,
                found,
            });
        }
    }

    event.begin(target.clone());
    let path = path_to(target);
    tracing::trace!(event_type = event.event_type(), depth = path.len(), "dispatch");

    propagate(&path, target, event)?;

    event.finish();
    Ok(!event.default_prevented())
}

fn propagate(path: &[Element], target: &Element, event: &mut Event) -> Result<(), DomError> {
    for node in path {
        let phase = if node == target {
            EventPhase::AtTarget
        } else {
            EventPhase::Capturing
        };
        deliver(node, event, phase, true)?;
        if event.propagation_stopped() {
            return Ok(());
        }
    }
    for node in path.iter().rev() {
        let phase = if node == target {
            EventPhase::AtTarget
        } else {
            EventPhase::Bubbling
        };
        deliver(node, event, phase, false)?;
        if event.propagation_stopped() {
            return Ok(());
        }
    }
    Ok(())
}

fn deliver(
    node: &Element,
    event: &mut Event,
    phase: EventPhase,
    capture: bool,
) -> Result<(), DomError> {
    event.enter(node, phase);
    let listeners = node.listener_snapshot(event.event_type(), capture);
    if listeners.is_empty() {
        return Ok(());
    }

    if uses_local_coordinates(event.event_type())
        && let Some(mouse) = event.mouse_mut()
    {
        let screen = mouse.screen();
        mouse.rebind(node.to_client(screen), node.to_offset(screen));
    }

    tracing::trace!(
        event_type = event.event_type(),
        ?phase,
        box_id = %node.box_id(),
        listeners = listeners.len(),
        "deliver"
    );
    for entry in &listeners {
        if entry.is_removed() {
            continue;
        }
        entry.listener().call(event)?;
        if event.immediate_propagation_stopped() {
            break;
        }
    }
    Ok(())
}

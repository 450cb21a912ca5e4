// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`LayoutEngine`] trait: everything the DOM layer asks of a native engine.

use alloc::string::String;

use kurbo::Point;

use crate::style::NativeStyle;
use crate::types::{BoxId, InteractionState, ScrollMetrics};

/// A retained-mode layout/render engine seen through box handles.
///
/// The DOM layer treats the engine as an opaque service. It never inspects
/// layout results directly; it only mirrors structure, pushes styles and
/// text, and asks geometric questions.
///
/// ## Contract
///
/// - Boxes are created by [`create_box`](Self::create_box) and released by
///   [`release_box`](Self::release_box) exactly once.
/// - Operations on stale handles are no-ops; queries on stale handles return
///   neutral values (`0`, `false`, `None`, the input point).
/// - [`insert_child`](Self::insert_child) places `child` at `index` in
///   `parent`'s child list. A correct engine reports the new order through
///   [`child_count`](Self::child_count) and [`child_at`](Self::child_at)
///   immediately; the DOM layer verifies this after every structural change.
/// - Calls never re-enter the DOM layer.
///
/// Coordinates passed to the geometric queries are screen coordinates.
pub trait LayoutEngine {
    /// Create a detached box of the given kind (for example `"Div"`).
    fn create_box(&mut self, kind: &str) -> BoxId;

    /// Release a box. A box still attached to a parent is detached first;
    /// its children are orphaned, not released.
    fn release_box(&mut self, id: BoxId);

    /// Insert `child` into `parent`'s child list at `index`.
    fn insert_child(&mut self, parent: BoxId, child: BoxId, index: usize);

    /// Remove `child` from `parent`'s child list.
    fn remove_child(&mut self, parent: BoxId, child: BoxId);

    /// Number of children of `parent`.
    fn child_count(&self, parent: BoxId) -> usize;

    /// Child of `parent` at `index`.
    fn child_at(&self, parent: BoxId, index: usize) -> Option<BoxId>;

    /// Replace the style registered for `state`.
    fn set_style(&mut self, id: BoxId, style: &NativeStyle, state: InteractionState);

    /// Style registered for `state`, if any.
    fn style(&self, id: BoxId, state: InteractionState) -> Option<NativeStyle>;

    /// Current interaction state.
    fn state(&self, id: BoxId) -> InteractionState;

    /// Change the current interaction state.
    fn set_state(&mut self, id: BoxId, state: InteractionState);

    /// Whether the screen point lies inside the box.
    fn hit(&self, id: BoxId, point: Point) -> bool;

    /// Deepest, top-most box in the subtree of `id` under the screen point.
    fn search(&self, id: BoxId, point: Point) -> Option<BoxId>;

    /// Map a screen point into the box's client space.
    fn to_client(&self, id: BoxId, point: Point) -> Point;

    /// Map a screen point into the box's offset (border-box) space.
    fn to_offset(&self, id: BoxId, point: Point) -> Point;

    /// Scroll offsets and extents.
    fn scroll_metrics(&self, id: BoxId) -> ScrollMetrics;

    /// Set the vertical scroll offset. Engines may clamp.
    fn set_scroll_top(&mut self, id: BoxId, value: f64);

    /// Set the horizontal scroll offset. Engines may clamp.
    fn set_scroll_left(&mut self, id: BoxId, value: f64);

    /// Text laid out inside the box.
    fn text_content(&self, id: BoxId) -> String;

    /// Replace the text laid out inside the box.
    fn set_text_content(&mut self, id: BoxId, text: &str);
}

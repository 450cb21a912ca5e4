// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`RetainedEngine`]: an in-memory reference implementation of [`LayoutEngine`].

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::engine::LayoutEngine;
use crate::style::{NativeStyle, NativeValue};
use crate::types::{BoxId, InteractionState, ScrollMetrics};

/// A retained box arena that stores geometry supplied by the embedder.
///
/// `RetainedEngine` does not lay anything out. Frames and content sizes are
/// set explicitly with [`set_frame`](Self::set_frame) and
/// [`set_content_size`](Self::set_content_size); everything else (structure,
/// per-state styles, scroll offsets, text) is driven through
/// [`LayoutEngine`].
///
/// ## Geometry
///
/// - A frame is a rectangle in the parent's content space; the parent's
///   scroll offset shifts its children.
/// - The resolved `transform` matrix (default-state style, overridden by the
///   current state's) is applied in the box's own space, after the frame
///   origin.
/// - Offset space is the box's border-box space. Client space is offset
///   space minus the left/top `border` widths.
///
/// ```
/// use boxdom_native::{LayoutEngine, RetainedEngine};
/// use kurbo::{Point, Rect};
///
/// let mut engine = RetainedEngine::new();
/// let root = engine.create_box("Div");
/// let child = engine.create_box("Div");
/// engine.insert_child(root, child, 0);
/// engine.set_frame(root, Rect::new(0.0, 0.0, 200.0, 200.0));
/// engine.set_frame(child, Rect::new(50.0, 50.0, 100.0, 100.0));
///
/// assert_eq!(engine.search(root, Point::new(60.0, 60.0)), Some(child));
/// assert_eq!(engine.to_offset(child, Point::new(60.0, 70.0)), Point::new(10.0, 20.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RetainedEngine {
    slots: Vec<Slot>,
    free_list: Vec<usize>,
    live: usize,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    data: Option<BoxData>,
}

#[derive(Clone, Debug)]
struct BoxData {
    kind: String,
    parent: Option<BoxId>,
    children: Vec<BoxId>,
    frame: Rect,
    content_size: Size,
    scroll: Vec2,
    styles: [Option<NativeStyle>; InteractionState::COUNT],
    state: InteractionState,
    text: String,
}

impl BoxData {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.into(),
            parent: None,
            children: Vec::new(),
            frame: Rect::ZERO,
            content_size: Size::ZERO,
            scroll: Vec2::ZERO,
            styles: Default::default(),
            state: InteractionState::Default,
            text: String::new(),
        }
    }

    fn resolved(&self, name: &str) -> Option<&NativeValue> {
        let current = self.styles[self.state.index()]
            .as_ref()
            .and_then(|s| s.get(name))
            .filter(|v| !v.is_null());
        current.or_else(|| {
            self.styles[InteractionState::Default.index()]
                .as_ref()
                .and_then(|s| s.get(name))
                .filter(|v| !v.is_null())
        })
    }

    fn transform(&self) -> Affine {
        self.resolved("transform")
            .and_then(NativeValue::as_matrix)
            .unwrap_or(Affine::IDENTITY)
    }

    /// Border widths in `[top, right, bottom, left]` order.
    fn border(&self) -> [f64; 4] {
        match self.resolved("border") {
            Some(NativeValue::Quad(q)) => *q,
            Some(NativeValue::Number(v)) => [*v; 4],
            _ => [0.0; 4],
        }
    }

    fn client_size(&self) -> Size {
        let [top, right, bottom, left] = self.border();
        Size::new(
            (self.frame.width() - left - right).max(0.0),
            (self.frame.height() - top - bottom).max(0.0),
        )
    }

    fn scroll_size(&self) -> Size {
        let client = self.client_size();
        Size::new(
            self.content_size.width.max(client.width),
            self.content_size.height.max(client.height),
        )
    }
}

impl RetainedEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live boxes.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no box is alive.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether `id` refers to a live box.
    pub fn is_alive(&self, id: BoxId) -> bool {
        self.data(id).is_some()
    }

    /// Kind the box was created with.
    pub fn kind(&self, id: BoxId) -> Option<&str> {
        self.data(id).map(|d| d.kind.as_str())
    }

    /// Parent of a box, if attached.
    pub fn parent_of(&self, id: BoxId) -> Option<BoxId> {
        self.data(id).and_then(|d| d.parent)
    }

    /// Children of a box in order. Empty for stale handles.
    pub fn children(&self, id: BoxId) -> &[BoxId] {
        self.data(id).map(|d| d.children.as_slice()).unwrap_or(&[])
    }

    /// Set the frame of a box, in its parent's content space.
    pub fn set_frame(&mut self, id: BoxId, frame: Rect) {
        if let Some(d) = self.data_mut(id) {
            d.frame = frame;
        }
    }

    /// Frame of a box.
    pub fn frame(&self, id: BoxId) -> Option<Rect> {
        self.data(id).map(|d| d.frame)
    }

    /// Set the size of the scrollable content of a box.
    ///
    /// Scroll offsets are re-clamped against the new extent.
    pub fn set_content_size(&mut self, id: BoxId, size: Size) {
        if let Some(d) = self.data_mut(id) {
            d.content_size = size;
            d.scroll = clamp_scroll(d, d.scroll);
        }
    }

    fn data(&self, id: BoxId) -> Option<&BoxData> {
        let slot = self.slots.get(id.slot())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.data.as_ref()
    }

    fn data_mut(&mut self, id: BoxId) -> Option<&mut BoxData> {
        let slot = self.slots.get_mut(id.slot())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.data.as_mut()
    }

    fn detach(&mut self, id: BoxId) {
        let Some(parent) = self.data_mut(id).and_then(|d| d.parent.take()) else {
            return;
        };
        if let Some(p) = self.data_mut(parent) {
            p.children.retain(|&c| c != id);
        }
    }

    /// Transform from the box's border-box space to screen space.
    fn screen_from_box(&self, id: BoxId) -> Option<Affine> {
        let mut xf = Affine::IDENTITY;
        let mut cur = self.data(id)?;
        loop {
            let local = Affine::translate(cur.frame.origin().to_vec2()) * cur.transform();
            xf = local * xf;
            let Some(parent) = cur.parent.and_then(|p| self.data(p)) else {
                break;
            };
            xf = Affine::translate(-parent.scroll) * xf;
            cur = parent;
        }
        Some(xf)
    }

    fn search_in(&self, id: BoxId, point: Point) -> Option<BoxId> {
        if !self.hit(id, point) {
            return None;
        }
        let data = self.data(id)?;
        data.children
            .iter()
            .rev()
            .find_map(|&child| self.search_in(child, point))
            .or(Some(id))
    }
}

fn clamp_scroll(d: &BoxData, scroll: Vec2) -> Vec2 {
    let client = d.client_size();
    let extent = d.scroll_size();
    Vec2::new(
        scroll.x.clamp(0.0, (extent.width - client.width).max(0.0)),
        scroll.y.clamp(0.0, (extent.height - client.height).max(0.0)),
    )
}

impl LayoutEngine for RetainedEngine {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "slot indices are bounded by the number of boxes ever alive at once"
    )]
    fn create_box(&mut self, kind: &str) -> BoxId {
        self.live += 1;
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx];
            slot.generation = slot.generation.wrapping_add(1);
            slot.data = Some(BoxData::new(kind));
            return BoxId::new(idx as u32, slot.generation);
        }
        let idx = self.slots.len();
        self.slots.push(Slot {
            generation: 1,
            data: Some(BoxData::new(kind)),
        });
        BoxId::new(idx as u32, 1)
    }

    fn release_box(&mut self, id: BoxId) {
        if !self.is_alive(id) {
            tracing::debug!(%id, "release of stale box ignored");
            return;
        }
        self.detach(id);
        let children = self
            .data_mut(id)
            .map(|d| core::mem::take(&mut d.children))
            .unwrap_or_default();
        for child in children {
            if let Some(c) = self.data_mut(child) {
                c.parent = None;
            }
        }
        self.slots[id.slot()].data = None;
        self.free_list.push(id.slot());
        self.live -= 1;
    }

    fn insert_child(&mut self, parent: BoxId, child: BoxId, index: usize) {
        if parent == child || !self.is_alive(parent) || !self.is_alive(child) {
            return;
        }
        self.detach(child);
        if let Some(p) = self.data_mut(parent) {
            let index = index.min(p.children.len());
            p.children.insert(index, child);
        }
        if let Some(c) = self.data_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn remove_child(&mut self, parent: BoxId, child: BoxId) {
        if self.parent_of(child) == Some(parent) {
            self.detach(child);
        }
    }

    fn child_count(&self, parent: BoxId) -> usize {
        self.data(parent).map_or(0, |d| d.children.len())
    }

    fn child_at(&self, parent: BoxId, index: usize) -> Option<BoxId> {
        self.data(parent)?.children.get(index).copied()
    }

    fn set_style(&mut self, id: BoxId, style: &NativeStyle, state: InteractionState) {
        if let Some(d) = self.data_mut(id) {
            d.styles[state.index()] = Some(style.clone());
            d.scroll = clamp_scroll(d, d.scroll);
        }
    }

    fn style(&self, id: BoxId, state: InteractionState) -> Option<NativeStyle> {
        self.data(id)?.styles[state.index()].clone()
    }

    fn state(&self, id: BoxId) -> InteractionState {
        self.data(id).map(|d| d.state).unwrap_or_default()
    }

    fn set_state(&mut self, id: BoxId, state: InteractionState) {
        if let Some(d) = self.data_mut(id) {
            d.state = state;
        }
    }

    fn hit(&self, id: BoxId, point: Point) -> bool {
        let Some(d) = self.data(id) else {
            return false;
        };
        let local = self.to_offset(id, point);
        Rect::from_origin_size(Point::ORIGIN, d.frame.size()).contains(local)
    }

    fn search(&self, id: BoxId, point: Point) -> Option<BoxId> {
        self.search_in(id, point)
    }

    fn to_client(&self, id: BoxId, point: Point) -> Point {
        let Some(d) = self.data(id) else {
            return point;
        };
        let [top, _, _, left] = d.border();
        self.to_offset(id, point) - Vec2::new(left, top)
    }

    fn to_offset(&self, id: BoxId, point: Point) -> Point {
        match self.screen_from_box(id) {
            Some(xf) if xf.determinant() != 0.0 => xf.inverse() * point,
            _ => point,
        }
    }

    fn scroll_metrics(&self, id: BoxId) -> ScrollMetrics {
        let Some(d) = self.data(id) else {
            return ScrollMetrics::default();
        };
        let client = d.client_size();
        let extent = d.scroll_size();
        ScrollMetrics {
            scroll_top: d.scroll.y,
            scroll_left: d.scroll.x,
            scroll_width: extent.width,
            scroll_height: extent.height,
            client_width: client.width,
            client_height: client.height,
        }
    }

    fn set_scroll_top(&mut self, id: BoxId, value: f64) {
        if let Some(d) = self.data_mut(id) {
            d.scroll = clamp_scroll(d, Vec2::new(d.scroll.x, value));
        }
    }

    fn set_scroll_left(&mut self, id: BoxId, value: f64) {
        if let Some(d) = self.data_mut(id) {
            d.scroll = clamp_scroll(d, Vec2::new(value, d.scroll.y));
        }
    }

    fn text_content(&self, id: BoxId) -> String {
        self.data(id).map(|d| d.text.clone()).unwrap_or_default()
    }

    fn set_text_content(&mut self, id: BoxId, text: &str) {
        if let Some(d) = self.data_mut(id) {
            d.text.clear();
            d.text.push_str(text);
        }
    }
}

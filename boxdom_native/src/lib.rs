// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boxdom Native: the boundary between a DOM-shaped logical tree and a native layout engine.
//!
//! ## Overview
//!
//! A retained-mode layout/render engine owns a graph of boxes. It only knows
//! about elements (boxes with merged text), never about text nodes, and it
//! exposes a small imperative surface: child-list mutation, hit testing,
//! coordinate transforms, scroll metrics, and per-state style application.
//! This crate names that surface so the `boxdom` crate can drive any engine.
//!
//! ## API overview
//!
//! - [`LayoutEngine`]: the engine seen through box handles.
//! - [`BoxId`]: generational handle of a native box.
//! - [`InteractionState`]: named style variants (default, hover, active, ...).
//! - [`NativeStyle`] / [`NativeValue`]: flat, normalized style values.
//! - [`ScrollMetrics`]: scroll offsets and extents.
//! - [`RetainedEngine`]: an in-memory reference engine. It stores geometry
//!   set by the embedder and answers the geometric queries from it.
//!
//! ## Not a layout engine
//!
//! Nothing here measures or arranges boxes. [`RetainedEngine`] takes frames
//! as given; a real engine computes them with whatever layout system it uses.
//!
//! This crate is `no_std` and uses `alloc`. Enable either the `std` (default)
//! or the `libm` feature for Kurbo's float math.

#![no_std]

extern crate alloc;

mod engine;
mod retained;
mod style;
mod types;

pub use engine::LayoutEngine;
pub use retained::RetainedEngine;
pub use style::{NativeStyle, NativeValue};
pub use types::{BoxId, InteractionState, ScrollMetrics};

pub use kurbo;

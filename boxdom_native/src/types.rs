// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the native boundary: box handles, interaction states, and scroll metrics.

use core::fmt;

/// Handle of a native box ("backing box").
///
/// This is a small, copyable handle that stays stable while the box is alive
/// and becomes stale once the box is released.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On creation, a fresh slot is allocated with generation `1`.
/// - On release, the slot is freed; any existing `BoxId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `BoxId`.
///
/// Stale `BoxId`s never alias a different live box because the generation must match.
/// Engines are expected to treat operations on stale handles as no-ops.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BoxId(u32, u32);

impl BoxId {
    /// Build a handle from a slot index and a generation.
    ///
    /// Engine implementations use this to mint handles; the pair is opaque to everyone else.
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self(slot, generation)
    }

    /// Slot index of this handle.
    pub const fn slot(self) -> usize {
        self.0 as usize
    }

    /// Generation of this handle.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.0, self.1)
    }
}

/// A named style variant applied conditionally by the native engine.
///
/// A box always has exactly one current state; styles can be registered for
/// every state and the engine resolves the current state's style on top of
/// the default one.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum InteractionState {
    /// Resting state.
    #[default]
    Default,
    /// The box holds keyboard focus.
    Focus,
    /// The box is being pressed.
    Active,
    /// The pointer is over the box.
    Hover,
    /// The box is selected.
    Select,
    /// The box is disabled.
    Disable,
    /// The box is checked.
    Check,
}

impl InteractionState {
    /// Number of states.
    pub const COUNT: usize = 7;

    /// All states, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Default,
        Self::Focus,
        Self::Active,
        Self::Hover,
        Self::Select,
        Self::Disable,
        Self::Check,
    ];

    /// Dense index of this state, suitable for per-state tables.
    pub const fn index(self) -> usize {
        match self {
            Self::Default => 0,
            Self::Focus => 1,
            Self::Active => 2,
            Self::Hover => 3,
            Self::Select => 4,
            Self::Disable => 5,
            Self::Check => 6,
        }
    }

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Focus => "focus",
            Self::Active => "active",
            Self::Hover => "hover",
            Self::Select => "select",
            Self::Disable => "disable",
            Self::Check => "check",
        }
    }

    /// Recognize a style-object key naming a state.
    ///
    /// Matching is ASCII case-insensitive and accepts the canonical names as
    /// well as the common adjective forms (`pressed`, `disabled`, ...).
    ///
    /// ```
    /// use boxdom_native::InteractionState;
    /// assert_eq!(InteractionState::from_key("HOVER"), Some(InteractionState::Hover));
    /// assert_eq!(InteractionState::from_key("pressed"), Some(InteractionState::Active));
    /// assert_eq!(InteractionState::from_key("width"), None);
    /// ```
    pub fn from_key(key: &str) -> Option<Self> {
        const TABLE: &[(&str, InteractionState)] = &[
            ("default", InteractionState::Default),
            ("focus", InteractionState::Focus),
            ("focused", InteractionState::Focus),
            ("active", InteractionState::Active),
            ("pressed", InteractionState::Active),
            ("hover", InteractionState::Hover),
            ("hovered", InteractionState::Hover),
            ("select", InteractionState::Select),
            ("selected", InteractionState::Select),
            ("disable", InteractionState::Disable),
            ("disabled", InteractionState::Disable),
            ("check", InteractionState::Check),
            ("checked", InteractionState::Check),
        ];
        TABLE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|&(_, state)| state)
    }
}

/// Scroll and client extents of a box, as reported by the engine.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Vertical scroll offset.
    pub scroll_top: f64,
    /// Horizontal scroll offset.
    pub scroll_left: f64,
    /// Width of the scrollable content.
    pub scroll_width: f64,
    /// Height of the scrollable content.
    pub scroll_height: f64,
    /// Width of the client (content + padding) area.
    pub client_width: f64,
    /// Height of the client (content + padding) area.
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Largest meaningful vertical scroll offset.
    pub fn scroll_top_max(&self) -> f64 {
        self.scroll_height - self.client_height
    }

    /// Largest meaningful horizontal scroll offset.
    pub fn scroll_left_max(&self) -> f64 {
        self.scroll_width - self.client_width
    }
}

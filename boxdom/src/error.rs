// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use boxdom_native::BoxId;

use crate::event::PayloadKind;
use crate::node::NodeType;

/// Errors raised by tree mutation, dispatch, and style application.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// `insert_before` was given a reference node of a different type than the inserted node.
    #[error("cannot insert a {child:?} node before a {reference:?} node")]
    InvalidNodeType {
        /// Type of the node being inserted.
        child: NodeType,
        /// Type of the reference node.
        reference: NodeType,
    },
    /// The node is not a child of this element.
    #[error("node is not a child of this element")]
    NotFound,
    /// The insertion would make an element its own ancestor.
    #[error("cannot insert an element into itself or one of its descendants")]
    HierarchyRequest,
    /// An element index past the end of the element-child list.
    #[error("element index {index} is out of bounds for {len} element children")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of element children.
        len: usize,
    },
    /// The logical element-child list and the native child list diverged.
    ///
    /// This is a consistency fault: a logic error in the DOM layer or a
    /// misbehaving engine. It is never repaired automatically.
    #[error("tree parity violated: {0}")]
    ParityViolation(ParityFault),
    /// An event was dispatched with a payload that does not fit its type.
    #[error("event `{event_type}` needs a {expected:?} payload, got {found:?}")]
    PayloadMismatch {
        /// Event type name.
        event_type: String,
        /// Payload kind the type requires.
        expected: PayloadKind,
        /// Payload kind the event carries.
        found: PayloadKind,
    },
    /// A style value could not be normalized.
    #[error("invalid value for style property `{property}`: {reason}")]
    InvalidStyle {
        /// Property name.
        property: String,
        /// What went wrong.
        reason: String,
    },
    /// A listener failed; the failure is carried unmodified.
    #[error(transparent)]
    Listener(Box<dyn core::error::Error + 'static>),
}

impl DomError {
    /// Wrap a listener's own failure.
    ///
    /// ```
    /// use boxdom::DomError;
    /// let err = DomError::listener("handler gave up");
    /// assert_eq!(err.to_string(), "handler gave up");
    /// ```
    pub fn listener(err: impl Into<Box<dyn core::error::Error + 'static>>) -> Self {
        Self::Listener(err.into())
    }

    pub(crate) fn invalid_style(property: &str, reason: impl Into<String>) -> Self {
        Self::InvalidStyle {
            property: property.into(),
            reason: reason.into(),
        }
    }
}

/// What exactly diverged when a parity check failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParityFault {
    /// The lists have different lengths.
    #[error("{logical} element children but {native} native children")]
    ChildCount {
        /// Length of the logical element-child list.
        logical: usize,
        /// Child count reported by the engine.
        native: usize,
    },
    /// The lists disagree at `index`.
    #[error("element child {index} is backed by {logical} but the native child is {native:?}")]
    ChildMismatch {
        /// Position of the first disagreement.
        index: usize,
        /// Box of the logical element at `index`.
        logical: BoxId,
        /// Box the engine reports at `index`.
        native: Option<BoxId>,
    },
}

// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat, normalized style values as the native engine consumes them.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Affine;

/// A single normalized style value.
///
/// `Null` is an explicit "unset" marker: an engine receiving it for a
/// property must clear that property, which is different from the property
/// not being mentioned at all.
#[derive(Clone, Debug, PartialEq)]
pub enum NativeValue {
    /// Explicitly unset.
    Null,
    /// A plain number (lengths are already resolved to pixels).
    Number(f64),
    /// A keyword or free-form string (`"row"`, `"center"`, font names, ...).
    Text(String),
    /// Four-sided value in `[top, right, bottom, left]` order.
    Quad([f64; 4]),
    /// Non-premultiplied RGBA with every channel in `0.0..=1.0`.
    Color([f32; 4]),
    /// 2D affine transform.
    Matrix(Affine),
    /// Any other numeric list, passed through untouched.
    List(Vec<f64>),
}

impl NativeValue {
    /// Returns `true` for [`NativeValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric payload, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Four-sided payload, if this is a quad.
    pub fn as_quad(&self) -> Option<[f64; 4]> {
        match self {
            Self::Quad(q) => Some(*q),
            _ => None,
        }
    }

    /// Color payload, if this is a color.
    pub fn as_color(&self) -> Option<[f32; 4]> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Transform payload, if this is a matrix.
    pub fn as_matrix(&self) -> Option<Affine> {
        match self {
            Self::Matrix(m) => Some(*m),
            _ => None,
        }
    }
}

/// A flat style: property name to normalized value, for one interaction state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NativeStyle {
    props: HashMap<String, NativeValue>,
}

impl NativeStyle {
    /// Create an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: NativeValue) {
        self.props.insert(name.into(), value);
    }

    /// Look up a property.
    pub fn get(&self, name: &str) -> Option<&NativeValue> {
        self.props.get(name)
    }

    /// Returns `true` if the property is mentioned (including as `Null`).
    pub fn contains(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }

    /// Number of mentioned properties.
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Returns `true` if no property is mentioned.
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Iterate over all mentioned properties in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NativeValue)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fold `other` into `self`: `Null` entries clear, every other entry overwrites.
    pub fn merge(&mut self, other: &Self) {
        for (name, value) in &other.props {
            if value.is_null() {
                self.props.remove(name);
            } else {
                self.props.insert(name.clone(), value.clone());
            }
        }
    }
}

impl FromIterator<(String, NativeValue)> for NativeStyle {
    fn from_iter<I: IntoIterator<Item = (String, NativeValue)>>(iter: I) -> Self {
        Self {
            props: iter.into_iter().collect(),
        }
    }
}

// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style bridge: declarative style objects to flat per-state native styles.
//!
//! A [`StyleObject`] is partitioned into per-state sub-styles (keys such as
//! `hover` or `pressed` holding an object) and the default-state style (all
//! other keys). Each flat style is normalized before it reaches the engine:
//!
//! - `borderColor`, `backgroundColor`, `fontColor`: CSS color strings become
//!   straight-alpha sRGB quadruples in `0..=1`; unparseable colors become
//!   transparent black.
//! - `transform`: a CSS transform list (or six matrix numbers) becomes an
//!   affine matrix.
//! - `borderRadius`, `margin`, `border`, `padding`: a single number expands
//!   to all four sides.
//! - `Null` is kept as an explicit "unset".

use kurbo::Affine;
use peniko::color::{Srgb, parse_color};

use boxdom_native::{InteractionState, NativeStyle, NativeValue};

use crate::element::Element;
use crate::error::DomError;

const COLOR_PROPERTIES: [&str; 3] = ["borderColor", "backgroundColor", "fontColor"];
const QUAD_PROPERTIES: [&str; 4] = ["borderRadius", "margin", "border", "padding"];

/// A declarative style value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum StyleValue {
    /// Explicitly unset.
    #[default]
    Null,
    /// A number.
    Number(f64),
    /// A string such as a color, a transform list or a keyword.
    Str(String),
    /// A list of numbers.
    List(Vec<f64>),
    /// A nested object; only meaningful under an interaction-state key.
    Object(StyleObject),
}

impl From<f64> for StyleValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for StyleValue {
    fn from(v: i32) -> Self {
        Self::Number(v.into())
    }
}

impl From<&str> for StyleValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for StyleValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<f64>> for StyleValue {
    fn from(v: Vec<f64>) -> Self {
        Self::List(v)
    }
}

impl<const N: usize> From<[f64; N]> for StyleValue {
    fn from(v: [f64; N]) -> Self {
        Self::List(v.to_vec())
    }
}

impl From<StyleObject> for StyleValue {
    fn from(v: StyleObject) -> Self {
        Self::Object(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for StyleValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// An ordered key → value style object. Setting an existing key replaces it in place.
///
/// ```
/// use boxdom::StyleObject;
///
/// let style = StyleObject::new()
///     .with("width", 100)
///     .with("backgroundColor", "red")
///     .with("hover", StyleObject::new().with("backgroundColor", "blue"));
/// assert_eq!(style.len(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleObject {
    entries: Vec<(String, StyleValue)>,
}

impl StyleObject {
    /// Empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<StyleValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set or replace a key.
    pub fn set(&mut self, key: &str, value: impl Into<StyleValue>) -> &mut Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key.to_owned(), value)),
        }
        self
    }

    /// Value under `key`.
    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the object has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<StyleValue>> FromIterator<(K, V)> for StyleObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut object = Self::new();
        for (k, v) in iter {
            object.set(k.as_ref(), v);
        }
        object
    }
}

/// Styles ready for the engine. `None` clears a state's style entirely.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    /// Per-state styles, in the order they appeared.
    pub states: Vec<(InteractionState, Option<NativeStyle>)>,
    /// The default-state style. Always present, possibly empty.
    pub default: NativeStyle,
}

/// Partition and normalize a style object without touching any element.
pub fn resolve(style: &StyleObject) -> Result<ResolvedStyle, DomError> {
    let mut states = Vec::new();
    let mut default = NativeStyle::new();
    for (key, value) in style.iter() {
        match (InteractionState::from_key(key), value) {
            (Some(InteractionState::Default), StyleValue::Object(sub)) => {
                for (k, v) in sub.iter() {
                    default.set(k, normalize(k, v)?);
                }
            }
            (Some(state), StyleValue::Object(sub)) => {
                states.push((state, Some(flatten(sub)?)));
            }
            (Some(state), StyleValue::Null) => states.push((state, None)),
            (Some(state), _) => {
                tracing::warn!(key, ?state, "state style must be an object; ignored");
            }
            (None, value) => default.set(key, normalize(key, value)?),
        }
    }
    Ok(ResolvedStyle { states, default })
}

fn flatten(object: &StyleObject) -> Result<NativeStyle, DomError> {
    object
        .iter()
        .map(|(k, v)| Ok((k.to_owned(), normalize(k, v)?)))
        .collect()
}

/// Normalize one property value.
pub fn normalize(property: &str, value: &StyleValue) -> Result<NativeValue, DomError> {
    if let StyleValue::Null = value {
        return Ok(NativeValue::Null);
    }
    if COLOR_PROPERTIES.contains(&property) {
        return Ok(NativeValue::Color(color(value)));
    }
    if property == "transform" {
        return transform(value).map(NativeValue::Matrix);
    }
    if QUAD_PROPERTIES.contains(&property) {
        match value {
            StyleValue::Number(v) => return Ok(NativeValue::Quad([*v; 4])),
            StyleValue::List(v) if v.len() == 4 => {
                return Ok(NativeValue::Quad([v[0], v[1], v[2], v[3]]));
            }
            _ => {}
        }
    }
    match value {
        StyleValue::Null => Ok(NativeValue::Null),
        StyleValue::Number(v) => Ok(NativeValue::Number(*v)),
        StyleValue::Str(s) => Ok(NativeValue::Text(s.clone())),
        StyleValue::List(v) => Ok(NativeValue::List(v.clone())),
        StyleValue::Object(_) => Err(DomError::invalid_style(
            property,
            "nested objects are only allowed under interaction-state keys",
        )),
    }
}

fn color(value: &StyleValue) -> [f32; 4] {
    match value {
        StyleValue::Str(s) => match parse_color(s) {
            Ok(c) => c.to_alpha_color::<Srgb>().components,
            Err(_) => {
                tracing::debug!(color = s.as_str(), "unparseable color");
                [0.0; 4]
            }
        },
        #[expect(clippy::cast_possible_truncation, reason = "colors are stored as f32")]
        StyleValue::List(v) if v.len() == 4 => [v[0] as f32, v[1] as f32, v[2] as f32, v[3] as f32],
        _ => [0.0; 4],
    }
}

fn transform(value: &StyleValue) -> Result<Affine, DomError> {
    match value {
        StyleValue::Str(s) => parse_transform(s),
        StyleValue::List(v) if v.len() == 6 => {
            Ok(Affine::new([v[0], v[1], v[2], v[3], v[4], v[5]]))
        }
        _ => Err(DomError::invalid_style(
            "transform",
            "expected a transform list or six matrix numbers",
        )),
    }
}

/// Parse a CSS transform list such as `translate(10px, 5px) rotate(45deg)`.
///
/// Functions compose left to right, as in CSS: the right-most function is
/// applied to points first. `none` and the empty string are the identity.
pub fn parse_transform(input: &str) -> Result<Affine, DomError> {
    let err = |reason: String| DomError::invalid_style("transform", reason);
    let mut rest = input.trim();
    if rest.is_empty() || rest == "none" {
        return Ok(Affine::IDENTITY);
    }
    let mut result = Affine::IDENTITY;
    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| err(format!("expected `(` in `{rest}`")))?;
        let close = rest
            .find(')')
            .ok_or_else(|| err(format!("unclosed function in `{rest}`")))?;
        if close < open {
            return Err(err(format!("unexpected `)` in `{rest}`")));
        }
        let name = rest[..open].trim();
        let args: Vec<&str> = rest[open + 1..close]
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|a| !a.is_empty())
            .collect();
        result *= transform_function(name, &args).map_err(err)?;
        rest = rest[close + 1..].trim_start_matches(|c: char| c == ',' || c.is_whitespace());
    }
    Ok(result)
}

fn transform_function(name: &str, args: &[&str]) -> Result<Affine, String> {
    let arity = |range: core::ops::RangeInclusive<usize>| {
        if range.contains(&args.len()) {
            Ok(())
        } else {
            Err(format!("`{name}` takes {range:?} arguments, got {}", args.len()))
        }
    };
    let len = |i: usize| parse_length(args[i]).ok_or_else(|| format!("bad length `{}`", args[i]));
    let num = |i: usize| args[i].parse::<f64>().map_err(|_| format!("bad number `{}`", args[i]));
    let ang = |i: usize| parse_angle(args[i]).ok_or_else(|| format!("bad angle `{}`", args[i]));
    match name {
        "matrix" => {
            arity(6..=6)?;
            Ok(Affine::new([num(0)?, num(1)?, num(2)?, num(3)?, len(4)?, len(5)?]))
        }
        "translate" => {
            arity(1..=2)?;
            let y = if args.len() == 2 { len(1)? } else { 0.0 };
            Ok(Affine::translate((len(0)?, y)))
        }
        "translateX" => {
            arity(1..=1)?;
            Ok(Affine::translate((len(0)?, 0.0)))
        }
        "translateY" => {
            arity(1..=1)?;
            Ok(Affine::translate((0.0, len(0)?)))
        }
        "scale" => {
            arity(1..=2)?;
            let x = num(0)?;
            let y = if args.len() == 2 { num(1)? } else { x };
            Ok(Affine::scale_non_uniform(x, y))
        }
        "scaleX" => {
            arity(1..=1)?;
            Ok(Affine::scale_non_uniform(num(0)?, 1.0))
        }
        "scaleY" => {
            arity(1..=1)?;
            Ok(Affine::scale_non_uniform(1.0, num(0)?))
        }
        "rotate" => {
            arity(1..=1)?;
            Ok(Affine::rotate(ang(0)?))
        }
        "skew" => {
            arity(1..=2)?;
            let y = if args.len() == 2 { ang(1)? } else { 0.0 };
            Ok(Affine::skew(ang(0)?.tan(), y.tan()))
        }
        "skewX" => {
            arity(1..=1)?;
            Ok(Affine::skew(ang(0)?.tan(), 0.0))
        }
        "skewY" => {
            arity(1..=1)?;
            Ok(Affine::skew(0.0, ang(0)?.tan()))
        }
        _ => Err(format!("unknown transform function `{name}`")),
    }
}

/// Parse a pixel length: `12`, `12px`, `-3.5px`.
pub fn parse_length(s: &str) -> Option<f64> {
    let s = s.trim();
    s.strip_suffix("px").unwrap_or(s).trim().parse().ok()
}

/// Parse an angle into radians. Bare numbers are degrees.
fn parse_angle(s: &str) -> Option<f64> {
    use core::f64::consts::{PI, TAU};
    let s = s.trim();
    let (number, scale) = if let Some(v) = s.strip_suffix("deg") {
        (v, PI / 180.0)
    } else if let Some(v) = s.strip_suffix("grad") {
        (v, PI / 200.0)
    } else if let Some(v) = s.strip_suffix("rad") {
        (v, 1.0)
    } else if let Some(v) = s.strip_suffix("turn") {
        (v, TAU)
    } else {
        (s, PI / 180.0)
    };
    number.trim().parse::<f64>().ok().map(|v| v * scale)
}

/// Normalize `style` and merge it into the element's native styles.
///
/// Nothing is pushed if any value fails to normalize. Per-state styles are
/// applied first and the default-state style last.
pub(crate) fn apply(element: &Element, style: &StyleObject) -> Result<(), DomError> {
    let resolved = resolve(style)?;
    for (state, native) in &resolved.states {
        match native {
            Some(native) => element.merge_native_style(native, *state),
            None => element.replace_native_style(&NativeStyle::new(), *state),
        }
    }
    element.merge_native_style(&resolved.default, InteractionState::Default);
    Ok(())
}

/// Property-by-property access to an element's default-state style.
///
/// Returned by [`Element::style`].
#[derive(Debug)]
pub struct StyleDeclaration<'a> {
    element: &'a Element,
}

impl<'a> StyleDeclaration<'a> {
    pub(crate) fn new(element: &'a Element) -> Self {
        Self { element }
    }

    /// Set one property. Strings ending in `px` are parsed as lengths first.
    ///
    /// ```
    /// # use std::{cell::RefCell, rc::Rc};
    /// # use boxdom::{Document, RetainedEngine};
    /// # use boxdom::{InteractionState, NativeValue};
    /// let doc = Document::new(Rc::new(RefCell::new(RetainedEngine::new())));
    /// let el = doc.create_element("Div");
    /// el.style().set_property("width", "120px").unwrap();
    /// let style = el.get_style(InteractionState::Default).unwrap();
    /// assert_eq!(style.get("width"), Some(&NativeValue::Number(120.0)));
    /// ```
    pub fn set_property(&self, key: &str, value: impl Into<StyleValue>) -> Result<(), DomError> {
        let value = match value.into() {
            StyleValue::Str(s) if s.trim_end().ends_with("px") => StyleValue::Number(
                parse_length(&s)
                    .ok_or_else(|| DomError::invalid_style(key, format!("bad length `{s}`")))?,
            ),
            value => value,
        };
        self.element.set_style(&StyleObject::new().with(key, value))
    }

    /// Unset one property.
    pub fn remove_property(&self, key: &str) -> Result<(), DomError> {
        self.element.set_style(&StyleObject::new().with(key, StyleValue::Null))
    }

    /// Current default-state value of a property.
    pub fn get_property(&self, key: &str) -> Option<NativeValue> {
        self.element
            .get_style(InteractionState::Default)
            .and_then(|style| style.get(key).cloned())
    }
}

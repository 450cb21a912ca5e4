// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document: node factory and owner of the engine handle.

use core::cell::RefCell;
use core::fmt;
use alloc::rc::{Rc, Weak};

use hashbrown::HashMap;

use boxdom_native::{BoxId, LayoutEngine};

use crate::element::{Element, ElementData};
use crate::error::DomError;
use crate::node::{Node, NodeData, NodeInner, Text};
use crate::style::StyleObject;

/// Document-wide settings.
///
/// ```
/// use boxdom::DocumentConfig;
///
/// let config = DocumentConfig::default().with_wheel_scroll(false).with_default_kind("Stack");
/// assert!(!config.wheel_scroll);
/// assert_eq!(config.default_kind, "Stack");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentConfig {
    /// Whether new elements scroll on `mousewheel` by default.
    pub wheel_scroll: bool,
    /// Box kind used by [`Document::create_default_element`].
    pub default_kind: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            wheel_scroll: true,
            default_kind: "Div".to_owned(),
        }
    }
}

impl DocumentConfig {
    /// Set [`wheel_scroll`](Self::wheel_scroll).
    #[must_use]
    pub fn with_wheel_scroll(mut self, enabled: bool) -> Self {
        self.wheel_scroll = enabled;
        self
    }

    /// Set [`default_kind`](Self::default_kind).
    #[must_use]
    pub fn with_default_kind(mut self, kind: impl Into<String>) -> Self {
        self.default_kind = kind.into();
        self
    }
}

struct DocumentInner {
    engine: Rc<RefCell<dyn LayoutEngine>>,
    boxes: RefCell<HashMap<BoxId, Weak<NodeInner>>>,
    config: DocumentConfig,
}

/// Creates nodes and routes every native call through one engine handle.
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
/// use boxdom::{Document, RetainedEngine};
///
/// let engine = Rc::new(RefCell::new(RetainedEngine::new()));
/// let doc = Document::new(engine.clone());
/// let list = doc.create_element("List");
/// let item = doc.create_element("Item");
/// list.append_child(&item).unwrap();
/// assert_eq!(engine.borrow().parent_of(item.box_id()), Some(list.box_id()));
/// ```
#[derive(Clone)]
pub struct Document(Rc<DocumentInner>);

impl Document {
    /// A document over `engine` with the default configuration.
    ///
    /// The caller may keep its own handle to the engine, for example to set
    /// frames, as long as no borrow is held across DOM calls.
    pub fn new<E: LayoutEngine + 'static>(engine: Rc<RefCell<E>>) -> Self {
        Self::with_config(engine, DocumentConfig::default())
    }

    /// A document with an explicit configuration.
    pub fn with_config<E: LayoutEngine + 'static>(
        engine: Rc<RefCell<E>>,
        config: DocumentConfig,
    ) -> Self {
        let engine: Rc<RefCell<dyn LayoutEngine>> = engine;
        Self(Rc::new(DocumentInner {
            engine,
            boxes: RefCell::new(HashMap::new()),
            config,
        }))
    }

    /// Configuration this document was created with.
    pub fn config(&self) -> &DocumentConfig {
        &self.0.config
    }

    /// Shared engine handle.
    pub fn engine(&self) -> Rc<RefCell<dyn LayoutEngine>> {
        self.0.engine.clone()
    }

    /// Create a detached element backed by a new box of `kind`.
    pub fn create_element(&self, kind: &str) -> Element {
        let backing = self.with_engine_mut(|engine| engine.create_box(kind));
        let data = ElementData::new(kind, backing, self.0.config.wheel_scroll);
        let inner = Rc::new(NodeInner::new(self.clone(), NodeData::Element(data)));
        self.0
            .boxes
            .borrow_mut()
            .insert(backing, Rc::downgrade(&inner));
        let element = Element(Node(inner));
        element.install_wheel_scroll();
        tracing::debug!(kind, box_id = %backing, "created element");
        element
    }

    /// Create an element and apply `style` to it.
    pub fn create_element_with_style(
        &self,
        kind: &str,
        style: &StyleObject,
    ) -> Result<Element, DomError> {
        let element = self.create_element(kind);
        element.set_style(style)?;
        Ok(element)
    }

    /// Create an element of the configured default kind.
    pub fn create_default_element(&self) -> Element {
        self.create_element(&self.0.config.default_kind)
    }

    /// Create a detached text node.
    pub fn create_text_node(&self, data: &str) -> Text {
        let inner = NodeInner::new(self.clone(), NodeData::Text(RefCell::new(data.to_owned())));
        Text(Node(Rc::new(inner)))
    }

    /// Live element backed by `id`.
    pub fn element_for_box(&self, id: BoxId) -> Option<Element> {
        let weak = self.0.boxes.borrow().get(&id)?.clone();
        Node::upgrade(&weak).and_then(|n| n.as_element())
    }

    /// Number of live elements.
    pub fn element_count(&self) -> usize {
        self.0.boxes.borrow().len()
    }

    pub(crate) fn with_engine<R>(&self, f: impl FnOnce(&dyn LayoutEngine) -> R) -> R {
        f(&*self.0.engine.borrow())
    }

    pub(crate) fn with_engine_mut<R>(&self, f: impl FnOnce(&mut dyn LayoutEngine) -> R) -> R {
        f(&mut *self.0.engine.borrow_mut())
    }

    /// Release the box of a dropped element.
    pub(crate) fn release_box(&self, id: BoxId) {
        if let Ok(mut boxes) = self.0.boxes.try_borrow_mut() {
            boxes.remove(&id);
        }
        match self.0.engine.try_borrow_mut() {
            Ok(mut engine) => {
                engine.release_box(id);
                tracing::debug!(box_id = %id, "released element box");
            }
            Err(_) => tracing::warn!(box_id = %id, "engine busy; box not released"),
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Document {}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("config", &self.0.config)
            .field("elements", &self.element_count())
            .finish_non_exhaustive()
    }
}

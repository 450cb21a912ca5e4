// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event objects, typed payloads, and the type → payload table.
//!
//! An [`Event`] is created by the embedder (or by the input bridge), handed
//! to [`Element::dispatch_event`](crate::Element::dispatch_event), and read
//! and flagged by listeners along the propagation path. The dispatch engine
//! owns `target`, `current_target` and `phase`; listeners only read them.

use bitflags::bitflags;
use kurbo::{Point, Vec2};

use crate::element::Element;

bitflags! {
    /// Modifier keys held while an input event was produced.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Alt / Option.
        const ALT = 1 << 0;
        /// Control.
        const CTRL = 1 << 1;
        /// Shift.
        const SHIFT = 1 << 2;
        /// Meta / Command / Super.
        const META = 1 << 3;
    }
}

/// Where an event currently is in its traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EventPhase {
    /// Not being dispatched.
    #[default]
    None,
    /// Travelling root → target, delivering capture listeners.
    Capturing,
    /// At the target node, in either pass.
    AtTarget,
    /// Travelling target → root, delivering bubble listeners.
    Bubbling,
}

/// Discriminant of [`EventPayload`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// No extra fields.
    Basic,
    /// Pointer position and buttons.
    Mouse,
    /// Pointer fields plus scroll deltas.
    Wheel,
    /// Key identity and modifiers.
    Keyboard,
    /// Focus transfer.
    Focus,
}

impl PayloadKind {
    /// Payload required by a well-known event type.
    ///
    /// Returns `None` for types that accept any payload.
    pub fn for_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "mousedown" | "mouseup" | "mousemove" | "mouseout" | "mouseover" | "click" => {
                Some(Self::Mouse)
            }
            "mousewheel" => Some(Self::Wheel),
            "keydown" | "keyup" => Some(Self::Keyboard),
            "focusin" | "focusout" => Some(Self::Focus),
            _ => None,
        }
    }
}

/// Event types whose client/offset coordinates are recomputed per node.
pub(crate) fn uses_local_coordinates(event_type: &str) -> bool {
    matches!(event_type, "mousedown" | "mouseup" | "mousemove")
}

/// Units of a wheel delta.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DeltaMode {
    /// Pixels.
    #[default]
    Pixel,
    /// Lines.
    Line,
    /// Pages.
    Page,
}

/// Physical location of a key on the keyboard.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum KeyLocation {
    /// Not left/right or numpad specific.
    #[default]
    Standard,
    /// Left variant of a duplicated key.
    Left,
    /// Right variant of a duplicated key.
    Right,
    /// On the numeric keypad.
    Numpad,
}

/// Flags common to all events.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EventInit {
    /// Carried for listeners; traversal always includes the bubble pass.
    pub bubbles: bool,
    /// Whether [`Event::prevent_default`] has any effect.
    pub cancelable: bool,
}

/// Initializer for [`Event::mouse`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MouseEventInit {
    /// Common flags.
    pub event: EventInit,
    /// Button that changed state (0 primary, 1 auxiliary, 2 secondary).
    pub button: i16,
    /// Bitmask of buttons currently held.
    pub buttons: u16,
    /// Position in screen coordinates.
    pub screen: Point,
    /// Initial client position; recomputed per node for local-coordinate types.
    pub client: Point,
    /// Motion since the previous pointer event.
    pub movement: Vec2,
    /// Held modifier keys.
    pub modifiers: Modifiers,
}

/// Initializer for [`Event::wheel`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WheelEventInit {
    /// Pointer fields.
    pub mouse: MouseEventInit,
    /// Horizontal delta.
    pub delta_x: f64,
    /// Vertical delta.
    pub delta_y: f64,
    /// Depth delta.
    pub delta_z: f64,
    /// Units of the deltas.
    pub delta_mode: DeltaMode,
}

/// Initializer for [`Event::keyboard`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyboardEventInit {
    /// Common flags.
    pub event: EventInit,
    /// Logical key value, e.g. `"a"` or `"Enter"`.
    pub key: String,
    /// Physical key code, e.g. `"KeyA"`.
    pub code: String,
    /// Legacy numeric key code.
    pub key_code: u32,
    /// Location on the keyboard.
    pub location: KeyLocation,
    /// Auto-repeat.
    pub repeat: bool,
    /// Held modifier keys.
    pub modifiers: Modifiers,
}

/// Initializer for [`Event::focus`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FocusEventInit {
    /// Common flags.
    pub event: EventInit,
    /// The element losing (for `focusin`) or gaining (for `focusout`) focus.
    pub related_target: Option<Element>,
}

/// Pointer fields of mouse and wheel events.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MouseEvent {
    button: i16,
    buttons: u16,
    screen: Point,
    client: Point,
    offset: Point,
    movement: Vec2,
    modifiers: Modifiers,
}

impl MouseEvent {
    fn from_init(init: &MouseEventInit) -> Self {
        Self {
            button: init.button,
            buttons: init.buttons,
            screen: init.screen,
            client: init.client,
            offset: Point::ZERO,
            movement: init.movement,
            modifiers: init.modifiers,
        }
    }

    /// Button that changed state.
    pub fn button(&self) -> i16 {
        self.button
    }

    /// Bitmask of held buttons.
    pub fn buttons(&self) -> u16 {
        self.buttons
    }

    /// Screen position.
    pub fn screen(&self) -> Point {
        self.screen
    }

    /// Screen x.
    pub fn screen_x(&self) -> f64 {
        self.screen.x
    }

    /// Screen y.
    pub fn screen_y(&self) -> f64 {
        self.screen.y
    }

    /// Position in the current node's client space.
    pub fn client(&self) -> Point {
        self.client
    }

    /// Client x.
    pub fn client_x(&self) -> f64 {
        self.client.x
    }

    /// Client y.
    pub fn client_y(&self) -> f64 {
        self.client.y
    }

    /// Alias of [`client_x`](Self::client_x).
    pub fn x(&self) -> f64 {
        self.client.x
    }

    /// Alias of [`client_y`](Self::client_y).
    pub fn y(&self) -> f64 {
        self.client.y
    }

    /// Position in the current node's border-box space.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Offset x.
    pub fn offset_x(&self) -> f64 {
        self.offset.x
    }

    /// Offset y.
    pub fn offset_y(&self) -> f64 {
        self.offset.y
    }

    /// Motion since the previous pointer event.
    pub fn movement(&self) -> Vec2 {
        self.movement
    }

    /// Held modifiers.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Alt held.
    pub fn alt_key(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Control held.
    pub fn ctrl_key(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Shift held.
    pub fn shift_key(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Meta held.
    pub fn meta_key(&self) -> bool {
        self.modifiers.contains(Modifiers::META)
    }

    pub(crate) fn rebind(&mut self, client: Point, offset: Point) {
        self.client = client;
        self.offset = offset;
    }
}

/// Wheel fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WheelEvent {
    mouse: MouseEvent,
    delta_x: f64,
    delta_y: f64,
    delta_z: f64,
    delta_mode: DeltaMode,
}

impl WheelEvent {
    /// Pointer fields.
    pub fn mouse(&self) -> &MouseEvent {
        &self.mouse
    }

    /// Horizontal delta.
    pub fn delta_x(&self) -> f64 {
        self.delta_x
    }

    /// Vertical delta.
    pub fn delta_y(&self) -> f64 {
        self.delta_y
    }

    /// Depth delta.
    pub fn delta_z(&self) -> f64 {
        self.delta_z
    }

    /// Units of the deltas.
    pub fn delta_mode(&self) -> DeltaMode {
        self.delta_mode
    }
}

/// Keyboard fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyboardEvent {
    key: String,
    code: String,
    key_code: u32,
    location: KeyLocation,
    repeat: bool,
    modifiers: Modifiers,
}

impl KeyboardEvent {
    /// Logical key value.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Physical key code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Legacy numeric key code.
    pub fn key_code(&self) -> u32 {
        self.key_code
    }

    /// Location on the keyboard.
    pub fn location(&self) -> KeyLocation {
        self.location
    }

    /// Auto-repeat.
    pub fn repeat(&self) -> bool {
        self.repeat
    }

    /// Held modifiers.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Alt held.
    pub fn alt_key(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Control held.
    pub fn ctrl_key(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Shift held.
    pub fn shift_key(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Meta held.
    pub fn meta_key(&self) -> bool {
        self.modifiers.contains(Modifiers::META)
    }
}

/// Focus fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FocusEvent {
    related_target: Option<Element>,
}

impl FocusEvent {
    /// The other side of the focus transfer.
    pub fn related_target(&self) -> Option<&Element> {
        self.related_target.as_ref()
    }
}

/// Type-specific fields of an event.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EventPayload {
    /// No extra fields.
    #[default]
    Basic,
    /// Pointer event.
    Mouse(MouseEvent),
    /// Wheel event.
    Wheel(WheelEvent),
    /// Keyboard event.
    Keyboard(KeyboardEvent),
    /// Focus event.
    Focus(FocusEvent),
}

impl EventPayload {
    /// Discriminant.
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Basic => PayloadKind::Basic,
            Self::Mouse(_) => PayloadKind::Mouse,
            Self::Wheel(_) => PayloadKind::Wheel,
            Self::Keyboard(_) => PayloadKind::Keyboard,
            Self::Focus(_) => PayloadKind::Focus,
        }
    }
}

/// A DOM-style event.
///
/// ```
/// use boxdom::{Event, EventInit};
///
/// let mut event = Event::new("submit", EventInit { bubbles: true, cancelable: true });
/// event.prevent_default();
/// assert!(event.default_prevented());
///
/// let mut plain = Event::custom("scroll");
/// plain.prevent_default();
/// assert!(!plain.default_prevented());
/// ```
#[derive(Clone, Debug)]
pub struct Event {
    event_type: String,
    bubbles: bool,
    cancelable: bool,
    target: Option<Element>,
    current_target: Option<Element>,
    phase: EventPhase,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
    payload: EventPayload,
}

impl Event {
    fn with_payload(event_type: impl Into<String>, init: EventInit, payload: EventPayload) -> Self {
        Self {
            event_type: event_type.into(),
            bubbles: init.bubbles,
            cancelable: init.cancelable,
            target: None,
            current_target: None,
            phase: EventPhase::None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            payload,
        }
    }

    /// A basic event.
    pub fn new(event_type: impl Into<String>, init: EventInit) -> Self {
        Self::with_payload(event_type, init, EventPayload::Basic)
    }

    /// A basic event that neither bubbles nor can be canceled.
    pub fn custom(event_type: impl Into<String>) -> Self {
        Self::new(event_type, EventInit::default())
    }

    /// A mouse event. `offset` starts at the origin.
    pub fn mouse(event_type: impl Into<String>, init: MouseEventInit) -> Self {
        let payload = EventPayload::Mouse(MouseEvent::from_init(&init));
        Self::with_payload(event_type, init.event, payload)
    }

    /// A wheel event.
    pub fn wheel(event_type: impl Into<String>, init: WheelEventInit) -> Self {
        let payload = EventPayload::Wheel(WheelEvent {
            mouse: MouseEvent::from_init(&init.mouse),
            delta_x: init.delta_x,
            delta_y: init.delta_y,
            delta_z: init.delta_z,
            delta_mode: init.delta_mode,
        });
        Self::with_payload(event_type, init.mouse.event, payload)
    }

    /// A keyboard event.
    pub fn keyboard(event_type: impl Into<String>, init: KeyboardEventInit) -> Self {
        let KeyboardEventInit {
            event,
            key,
            code,
            key_code,
            location,
            repeat,
            modifiers,
        } = init;
        let payload = EventPayload::Keyboard(KeyboardEvent {
            key,
            code,
            key_code,
            location,
            repeat,
            modifiers,
        });
        Self::with_payload(event_type, event, payload)
    }

    /// A focus event.
    pub fn focus(event_type: impl Into<String>, init: FocusEventInit) -> Self {
        let payload = EventPayload::Focus(FocusEvent {
            related_target: init.related_target,
        });
        Self::with_payload(event_type, init.event, payload)
    }

    /// Type name, e.g. `"click"`.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Bubbles flag given at construction.
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// Cancelable flag given at construction.
    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Element the event was dispatched on.
    pub fn target(&self) -> Option<&Element> {
        self.target.as_ref()
    }

    /// Element whose listeners are currently running.
    pub fn current_target(&self) -> Option<&Element> {
        self.current_target.as_ref()
    }

    /// Current phase.
    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    /// Typed payload.
    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// Pointer fields of a mouse or wheel event.
    pub fn mouse_event(&self) -> Option<&MouseEvent> {
        match &self.payload {
            EventPayload::Mouse(mouse) => Some(mouse),
            EventPayload::Wheel(wheel) => Some(&wheel.mouse),
            _ => None,
        }
    }

    pub(crate) fn mouse_mut(&mut self) -> Option<&mut MouseEvent> {
        match &mut self.payload {
            EventPayload::Mouse(mouse) => Some(mouse),
            EventPayload::Wheel(wheel) => Some(&mut wheel.mouse),
            _ => None,
        }
    }

    /// Wheel fields.
    pub fn wheel_event(&self) -> Option<&WheelEvent> {
        match &self.payload {
            EventPayload::Wheel(wheel) => Some(wheel),
            _ => None,
        }
    }

    /// Keyboard fields.
    pub fn keyboard_event(&self) -> Option<&KeyboardEvent> {
        match &self.payload {
            EventPayload::Keyboard(key) => Some(key),
            _ => None,
        }
    }

    /// Focus fields.
    pub fn focus_event(&self) -> Option<&FocusEvent> {
        match &self.payload {
            EventPayload::Focus(focus) => Some(focus),
            _ => None,
        }
    }

    /// Ask the embedder to skip its default action. Ignored unless cancelable.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Whether [`prevent_default`](Self::prevent_default) took effect.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop traversal after the current node's listeners for this pass.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop traversal and skip the current node's remaining listeners.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// Whether traversal was stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub(crate) fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    pub(crate) fn begin(&mut self, target: Element) {
        self.target = Some(target);
        self.current_target = None;
        self.phase = EventPhase::None;
    }

    pub(crate) fn enter(&mut self, node: &Element, phase: EventPhase) {
        self.current_target = Some(node.clone());
        self.phase = phase;
    }

    pub(crate) fn finish(&mut self) {
        self.current_target = None;
        self.phase = EventPhase::None;
        self.propagation_stopped = false;
        self.immediate_propagation_stopped = false;
    }
}

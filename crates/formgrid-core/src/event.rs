#![forbid(unsafe_code)]

//! Canonical pointer input types.
//!
//! This module defines the standard pointer events consumed by the formgrid
//! state machines. Coordinates are viewport-local pixels with the origin at
//! the viewport's top-left corner.
//!
//! # Design Notes
//!
//! - Events are plain data; producing them from DOM, winit, or a test script
//!   is the host's job.
//! - `PointerButtons` use bitflags so multi-button states compose.
//! - `Cancel` models the platform's pointer-cancel (capture lost, touch
//!   interrupted); state machines treat it like an aborted interaction.

use bitflags::bitflags;

/// A position in viewport-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Horizontal offset from the viewport's left edge.
    pub x: f32,
    /// Vertical offset from the viewport's top edge.
    pub y: f32,
}

impl Position {
    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f32, f32)> for Position {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// The class of device a pointer event originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    /// A mouse or trackpad pointer.
    #[default]
    Mouse,
    /// A touch contact.
    Touch,
    /// A stylus/pen contact.
    Pen,
}

bitflags! {
    /// Pointer buttons held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        /// No buttons held.
        const NONE      = 0b0000;
        /// Primary button (usually left).
        const PRIMARY   = 0b0001;
        /// Secondary button (usually right).
        const SECONDARY = 0b0010;
        /// Auxiliary button (usually middle).
        const AUXILIARY = 0b0100;
    }
}

impl Default for PointerButtons {
    fn default() -> Self {
        Self::NONE
    }
}

/// The kind of pointer transition an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    /// A button was pressed.
    Down,
    /// The pointer moved.
    Move,
    /// A button was released.
    Up,
    /// The pointer entered the viewport.
    Enter,
    /// The pointer left the viewport.
    Leave,
    /// The interaction was aborted by the platform (capture lost).
    Cancel,
}

/// A single pointer event in viewport-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// The transition this event reports.
    pub kind: PointerEventKind,
    /// Pointer position at the time of the event.
    pub position: Position,
    /// Buttons held during the event.
    pub buttons: PointerButtons,
    /// Originating device class.
    pub pointer: PointerKind,
}

impl PointerEvent {
    /// Create an event of the given kind at a position, no buttons held.
    #[must_use]
    pub fn new(kind: PointerEventKind, position: impl Into<Position>) -> Self {
        Self {
            kind,
            position: position.into(),
            buttons: PointerButtons::NONE,
            pointer: PointerKind::Mouse,
        }
    }

    /// A primary-button press at `position`.
    #[must_use]
    pub fn down(position: impl Into<Position>) -> Self {
        Self::new(PointerEventKind::Down, position).with_buttons(PointerButtons::PRIMARY)
    }

    /// A pointer move to `position`.
    #[must_use]
    pub fn moved(position: impl Into<Position>) -> Self {
        Self::new(PointerEventKind::Move, position)
    }

    /// A button release at `position`.
    #[must_use]
    pub fn up(position: impl Into<Position>) -> Self {
        Self::new(PointerEventKind::Up, position)
    }

    /// The pointer entering the viewport at `position`.
    #[must_use]
    pub fn enter(position: impl Into<Position>) -> Self {
        Self::new(PointerEventKind::Enter, position)
    }

    /// The pointer leaving the viewport at `position`.
    #[must_use]
    pub fn leave(position: impl Into<Position>) -> Self {
        Self::new(PointerEventKind::Leave, position)
    }

    /// A platform-initiated cancellation at `position`.
    #[must_use]
    pub fn cancel(position: impl Into<Position>) -> Self {
        Self::new(PointerEventKind::Cancel, position)
    }

    /// Replace the held-button set.
    #[must_use]
    pub const fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Replace the originating device class.
    #[must_use]
    pub const fn with_pointer(mut self, pointer: PointerKind) -> Self {
        self.pointer = pointer;
        self
    }

    /// Check if the primary button is held.
    #[must_use]
    pub const fn primary(&self) -> bool {
        self.buttons.contains(PointerButtons::PRIMARY)
    }
}

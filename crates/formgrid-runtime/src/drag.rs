#![forbid(unsafe_code)]

//! Drag-to-swap pointer state machine.
//!
//! [`DragSwapController`] is a stateful processor that converts raw
//! [`PointerEvent`]s into semantic [`DragEvent`]s, using the grid geometry
//! for hit-testing and the mapping store to decide which cells can be picked
//! up or dropped on.
//!
//! # State Machine
//!
//! Two states: `Idle` and `Dragging { origin }`. Hover and the ghost
//! position are auxiliary render state with no state-machine significance.
//!
//! - `Idle` → `Dragging`: pointer-down over a cell that currently holds a
//!   flyer. Down over a hole, an empty cell, or outside the grid stays idle.
//! - `Dragging` → `Idle`: pointer-up. With a valid hover the drag completes
//!   and the caller commits the swap; otherwise it cancels silently.
//! - Pointer-leave during a drag clears the hover but keeps the origin, so
//!   a drag survives excursions outside the viewport (pointer capture
//!   semantics). A platform cancel aborts the drag outright.
//!
//! # Invariants
//!
//! 1. A hover is only ever a currently-assigned cell different from the
//!    drag origin; anything else reads as "no target".
//! 2. `Completed` and `Canceled` are mutually exclusive per interaction and
//!    always return the controller to `Idle`.
//! 3. A cancelled drag issues no swap, so no network traffic can result.

use formgrid_core::{CellField, CellIndex, GridGeometry, PointerEvent, PointerEventKind, Position};

use crate::mapping::MappingStore;

/// The controller's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    /// No drag in progress.
    #[default]
    Idle,
    /// A slot is being dragged.
    Dragging {
        /// The cell the drag started from.
        origin: CellIndex,
    },
}

/// Pointer cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    /// Nothing interactive under the pointer.
    #[default]
    Default,
    /// An assigned slot is under the pointer.
    Grab,
    /// A drag is in progress.
    Grabbing,
}

/// Semantic events produced by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    /// A drag started from `origin`.
    PickedUp {
        /// The cell the slot was picked up from.
        origin: CellIndex,
    },
    /// The hovered drop target changed.
    HoverChanged {
        /// The new hover, or `None` when no valid target is under the
        /// pointer.
        hover: Option<CellIndex>,
    },
    /// The drag released over a valid target; the caller should swap.
    Completed {
        /// The cell the drag started from.
        origin: CellIndex,
        /// The cell the slot was dropped on.
        target: CellIndex,
    },
    /// The drag ended with no swap.
    Canceled,
}

/// Stateful drag-to-swap recognizer.
///
/// Call [`process`](Self::process) for each incoming pointer event. The
/// controller never mutates the mapping itself; a `Completed` event tells
/// the caller to run the swap.
#[derive(Debug, Clone, Default)]
pub struct DragSwapController {
    phase: DragPhase,
    hover: Option<CellIndex>,
    ghost: Option<Position>,
}

impl DragSwapController {
    /// Create an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        self.phase
    }

    /// The drag origin, if a drag is in progress.
    #[must_use]
    pub const fn origin(&self) -> Option<CellIndex> {
        match self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging { origin } => Some(origin),
        }
    }

    /// The current hover.
    ///
    /// While dragging this is the valid drop target, if any. While idle it
    /// is the assigned cell under the pointer (the grab affordance).
    #[inline]
    #[must_use]
    pub const fn hover(&self) -> Option<CellIndex> {
        self.hover
    }

    /// Raw pointer position for the drag ghost, while one is shown.
    #[inline]
    #[must_use]
    pub const fn ghost(&self) -> Option<Position> {
        self.ghost
    }

    /// Check if a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// The cursor the host should show.
    #[must_use]
    pub const fn cursor(&self) -> CursorStyle {
        if self.is_dragging() {
            CursorStyle::Grabbing
        } else if self.hover.is_some() {
            CursorStyle::Grab
        } else {
            CursorStyle::Default
        }
    }

    /// Drop all interaction state and return to `Idle`.
    ///
    /// Does not emit `Canceled`; focus-loss handling is the caller's call.
    pub fn reset(&mut self) {
        self.phase = DragPhase::Idle;
        self.hover = None;
        self.ghost = None;
    }

    /// Process a raw pointer event, returning any semantic events produced.
    pub fn process(
        &mut self,
        event: &PointerEvent,
        geometry: &GridGeometry,
        field: &CellField,
        store: &MappingStore,
    ) -> Vec<DragEvent> {
        let mut out = Vec::with_capacity(2);
        match event.kind {
            PointerEventKind::Down => self.on_down(event.position, geometry, field, store, &mut out),
            PointerEventKind::Move | PointerEventKind::Enter => {
                self.on_move(event.position, geometry, field, store, &mut out);
            }
            PointerEventKind::Up => self.on_up(store, &mut out),
            PointerEventKind::Leave => self.on_leave(&mut out),
            PointerEventKind::Cancel => self.on_cancel(&mut out),
        }
        out
    }

    fn on_down(
        &mut self,
        position: Position,
        geometry: &GridGeometry,
        field: &CellField,
        store: &MappingStore,
        out: &mut Vec<DragEvent>,
    ) {
        if self.is_dragging() {
            // A second button during a drag carries no meaning.
            return;
        }
        let Some(origin) = geometry.hit_test(position, field) else {
            return;
        };
        if !store.is_assigned(origin) {
            return;
        }
        self.phase = DragPhase::Dragging { origin };
        self.ghost = Some(position);
        // The origin reads as blank from here; hover is whatever the
        // pointer moves over next.
        self.set_hover(None, out);
        tracing::debug!(%origin, "drag started");
        out.push(DragEvent::PickedUp { origin });
    }

    fn on_move(
        &mut self,
        position: Position,
        geometry: &GridGeometry,
        field: &CellField,
        store: &MappingStore,
        out: &mut Vec<DragEvent>,
    ) {
        self.ghost = Some(position);
        let hit = geometry.hit_test(position, field);
        let hover = match self.phase {
            DragPhase::Dragging { origin } => {
                hit.filter(|&cell| cell != origin && store.is_assigned(cell))
            }
            DragPhase::Idle => hit.filter(|&cell| store.is_assigned(cell)),
        };
        self.set_hover(hover, out);
    }

    fn on_up(&mut self, store: &MappingStore, out: &mut Vec<DragEvent>) {
        let DragPhase::Dragging { origin } = self.phase else {
            return;
        };
        let target = self.hover;
        self.reset();
        match target {
            // Both ends must still be occupied at release time.
            Some(target)
                if target != origin && store.is_assigned(origin) && store.is_assigned(target) =>
            {
                tracing::debug!(%origin, %target, "drag completed");
                out.push(DragEvent::Completed { origin, target });
            }
            _ => {
                tracing::debug!(%origin, "drag canceled on release");
                out.push(DragEvent::Canceled);
            }
        }
    }

    fn on_leave(&mut self, out: &mut Vec<DragEvent>) {
        match self.phase {
            DragPhase::Dragging { .. } => {
                // Origin survives; the drag continues until pointer-up.
                self.set_hover(None, out);
            }
            DragPhase::Idle => {
                self.set_hover(None, out);
                self.ghost = None;
            }
        }
    }

    fn on_cancel(&mut self, out: &mut Vec<DragEvent>) {
        let was_dragging = self.is_dragging();
        self.reset();
        if was_dragging {
            tracing::debug!("drag canceled by platform");
            out.push(DragEvent::Canceled);
        }
    }

    fn set_hover(&mut self, hover: Option<CellIndex>, out: &mut Vec<DragEvent>) {
        if self.hover != hover {
            self.hover = hover;
            out.push(DragEvent::HoverChanged { hover });
        }
    }
}

#![forbid(unsafe_code)]

//! The step view session: one formation's mapping under interaction.
//!
//! [`StepSession`] wires the loaded snapshot (cells, roster, assignments,
//! rotation) to the drag controller and the mapping store, and turns drag
//! completions into swap commits. It owns the local optimistic copy for the
//! duration of one view; the backend owns the durable record and is the
//! arbiter of validity.
//!
//! Hosts drive it with three inputs (pointer events, viewport resizes, and
//! commit outcomes) and paint [`StepSession::view`] after each update.

use formgrid_backend::{CommitToken, MutationOp, MutationOutcome, MutationRequest};
use formgrid_core::{
    Assignment, Bounds, Cell, CellField, GridConfig, GridGeometry, PointerEvent, Roster,
    RosterEntry, StepId, ViewRotation,
};

use crate::command::Cmd;
use crate::drag::{DragEvent, DragSwapController};
use crate::mapping::{MappingStore, SwapResolution};
use crate::view::{GridViewModel, project_grid};

/// Fixed window shown when the formation has no cells, in cells from the
/// origin.
pub const STEP_EMPTY_RADIUS: i32 = 3;

/// Per-cell pixel size used by the step view.
pub const STEP_CELL_SIZE: f32 = 32.0;

/// A server snapshot of everything one step view renders.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepSnapshot {
    /// The formation's cells.
    pub cells: Vec<Cell>,
    /// The sequence roster.
    pub roster: Vec<RosterEntry>,
    /// The step's current assignments.
    pub assignments: Vec<Assignment>,
    /// Persisted view rotation in degrees.
    pub rotation_deg: f32,
}

/// Messages the session consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionMsg {
    /// A raw pointer event in viewport-local coordinates.
    Pointer(PointerEvent),
    /// The square viewport was resized to `px` a side.
    ViewportResized(f32),
    /// A commit issued by this session resolved.
    CommitResolved(MutationOutcome),
    /// A fresh server snapshot replaces the local state.
    Reload(StepSnapshot),
}

/// One step view's interaction state.
#[derive(Debug)]
pub struct StepSession {
    step: StepId,
    field: CellField,
    roster: Roster,
    store: MappingStore,
    drag: DragSwapController,
    bounds: Bounds,
    rotation: ViewRotation,
    config: GridConfig,
    error: Option<String>,
    next_token: u64,
}

impl StepSession {
    /// Create a session from a loaded snapshot.
    #[must_use]
    pub fn new(step: StepId, snapshot: StepSnapshot) -> Self {
        let mut session = Self {
            step,
            field: CellField::default(),
            roster: Roster::default(),
            store: MappingStore::default(),
            drag: DragSwapController::new(),
            bounds: Bounds::symmetric(STEP_EMPTY_RADIUS),
            rotation: ViewRotation::ZERO,
            config: GridConfig::new(STEP_CELL_SIZE, 420.0),
            error: None,
            next_token: 0,
        };
        session.install(snapshot);
        session
    }

    /// The loaded formation.
    #[must_use]
    pub fn field(&self) -> &CellField {
        &self.field
    }

    /// The sequence roster.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The mapping store.
    #[must_use]
    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    /// The drag controller.
    #[must_use]
    pub fn drag(&self) -> &DragSwapController {
        &self.drag
    }

    /// Current display bounds.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Current view rotation.
    #[inline]
    #[must_use]
    pub const fn rotation(&self) -> ViewRotation {
        self.rotation
    }

    /// The last swap failure surfaced to the user, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The render transform for the current bounds, rotation, and viewport.
    #[must_use]
    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::new(self.bounds, self.config, self.rotation)
    }

    /// Project the current state for painting.
    #[must_use]
    pub fn view(&self) -> GridViewModel {
        project_grid(
            self.bounds,
            self.rotation,
            &self.field,
            &self.store,
            &self.drag,
        )
    }

    /// Apply a message and return the side effect to run.
    pub fn update(&mut self, msg: SessionMsg) -> Cmd {
        match msg {
            SessionMsg::Pointer(event) => self.on_pointer(&event),
            SessionMsg::ViewportResized(px) => {
                self.config.viewport = px;
                Cmd::none()
            }
            SessionMsg::CommitResolved(outcome) => {
                match self.store.resolve(outcome.token, &outcome.result) {
                    SwapResolution::Confirmed => Cmd::refresh(),
                    SwapResolution::RolledBack { reason } => {
                        self.error = Some(reason);
                        Cmd::none()
                    }
                    SwapResolution::Unknown => Cmd::none(),
                }
            }
            SessionMsg::Reload(snapshot) => {
                self.install(snapshot);
                Cmd::none()
            }
        }
    }

    fn on_pointer(&mut self, event: &PointerEvent) -> Cmd {
        let geometry = self.geometry();
        let events = self.drag.process(event, &geometry, &self.field, &self.store);

        let mut cmds = Vec::new();
        for drag_event in events {
            match drag_event {
                DragEvent::PickedUp { .. } => {
                    // A fresh interaction clears the previous failure.
                    self.error = None;
                }
                DragEvent::Completed { origin, target } => {
                    self.next_token += 1;
                    let token = CommitToken(self.next_token);
                    if let Some((flyer_a, flyer_b)) =
                        self.store.begin_swap(origin, target, token)
                    {
                        cmds.push(Cmd::mutate(MutationRequest::new(
                            token,
                            MutationOp::SwapFlyers {
                                step: self.step.clone(),
                                flyer_a,
                                flyer_b,
                            },
                        )));
                    }
                }
                DragEvent::HoverChanged { .. } | DragEvent::Canceled => {}
            }
        }
        Cmd::batch(cmds)
    }

    fn install(&mut self, snapshot: StepSnapshot) {
        self.bounds = Bounds::enclosing(snapshot.cells.iter().map(|c| c.key))
            .unwrap_or_else(|| Bounds::symmetric(STEP_EMPTY_RADIUS));
        self.roster = Roster::new(snapshot.roster);
        self.store = MappingStore::new(&self.roster, &snapshot.assignments);
        self.field = CellField::new(snapshot.cells);
        self.rotation = ViewRotation::from_degrees(snapshot.rotation_deg);
        self.drag.reset();
        self.error = None;
    }
}

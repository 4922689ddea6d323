#![forbid(unsafe_code)]

//! Formgrid public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for hosts. It
//! re-exports the common types from the internal crates and offers a
//! lightweight prelude for day-to-day usage.
//!
//! The engine is pure state: hosts feed pointer events and backend outcomes
//! into the models, execute the returned commands, and paint the projected
//! view. See [`StepSession`] for the step view and [`GridEditor`] for
//! formation authoring.

// --- Core re-exports -------------------------------------------------------

pub use formgrid_core::event::{
    PointerButtons, PointerEvent, PointerEventKind, PointerKind, Position,
};
pub use formgrid_core::geometry::{GridConfig, GridGeometry};
pub use formgrid_core::grid::{Bounds, Cell, CellField, CellIndex, CellKey, CellSet};
pub use formgrid_core::ids::{FormationId, StepId};
pub use formgrid_core::roster::{Assignment, FlyerId, Roster, RosterEntry};
pub use formgrid_core::rotation::{ROTATION_STEP_DEG, ViewRotation};

// --- Backend re-exports ----------------------------------------------------

pub use formgrid_backend::{
    BackendError, CommitToken, ExecutorClosed, MutationBackend, MutationExecutor, MutationKind,
    MutationOp, MutationOutcome, MutationRequest,
};
#[cfg(feature = "test-helpers")]
pub use formgrid_backend::{RecordedCall, ScriptedBackend};

// --- Runtime re-exports ----------------------------------------------------

pub use formgrid_runtime::{
    Cmd, CursorStyle, DragEvent, DragPhase, DragSwapController, EditorMsg, GhostView, GridEditor,
    GridViewModel, MappingStore, Notice, SessionMsg, Slot, StepSession, StepSnapshot, SwapResolution,
    TileContent, TileView, project_grid,
};

/// Common imports for hosts.
pub mod prelude {
    pub use crate::{
        Bounds, Cell, CellIndex, CellKey, Cmd, CursorStyle, EditorMsg, FlyerId, FormationId,
        GridConfig, GridEditor, GridGeometry, MutationBackend, MutationExecutor, MutationOutcome,
        PointerEvent, SessionMsg, StepId, StepSession, StepSnapshot, ViewRotation,
    };
}

#![forbid(unsafe_code)]

//! Leaf types and pure math for the formgrid engine.
//!
//! This crate holds everything the stateful layers build on: canonical
//! pointer events, cell/bounds/roster snapshot types, view rotation, and the
//! rotated scale-to-fit grid geometry with its inverse hit-test. Nothing
//! here performs I/O or holds mutable session state.

pub mod event;
pub mod geometry;
pub mod grid;
pub mod ids;
pub mod roster;
pub mod rotation;

pub use event::{PointerButtons, PointerEvent, PointerEventKind, PointerKind, Position};
pub use geometry::{GridConfig, GridGeometry};
pub use grid::{Bounds, Cell, CellField, CellIndex, CellKey, CellSet};
pub use ids::{FormationId, StepId};
pub use roster::{Assignment, FlyerId, Roster, RosterEntry};
pub use rotation::{ROTATION_STEP_DEG, ViewRotation};

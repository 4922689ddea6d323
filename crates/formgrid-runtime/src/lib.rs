#![forbid(unsafe_code)]

//! Stateful models for the formgrid engine.
//!
//! Reactive UI state is re-expressed here as explicit state structs plus
//! transition functions consuming discrete messages: the grid editor for
//! formation authoring, the mapping store for the flyer ⇄ cell bijection
//! with optimistic swaps, the drag controller turning pointer events into
//! swap intents, and the step session wiring them together. Updates return
//! [`Cmd`] values; the host executes them and feeds outcomes back.

pub mod command;
pub mod drag;
pub mod editor;
pub mod mapping;
pub mod session;
pub mod view;

pub use command::Cmd;
pub use drag::{CursorStyle, DragEvent, DragPhase, DragSwapController};
pub use editor::{
    EDITOR_BOUNDS_MARGIN, EDITOR_CELL_SIZE, EDITOR_EMPTY_RADIUS, EditorMsg, GridEditor, Notice,
};
pub use mapping::{MappingStore, Slot, SwapResolution};
pub use session::{STEP_CELL_SIZE, STEP_EMPTY_RADIUS, SessionMsg, StepSession, StepSnapshot};
pub use view::{GhostView, GridViewModel, TileContent, TileView, project_grid};

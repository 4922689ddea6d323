#![forbid(unsafe_code)]

//! Formation authoring: the toggle-grid editor model.
//!
//! The editor owns a membership-only cell set, its display bounds, and the
//! view rotation while a formation is being shaped. Cells toggle freely with
//! no local validation; the backend checks 4-neighbor connectivity when the
//! set is saved, and its verdict is only displayed, never interpreted.
//!
//! # Invariants
//!
//! 1. Bounds are recomputed from loaded cells only when the loaded count
//!    changes, so a mid-edit `Expand` is never clobbered by a stale
//!    recompute.
//! 2. `StepRotation` only ever produces the eight 45°-snapped orientations;
//!    `SetRotation` accepts any angle (the snap is control policy, not a
//!    data-model rule).
//! 3. A failed save keeps the local edits; only the notice changes.

use ahash::AHashMap;

use formgrid_backend::{
    CommitToken, MutationKind, MutationOp, MutationOutcome, MutationRequest,
};
use formgrid_core::{Bounds, CellKey, CellSet, FormationId, GridConfig, GridGeometry, ViewRotation};

use crate::command::Cmd;

/// Fixed window shown when a formation has no cells yet, in cells from the
/// origin.
pub const EDITOR_EMPTY_RADIUS: i32 = 6;

/// Padding around the loaded shape, in cells per side, so newly toggled
/// cells can extend beyond it.
pub const EDITOR_BOUNDS_MARGIN: i32 = 2;

/// Per-cell pixel size used by the editor grid.
pub const EDITOR_CELL_SIZE: f32 = 24.0;

/// A user-facing status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A confirmation, e.g. after a successful save.
    Info(String),
    /// A failure reason, passed through from the backend verbatim.
    Error(String),
}

impl Notice {
    /// The message text, whatever the flavor.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Info(msg) | Self::Error(msg) => msg,
        }
    }
}

/// Messages the editor consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMsg {
    /// Flip membership of one cell.
    Toggle(CellKey),
    /// Grow the display bounds by `delta` cells on every side.
    Expand(i32),
    /// Remove every cell.
    Clear,
    /// Set the view rotation to an arbitrary angle.
    SetRotation(f32),
    /// Set the view rotation back to zero.
    ResetRotation,
    /// Step the rotation by `delta` degrees and snap to 45°.
    StepRotation(f32),
    /// Persist the cell set.
    SaveCells,
    /// Persist the view rotation.
    SaveRotation,
    /// Replace the set from a persisted snapshot.
    Load(Vec<CellKey>),
    /// A commit issued by this editor resolved.
    CommitResolved(MutationOutcome),
}

/// The formation grid editor.
#[derive(Debug)]
pub struct GridEditor {
    formation: FormationId,
    cells: CellSet,
    bounds: Bounds,
    rotation: ViewRotation,
    config: GridConfig,
    notice: Option<Notice>,
    pending: AHashMap<CommitToken, MutationKind>,
    loaded_len: usize,
    next_token: u64,
}

impl GridEditor {
    /// Create an editor over a formation's persisted cells and rotation.
    #[must_use]
    pub fn new(formation: FormationId, cells: Vec<CellKey>, rotation_deg: f32) -> Self {
        let set: CellSet = cells.into_iter().collect();
        let bounds = authored_bounds(&set);
        let loaded_len = set.len();
        Self {
            formation,
            cells: set,
            bounds,
            rotation: ViewRotation::from_degrees(rotation_deg),
            config: GridConfig::new(EDITOR_CELL_SIZE, 420.0),
            notice: None,
            pending: AHashMap::new(),
            loaded_len,
            next_token: 0,
        }
    }

    /// The cell set being authored.
    #[must_use]
    pub fn cells(&self) -> &CellSet {
        &self.cells
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

    /// The current status line, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Check whether any save is awaiting a verdict.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Replace the viewport size (the host box may resize).
    pub fn set_viewport(&mut self, viewport: f32) {
        self.config.viewport = viewport;
    }

    /// The render transform for the current bounds and rotation.
    ///
    /// Hosts use its inverse to map clicks on the rotated grid back to a
    /// [`CellKey`] for [`EditorMsg::Toggle`], holes included, since
    /// toggling empty positions is the point of authoring.
    #[must_use]
    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::new(self.bounds, self.config, self.rotation)
    }

    /// Apply a message and return the side effect to run.
    pub fn update(&mut self, msg: EditorMsg) -> Cmd {
        match msg {
            EditorMsg::Toggle(key) => {
                self.notice = None;
                let on = self.cells.toggle(key);
                tracing::debug!(%key, on, "cell toggled");
                Cmd::none()
            }
            EditorMsg::Expand(delta) => {
                self.bounds = self.bounds.padded(delta);
                Cmd::none()
            }
            EditorMsg::Clear => {
                self.cells.clear();
                Cmd::none()
            }
            EditorMsg::SetRotation(deg) => {
                self.rotation = ViewRotation::from_degrees(deg);
                Cmd::none()
            }
            EditorMsg::ResetRotation => {
                self.rotation = ViewRotation::ZERO;
                Cmd::none()
            }
            EditorMsg::StepRotation(delta) => {
                self.rotation = self.rotation.stepped(delta);
                Cmd::none()
            }
            EditorMsg::SaveCells => {
                self.notice = None;
                let token = self.mint_token(MutationKind::SaveCells);
                Cmd::mutate(MutationRequest::new(
                    token,
                    MutationOp::SaveCells {
                        formation: self.formation.clone(),
                        cells: self.cells.sorted_keys(),
                    },
                ))
            }
            EditorMsg::SaveRotation => {
                self.notice = None;
                let token = self.mint_token(MutationKind::SetViewRotation);
                Cmd::mutate(MutationRequest::new(
                    token,
                    MutationOp::SetViewRotation {
                        formation: self.formation.clone(),
                        degrees: self.rotation.degrees(),
                    },
                ))
            }
            EditorMsg::Load(cells) => {
                self.cells = cells.into_iter().collect();
                // Only a changed, non-empty load moves the window; an edit
                // in progress keeps its expanded view otherwise.
                if self.cells.len() != self.loaded_len && !self.cells.is_empty() {
                    self.bounds = authored_bounds(&self.cells);
                }
                self.loaded_len = self.cells.len();
                Cmd::none()
            }
            EditorMsg::CommitResolved(outcome) => {
                let Some(kind) = self.pending.remove(&outcome.token) else {
                    return Cmd::none();
                };
                self.notice = Some(match outcome.result {
                    Ok(()) => Notice::Info(
                        match kind {
                            MutationKind::SaveCells => "Cells saved.",
                            MutationKind::SetViewRotation => "Rotation saved.",
                            MutationKind::SwapFlyers => "Saved.",
                        }
                        .to_owned(),
                    ),
                    Err(err) => Notice::Error(err.reason().to_owned()),
                });
                Cmd::none()
            }
        }
    }

    fn mint_token(&mut self, kind: MutationKind) -> CommitToken {
        self.next_token += 1;
        let token = CommitToken(self.next_token);
        self.pending.insert(token, kind);
        token
    }
}

/// Bounds for an authored set: the padded tight extent, or the fixed empty
/// window.
fn authored_bounds(cells: &CellSet) -> Bounds {
    Bounds::enclosing(cells.iter())
        .map(|b| b.padded(EDITOR_BOUNDS_MARGIN))
        .unwrap_or_else(|| Bounds::symmetric(EDITOR_EMPTY_RADIUS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgrid_backend::BackendError;

    fn editor_with(cells: &[(i32, i32)]) -> GridEditor {
        GridEditor::new(
            FormationId::from("formation-1"),
            cells.iter().map(|&(c, r)| CellKey::new(c, r)).collect(),
            0.0,
        )
    }

    fn resolve(editor: &mut GridEditor, cmd: &Cmd, result: Result<(), BackendError>) -> Cmd {
        let Cmd::Mutate(request) = cmd else {
            panic!("expected a mutation command");
        };
        editor.update(EditorMsg::CommitResolved(MutationOutcome {
            token: request.token,
            kind: request.op.kind(),
            result,
        }))
    }

    #[test]
    fn empty_formation_gets_fixed_window() {
        let editor = editor_with(&[]);
        assert_eq!(editor.bounds(), Bounds::symmetric(EDITOR_EMPTY_RADIUS));
    }

    #[test]
    fn loaded_formation_gets_padded_bounds() {
        let editor = editor_with(&[(0, 0), (3, 1)]);
        assert_eq!(editor.bounds(), Bounds::new(-2, 5, -2, 3));
    }

    #[test]
    fn toggle_clears_notice_and_flips() {
        let mut editor = editor_with(&[(0, 0)]);
        let cmd = editor.update(EditorMsg::SaveCells);
        resolve(&mut editor, &cmd, Ok(()));
        assert!(matches!(editor.notice(), Some(Notice::Info(_))));

        editor.update(EditorMsg::Toggle(CellKey::new(1, 0)));
        assert!(editor.notice().is_none());
        assert!(editor.cells().contains(CellKey::new(1, 0)));
        editor.update(EditorMsg::Toggle(CellKey::new(1, 0)));
        assert!(!editor.cells().contains(CellKey::new(1, 0)));
    }

    #[test]
    fn expand_grows_without_touching_membership() {
        let mut editor = editor_with(&[(0, 0)]);
        let before = editor.bounds();
        editor.update(EditorMsg::Expand(1));
        assert_eq!(editor.bounds(), before.padded(1));
        assert_eq!(editor.cells().len(), 1);
    }

    #[test]
    fn toggling_never_recomputes_bounds() {
        let mut editor = editor_with(&[(0, 0)]);
        editor.update(EditorMsg::Expand(3));
        let expanded = editor.bounds();
        // Toggling far outside the loaded shape keeps the expanded window.
        editor.update(EditorMsg::Toggle(CellKey::new(4, 4)));
        assert_eq!(editor.bounds(), expanded);
    }

    #[test]
    fn load_recomputes_bounds_only_on_count_change() {
        let mut editor = editor_with(&[(0, 0)]);
        editor.update(EditorMsg::Expand(5));
        let expanded = editor.bounds();

        // Same count: window preserved.
        editor.update(EditorMsg::Load(vec![CellKey::new(1, 1)]));
        assert_eq!(editor.bounds(), expanded);

        // Count changed: window follows the new shape.
        editor.update(EditorMsg::Load(vec![CellKey::new(0, 0), CellKey::new(5, 0)]));
        assert_eq!(editor.bounds(), Bounds::new(-2, 7, -2, 2));
    }

    #[test]
    fn save_cells_sends_sorted_payload() {
        let mut editor = editor_with(&[(2, 1), (0, 0), (1, 0)]);
        let cmd = editor.update(EditorMsg::SaveCells);
        let requests = cmd.requests();
        assert_eq!(requests.len(), 1);
        match &requests[0].op {
            MutationOp::SaveCells { formation, cells } => {
                assert_eq!(formation.as_str(), "formation-1");
                assert_eq!(
                    cells,
                    &vec![CellKey::new(0, 0), CellKey::new(1, 0), CellKey::new(2, 1)]
                );
            }
            other => panic!("unexpected op: {other:?}"),
        }
        assert!(editor.has_pending());
    }

    #[test]
    fn save_rotation_sends_normalized_degrees() {
        let mut editor = editor_with(&[(0, 0)]);
        editor.update(EditorMsg::SetRotation(-45.0));
        let cmd = editor.update(EditorMsg::SaveRotation);
        match &cmd.requests()[0].op {
            MutationOp::SetViewRotation { degrees, .. } => assert_eq!(*degrees, 315.0),
            other => panic!("unexpected op: {other:?}"),
        }
    }

    #[test]
    fn step_rotation_snaps_and_wraps() {
        let mut editor = editor_with(&[(0, 0)]);
        editor.update(EditorMsg::StepRotation(-45.0));
        assert_eq!(editor.rotation().degrees(), 315.0);
        editor.update(EditorMsg::StepRotation(45.0));
        editor.update(EditorMsg::StepRotation(45.0));
        assert_eq!(editor.rotation().degrees(), 45.0);
        editor.update(EditorMsg::ResetRotation);
        assert_eq!(editor.rotation(), ViewRotation::ZERO);
    }

    #[test]
    fn failed_save_keeps_edits_and_reports_reason() {
        let mut editor = editor_with(&[(0, 0), (1, 0)]);
        let cmd = editor.update(EditorMsg::SaveCells);
        resolve(
            &mut editor,
            &cmd,
            Err(BackendError::ValidationRejected(
                "cells must form a connected shape".into(),
            )),
        );
        assert_eq!(
            editor.notice(),
            Some(&Notice::Error("cells must form a connected shape".into()))
        );
        assert_eq!(editor.cells().len(), 2);
        assert!(!editor.has_pending());
    }

    #[test]
    fn successful_saves_report_by_kind() {
        let mut editor = editor_with(&[(0, 0)]);
        let cmd = editor.update(EditorMsg::SaveCells);
        resolve(&mut editor, &cmd, Ok(()));
        assert_eq!(editor.notice(), Some(&Notice::Info("Cells saved.".into())));

        let cmd = editor.update(EditorMsg::SaveRotation);
        resolve(&mut editor, &cmd, Ok(()));
        assert_eq!(
            editor.notice(),
            Some(&Notice::Info("Rotation saved.".into()))
        );
    }

    #[test]
    fn stale_outcome_is_ignored() {
        let mut editor = editor_with(&[(0, 0)]);
        let cmd = editor.update(EditorMsg::CommitResolved(MutationOutcome::ok(
            CommitToken(42),
            MutationKind::SaveCells,
        )));
        assert!(cmd.is_none());
        assert!(editor.notice().is_none());
    }

    #[test]
    fn clear_empties_the_set() {
        let mut editor = editor_with(&[(0, 0), (1, 0), (2, 0)]);
        editor.update(EditorMsg::Clear);
        assert!(editor.cells().is_empty());
    }
}

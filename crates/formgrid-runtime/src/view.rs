#![forbid(unsafe_code)]

//! View projection: pure render state derived from the models.
//!
//! The host paints whatever this module computes and nothing else. All
//! drag-time presentation (the blank origin, the dashed drop spot, the
//! live preview label, the ghost) is derived here from the committed
//! mapping plus the controller's interaction state, and is discarded
//! wholesale when the drag ends. The committed mapping is never touched to
//! produce a preview.

use formgrid_core::{Bounds, CellField, CellIndex, CellKey, FlyerId, Position, ViewRotation};

use crate::drag::{CursorStyle, DragSwapController};
use crate::mapping::MappingStore;

/// What one grid tile shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileContent {
    /// No formation cell at this key; painted as background.
    Hole,
    /// A formation cell with no flyer.
    Empty,
    /// An occupied cell showing its flyer's label.
    Label {
        /// 1-based roster label.
        label: u32,
        /// The flyer shown.
        flyer: FlyerId,
    },
    /// The drag origin while no valid target is hovered: blank, only the
    /// ghost shows the slot.
    BlankOrigin,
    /// The drag origin while a valid target is hovered: previews the
    /// target's slot as it would land after the swap.
    Preview {
        /// The hovered target's 1-based label.
        label: u32,
        /// The hovered target's flyer.
        flyer: FlyerId,
    },
    /// The hovered drop target: a dashed blank.
    DropSpot,
}

/// One tile of the projected grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileView {
    /// Grid coordinate of the tile.
    pub key: CellKey,
    /// The formation cell at this key, if any.
    pub cell: Option<CellIndex>,
    /// What to paint.
    pub content: TileContent,
}

/// The drag ghost following the raw pointer position.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostView {
    /// Viewport-local pointer position.
    pub position: Position,
    /// Label of the dragged slot.
    pub label: u32,
    /// Flyer of the dragged slot.
    pub flyer: FlyerId,
}

/// Everything the host needs to paint one frame of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridViewModel {
    /// Tiles in row-major bounds order.
    pub tiles: Vec<TileView>,
    /// The drag ghost, while a drag is in progress.
    pub ghost: Option<GhostView>,
    /// Cursor to show.
    pub cursor: CursorStyle,
    /// Degrees to counter-rotate tile labels by, so they stay upright under
    /// the grid's view rotation.
    pub label_rotation_deg: f32,
}

/// Project the models into render state.
#[must_use]
pub fn project_grid(
    bounds: Bounds,
    rotation: ViewRotation,
    field: &CellField,
    store: &MappingStore,
    drag: &DragSwapController,
) -> GridViewModel {
    let tiles = bounds
        .keys()
        .map(|key| {
            let cell = field.index_at(key);
            TileView {
                key,
                cell,
                content: tile_content(cell, store, drag),
            }
        })
        .collect();

    let ghost = drag.origin().and_then(|origin| {
        let position = drag.ghost()?;
        let slot = store.slot(origin)?;
        Some(GhostView {
            position,
            label: slot.label,
            flyer: slot.flyer.clone(),
        })
    });

    GridViewModel {
        tiles,
        ghost,
        cursor: drag.cursor(),
        label_rotation_deg: -rotation.degrees(),
    }
}

fn tile_content(
    cell: Option<CellIndex>,
    store: &MappingStore,
    drag: &DragSwapController,
) -> TileContent {
    let Some(cell) = cell else {
        return TileContent::Hole;
    };

    if let Some(origin) = drag.origin() {
        let hover = drag.hover();
        if hover == Some(cell) {
            // Controller invariant: hover is never the origin.
            return TileContent::DropSpot;
        }
        if cell == origin {
            return match hover.and_then(|h| store.slot(h)) {
                Some(slot) => TileContent::Preview {
                    label: slot.label,
                    flyer: slot.flyer.clone(),
                },
                None => TileContent::BlankOrigin,
            };
        }
    }

    match store.slot(cell) {
        Some(slot) => TileContent::Label {
            label: slot.label,
            flyer: slot.flyer.clone(),
        },
        None => TileContent::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::DragEvent;
    use formgrid_core::{
        Assignment, Cell, GridConfig, GridGeometry, PointerEvent, Roster, RosterEntry,
    };

    fn fixture() -> (GridGeometry, CellField, MappingStore) {
        let field = CellField::new(vec![
            Cell::new(CellIndex(0), CellKey::new(-1, 0)),
            Cell::new(CellIndex(1), CellKey::new(0, 0)),
            Cell::new(CellIndex(2), CellKey::new(1, 0)),
        ]);
        let geometry = GridGeometry::new(
            Bounds::new(-1, 1, 0, 0),
            GridConfig::new(32.0, 420.0),
            ViewRotation::ZERO,
        );
        let roster = Roster::new(vec![RosterEntry::new("f1", 0), RosterEntry::new("f2", 1)]);
        let store = MappingStore::new(
            &roster,
            &[
                Assignment::new("f1", CellIndex(0)),
                Assignment::new("f2", CellIndex(1)),
            ],
        );
        (geometry, field, store)
    }

    fn content_at(model: &GridViewModel, key: CellKey) -> &TileContent {
        &model.tiles.iter().find(|t| t.key == key).unwrap().content
    }

    #[test]
    fn static_projection_labels_occupied_cells() {
        let (geometry, field, store) = fixture();
        let drag = DragSwapController::new();
        let model = project_grid(
            geometry.bounds(),
            ViewRotation::from_degrees(90.0),
            &field,
            &store,
            &drag,
        );

        assert_eq!(model.tiles.len(), 3);
        assert_eq!(
            *content_at(&model, CellKey::new(-1, 0)),
            TileContent::Label {
                label: 1,
                flyer: FlyerId::from("f1")
            }
        );
        assert_eq!(*content_at(&model, CellKey::new(1, 0)), TileContent::Empty);
        assert_eq!(model.ghost, None);
        assert_eq!(model.label_rotation_deg, -90.0);
    }

    #[test]
    fn holes_render_as_background() {
        let (_, field, store) = fixture();
        let drag = DragSwapController::new();
        // Wider bounds than the formation: corners are holes.
        let model = project_grid(
            Bounds::new(-2, 2, 0, 0),
            ViewRotation::ZERO,
            &field,
            &store,
            &drag,
        );
        assert_eq!(*content_at(&model, CellKey::new(-2, 0)), TileContent::Hole);
        assert_eq!(*content_at(&model, CellKey::new(2, 0)), TileContent::Hole);
    }

    #[test]
    fn dragging_without_target_blanks_origin_and_shows_ghost() {
        let (geometry, field, store) = fixture();
        let mut drag = DragSwapController::new();
        let origin_pos = geometry.cell_center_viewport(CellKey::new(-1, 0)).unwrap();
        drag.process(&PointerEvent::down(origin_pos), &geometry, &field, &store);

        let model = project_grid(
            geometry.bounds(),
            ViewRotation::ZERO,
            &field,
            &store,
            &drag,
        );
        assert_eq!(
            *content_at(&model, CellKey::new(-1, 0)),
            TileContent::BlankOrigin
        );
        let ghost = model.ghost.unwrap();
        assert_eq!(ghost.label, 1);
        assert_eq!(ghost.position, origin_pos);
        assert_eq!(model.cursor, CursorStyle::Grabbing);
    }

    #[test]
    fn hovering_target_previews_the_swap() {
        let (geometry, field, store) = fixture();
        let mut drag = DragSwapController::new();
        drag.process(
            &PointerEvent::down(geometry.cell_center_viewport(CellKey::new(-1, 0)).unwrap()),
            &geometry,
            &field,
            &store,
        );
        let events = drag.process(
            &PointerEvent::moved(geometry.cell_center_viewport(CellKey::new(0, 0)).unwrap()),
            &geometry,
            &field,
            &store,
        );
        assert!(events.contains(&DragEvent::HoverChanged {
            hover: Some(CellIndex(1))
        }));

        let model = project_grid(
            geometry.bounds(),
            ViewRotation::ZERO,
            &field,
            &store,
            &drag,
        );
        // Origin previews the target's slot; target is a dashed blank.
        assert_eq!(
            *content_at(&model, CellKey::new(-1, 0)),
            TileContent::Preview {
                label: 2,
                flyer: FlyerId::from("f2")
            }
        );
        assert_eq!(
            *content_at(&model, CellKey::new(0, 0)),
            TileContent::DropSpot
        );
        // The committed mapping is untouched by the preview.
        assert_eq!(store.slot(CellIndex(0)).unwrap().flyer.as_str(), "f1");
        assert_eq!(store.slot(CellIndex(1)).unwrap().flyer.as_str(), "f2");
    }

    #[test]
    fn preview_state_discards_on_release() {
        let (geometry, field, store) = fixture();
        let mut drag = DragSwapController::new();
        let origin = geometry.cell_center_viewport(CellKey::new(-1, 0)).unwrap();
        drag.process(&PointerEvent::down(origin), &geometry, &field, &store);
        drag.process(&PointerEvent::up(origin), &geometry, &field, &store);

        let model = project_grid(
            geometry.bounds(),
            ViewRotation::ZERO,
            &field,
            &store,
            &drag,
        );
        assert_eq!(model.ghost, None);
        assert_eq!(
            *content_at(&model, CellKey::new(-1, 0)),
            TileContent::Label {
                label: 1,
                flyer: FlyerId::from("f1")
            }
        );
    }
}

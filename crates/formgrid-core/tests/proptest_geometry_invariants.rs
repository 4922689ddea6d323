//! Property-based invariants for the grid transform and hit-testing.
//!
//! Exercises random bounds/viewport/rotation combinations against the scale
//! bound and the forward/inverse round-trip contract.

use formgrid_core::{
    Bounds, Cell, CellField, CellIndex, CellKey, GridConfig, GridGeometry, ViewRotation,
};
use proptest::prelude::*;

fn full_field(bounds: Bounds) -> CellField {
    let cells = bounds
        .keys()
        .enumerate()
        .map(|(i, key)| Cell::new(CellIndex(i as u32), key))
        .collect();
    CellField::new(cells)
}

prop_compose! {
    fn arb_bounds()(
        min_col in -20i32..20,
        min_row in -20i32..20,
        cols in 1i32..24,
        rows in 1i32..24,
    ) -> Bounds {
        Bounds::new(min_col, min_col + cols - 1, min_row, min_row + rows - 1)
    }
}

prop_compose! {
    fn arb_config()(
        cell_size in 8.0f32..64.0,
        viewport in 100.0f32..1000.0,
    ) -> GridConfig {
        GridConfig::new(cell_size, viewport)
    }
}

proptest! {
    #[test]
    fn scale_never_exceeds_one(
        bounds in arb_bounds(),
        config in arb_config(),
        degrees in 0.0f32..360.0,
    ) {
        let geometry = GridGeometry::new(bounds, config, ViewRotation::from_degrees(degrees));
        prop_assert!(geometry.scale() <= 1.0);
        prop_assert!(geometry.scale() > 0.0);
    }

    #[test]
    fn scale_is_identity_when_rotated_grid_fits(
        bounds in arb_bounds(),
        degrees in 0.0f32..360.0,
    ) {
        // Small cells in a huge viewport: never shrunk.
        let config = GridConfig::new(8.0, 4096.0);
        let geometry = GridGeometry::new(bounds, config, ViewRotation::from_degrees(degrees));
        let (rot_w, rot_h) = geometry.rotated_extents();
        prop_assume!(rot_w.max(rot_h) <= config.viewport);
        prop_assert_eq!(geometry.scale(), 1.0);
    }

    #[test]
    fn round_trip_at_snapped_rotations(
        bounds in arb_bounds(),
        config in arb_config(),
        step in 0u8..8,
    ) {
        let rotation = ViewRotation::from_degrees(f32::from(step) * 45.0);
        let geometry = GridGeometry::new(bounds, config, rotation);
        let field = full_field(bounds);
        for cell in field.cells() {
            let center = geometry.cell_center_viewport(cell.key).unwrap();
            prop_assert_eq!(
                geometry.hit_test(center, &field),
                Some(cell.index),
                "cell {} rotation {}",
                cell.key,
                rotation
            );
        }
    }

    #[test]
    fn round_trip_at_arbitrary_rotations(
        bounds in arb_bounds(),
        config in arb_config(),
        degrees in 0.0f32..360.0,
    ) {
        let geometry = GridGeometry::new(bounds, config, ViewRotation::from_degrees(degrees));
        let field = full_field(bounds);
        // Cell centers sit half a cell away from every boundary, so the
        // round trip must survive float error at any angle.
        for cell in field.cells() {
            let center = geometry.cell_center_viewport(cell.key).unwrap();
            prop_assert_eq!(geometry.hit_test(center, &field), Some(cell.index));
        }
    }

    #[test]
    fn rotated_grid_fits_viewport_at_computed_scale(
        bounds in arb_bounds(),
        config in arb_config(),
        degrees in 0.0f32..360.0,
    ) {
        let geometry = GridGeometry::new(bounds, config, ViewRotation::from_degrees(degrees));
        let (rot_w, rot_h) = geometry.rotated_extents();
        let scaled = rot_w.max(rot_h) * geometry.scale();
        prop_assert!(scaled <= geometry.viewport() * (1.0 + 1e-5));
    }

    #[test]
    fn stepped_rotation_is_always_snapped(
        start in -1000.0f32..1000.0,
        delta in prop::sample::select(vec![-135.0f32, -90.0, -45.0, 45.0, 90.0, 135.0]),
    ) {
        let stepped = ViewRotation::from_degrees(start).stepped(delta);
        let deg = stepped.degrees();
        prop_assert!((0.0..360.0).contains(&deg));
        prop_assert_eq!(deg % 45.0, 0.0);
    }
}

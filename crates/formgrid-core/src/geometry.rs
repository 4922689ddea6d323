#![forbid(unsafe_code)]

//! Rotated, scale-to-fit grid geometry and pointer hit-testing.
//!
//! [`GridGeometry`] maps logical grid cells into a fixed square viewport:
//! the grid is centered on the viewport center, rotated by the view
//! rotation, then uniformly scaled so the rotated bounding box fits. The
//! inverse direction ([`GridGeometry::point_to_key`]) runs the same steps
//! backwards to resolve a raw pointer position to a logical cell.
//!
//! # Invariants
//!
//! 1. `scale <= 1`: the grid is never enlarged, only shrunk to fit.
//! 2. At the computed scale the rotated grid never clips inside the
//!    viewport, for any rotation angle.
//! 3. Round-trip: for any in-bounds cell, hit-testing the forward-projected
//!    cell center returns that cell (floating-point tolerance).
//!
//! Hit-test misses (outside the grid rectangle, or over a hole in the
//! formation) are not errors; they resolve to `None`.

use crate::event::Position;
use crate::grid::{Bounds, CellField, CellIndex, CellKey};
use crate::rotation::ViewRotation;

/// Sizing inputs for the rendered grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Side length of one cell in pixels, before scaling.
    pub cell_size: f32,
    /// Side length of the square viewport in pixels.
    pub viewport: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 32.0,
            viewport: 420.0,
        }
    }
}

impl GridConfig {
    /// Create a config with explicit cell and viewport sizes.
    #[must_use]
    pub const fn new(cell_size: f32, viewport: f32) -> Self {
        Self {
            cell_size,
            viewport,
        }
    }

    /// Replace the viewport size (the host box may resize at any time).
    #[must_use]
    pub const fn with_viewport(mut self, viewport: f32) -> Self {
        self.viewport = viewport;
        self
    }
}

/// The resolved render transform for one bounds/rotation/viewport triple.
///
/// Cheap to construct; hosts rebuild it whenever bounds, rotation, or
/// viewport size change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    bounds: Bounds,
    cell_size: f32,
    viewport: f32,
    rotation: ViewRotation,
    width: f32,
    height: f32,
    scale: f32,
    cos: f32,
    sin: f32,
}

impl GridGeometry {
    /// Compute the transform for `bounds` under `rotation` inside the
    /// configured viewport.
    ///
    /// Cell and viewport sizes are clamped to at least one pixel so a
    /// degenerate config cannot divide by zero.
    #[must_use]
    pub fn new(bounds: Bounds, config: GridConfig, rotation: ViewRotation) -> Self {
        let cell_size = config.cell_size.max(1.0);
        let viewport = config.viewport.max(1.0);

        let width = bounds.cols() as f32 * cell_size;
        let height = bounds.rows() as f32 * cell_size;

        let theta = rotation.radians();
        let (sin, cos) = theta.sin_cos();

        let rot_w = (width * cos).abs() + (height * sin).abs();
        let rot_h = (width * sin).abs() + (height * cos).abs();
        let scale = (viewport / rot_w.max(rot_h)).min(1.0);

        Self {
            bounds,
            cell_size,
            viewport,
            rotation,
            width,
            height,
            scale,
            cos,
            sin,
        }
    }

    /// The logical bounds this transform was computed for.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The rotation this transform was computed for.
    #[inline]
    #[must_use]
    pub const fn rotation(&self) -> ViewRotation {
        self.rotation
    }

    /// The clamped per-cell pixel size.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// The clamped viewport side length.
    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> f32 {
        self.viewport
    }

    /// Unrotated grid pixel extents `(width, height)`.
    #[inline]
    #[must_use]
    pub const fn grid_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Axis-aligned extents of the rotated grid, before scaling.
    #[must_use]
    pub fn rotated_extents(&self) -> (f32, f32) {
        let rot_w = (self.width * self.cos).abs() + (self.height * self.sin).abs();
        let rot_h = (self.width * self.sin).abs() + (self.height * self.cos).abs();
        (rot_w, rot_h)
    }

    /// The shrink-to-fit scale factor, always in `(0, 1]`.
    #[inline]
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Top-left corner of a cell in grid-local coordinates, or `None` if the
    /// key is outside the bounds.
    #[must_use]
    pub fn cell_origin(&self, key: CellKey) -> Option<Position> {
        if !self.bounds.contains(key) {
            return None;
        }
        Some(Position::new(
            (key.col - self.bounds.min_col) as f32 * self.cell_size,
            (key.row - self.bounds.min_row) as f32 * self.cell_size,
        ))
    }

    /// Center of a cell in grid-local coordinates.
    #[must_use]
    pub fn cell_center(&self, key: CellKey) -> Option<Position> {
        let origin = self.cell_origin(key)?;
        let half = self.cell_size / 2.0;
        Some(Position::new(origin.x + half, origin.y + half))
    }

    /// Project a grid-local point into viewport coordinates: center, rotate,
    /// scale, then translate to the viewport center.
    #[must_use]
    pub fn project(&self, point: Position) -> Position {
        let cx = point.x - self.width / 2.0;
        let cy = point.y - self.height / 2.0;
        let rx = cx * self.cos - cy * self.sin;
        let ry = cx * self.sin + cy * self.cos;
        Position::new(
            rx * self.scale + self.viewport / 2.0,
            ry * self.scale + self.viewport / 2.0,
        )
    }

    /// Center of a cell in viewport coordinates.
    #[must_use]
    pub fn cell_center_viewport(&self, key: CellKey) -> Option<Position> {
        self.cell_center(key).map(|p| self.project(p))
    }

    /// Resolve a viewport-local pointer position to the logical grid key
    /// under it, ignoring whether the formation has a cell there.
    ///
    /// Runs the forward transform in reverse: translate to center-relative,
    /// unscale, rotate by the negative angle, shift to grid-local, and
    /// floor-divide by the cell size.
    #[must_use]
    pub fn point_to_key(&self, position: Position) -> Option<CellKey> {
        let vx = position.x - self.viewport / 2.0;
        let vy = position.y - self.viewport / 2.0;

        let gx_scaled = vx / self.scale;
        let gy_scaled = vy / self.scale;

        let gx = self.cos * gx_scaled + self.sin * gy_scaled;
        let gy = -self.sin * gx_scaled + self.cos * gy_scaled;

        let ux = gx + self.width / 2.0;
        let uy = gy + self.height / 2.0;

        if ux < 0.0 || uy < 0.0 || ux >= self.width || uy >= self.height {
            return None;
        }

        let col_idx = (ux / self.cell_size).floor() as i32;
        let row_idx = (uy / self.cell_size).floor() as i32;
        Some(CellKey::new(
            self.bounds.min_col + col_idx,
            self.bounds.min_row + row_idx,
        ))
    }

    /// Resolve a pointer position to a formation cell.
    ///
    /// Positions over a hole (a grid key without a cell) resolve to `None`,
    /// the same as positions outside the grid rectangle.
    #[must_use]
    pub fn hit_test(&self, position: Position, field: &CellField) -> Option<CellIndex> {
        self.point_to_key(position)
            .and_then(|key| field.index_at(key))
    }
}

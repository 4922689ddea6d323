#![forbid(unsafe_code)]

//! View rotation: a per-formation rendering angle.
//!
//! The rotation is purely a presentation transform. It never changes the
//! `(col, row)` semantics the backend computes with, and the geometry accepts
//! any angle. Snapping to 45° increments is a policy of the editor's stepping
//! control (eight discrete orientations), applied in [`ViewRotation::stepped`]
//! and nowhere else.
//!
//! # Invariants
//!
//! 1. A `ViewRotation` is always normalized into `[0, 360)`.
//! 2. [`ViewRotation::stepped`] always yields a multiple of
//!    [`ROTATION_STEP_DEG`] in `[0, 360)`.

use std::fmt;

/// Step size of the editor's rotation control, in degrees.
pub const ROTATION_STEP_DEG: f32 = 45.0;

/// A view rotation in degrees, normalized into `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewRotation(f32);

impl ViewRotation {
    /// No rotation.
    pub const ZERO: Self = Self(0.0);

    /// Create a rotation, normalizing the degree value into `[0, 360)`.
    #[must_use]
    pub fn from_degrees(degrees: f32) -> Self {
        Self(normalize_degrees(degrees))
    }

    /// The normalized degree value in `[0, 360)`.
    #[inline]
    #[must_use]
    pub const fn degrees(self) -> f32 {
        self.0
    }

    /// The angle in radians.
    #[inline]
    #[must_use]
    pub fn radians(self) -> f32 {
        self.0.to_radians()
    }

    /// Add `delta` degrees, normalize, and snap to the nearest multiple of
    /// [`ROTATION_STEP_DEG`].
    ///
    /// This is the stepping control's behavior; it intentionally collapses
    /// any non-snapped starting value onto the eight offered orientations.
    #[must_use]
    pub fn stepped(self, delta: f32) -> Self {
        let next = normalize_degrees(self.0 + delta);
        let snapped = (next / ROTATION_STEP_DEG).round() * ROTATION_STEP_DEG;
        Self(normalize_degrees(snapped))
    }
}

impl fmt::Display for ViewRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// Normalize a degree value into `[0, 360)`.
#[must_use]
fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = ((degrees % 360.0) + 360.0) % 360.0;
    // -0.0 % 360.0 keeps its sign; fold it onto +0.0.
    if wrapped == 360.0 || wrapped == 0.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_step_multiple(rotation: ViewRotation) -> bool {
        let deg = rotation.degrees();
        (deg / ROTATION_STEP_DEG).fract() == 0.0 && (0.0..360.0).contains(&deg)
    }

    #[test]
    fn from_degrees_normalizes() {
        assert_eq!(ViewRotation::from_degrees(370.0).degrees(), 10.0);
        assert_eq!(ViewRotation::from_degrees(-45.0).degrees(), 315.0);
        assert_eq!(ViewRotation::from_degrees(360.0).degrees(), 0.0);
        assert_eq!(ViewRotation::from_degrees(-720.0).degrees(), 0.0);
    }

    #[test]
    fn stepping_wraps_both_directions() {
        let r = ViewRotation::from_degrees(315.0).stepped(45.0);
        assert_eq!(r.degrees(), 0.0);
        let r = ViewRotation::ZERO.stepped(-45.0);
        assert_eq!(r.degrees(), 315.0);
    }

    #[test]
    fn stepping_snaps_arbitrary_start() {
        // 100° + 45° = 145° → snaps to 135°.
        let r = ViewRotation::from_degrees(100.0).stepped(45.0);
        assert_eq!(r.degrees(), 135.0);
        assert!(is_step_multiple(r));
    }

    #[test]
    fn stepping_always_yields_step_multiple() {
        let starts = [0.0, 13.7, 100.0, 359.9, -89.5, 222.2];
        let deltas = [45.0, -45.0, 90.0, -135.0];
        for &start in &starts {
            for &delta in &deltas {
                let r = ViewRotation::from_degrees(start).stepped(delta);
                assert!(is_step_multiple(r), "start {start} delta {delta} gave {r}");
            }
        }
    }

    #[test]
    fn radians_of_half_turn() {
        let r = ViewRotation::from_degrees(180.0);
        assert!((r.radians() - std::f32::consts::PI).abs() < 1e-6);
    }
}

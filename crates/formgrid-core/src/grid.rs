#![forbid(unsafe_code)]

//! Logical grid cells, bounds, and formation lookup tables.
//!
//! A formation is a sparse set of cells on an unbounded integer grid.
//! Coordinates may be negative; `(0, 0)` is wherever the formation was
//! authored around, not a corner. Cells carry a stable, externally assigned
//! [`CellIndex`] that is only meaningful within one formation.
//!
//! # Invariants
//!
//! 1. [`Bounds`] is always non-degenerate: `min <= max` on both axes.
//! 2. A [`CellField`] maps each `(col, row)` key to at most one index.
//! 3. [`CellKey`] ordering is row-major, so iteration and serialized
//!    payloads are deterministic regardless of hash-set iteration order.

use std::fmt;

use ahash::{AHashMap, AHashSet};

// ---------------------------------------------------------------------------
// CellKey
// ---------------------------------------------------------------------------

/// A logical grid coordinate: column and row.
///
/// Value-equal composite key; used for set membership and lookup instead of
/// stringified coordinate pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellKey {
    /// Column coordinate (may be negative).
    pub col: i32,
    /// Row coordinate (may be negative).
    pub row: i32,
}

impl CellKey {
    /// Create a new key.
    #[inline]
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

impl PartialOrd for CellKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellKey {
    /// Row-major ordering: by row, then by column.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

impl From<(i32, i32)> for CellKey {
    fn from((col, row): (i32, i32)) -> Self {
        Self { col, row }
    }
}

// ---------------------------------------------------------------------------
// CellIndex / Cell
// ---------------------------------------------------------------------------

/// Stable identifier of a cell within one formation.
///
/// Assigned by the backend when the formation is persisted; never reused
/// across formations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellIndex(pub u32);

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One persisted formation cell: stable index plus grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Stable identifier within the formation.
    pub index: CellIndex,
    /// Grid coordinates, unique per formation.
    pub key: CellKey,
}

impl Cell {
    /// Create a new cell.
    #[inline]
    #[must_use]
    pub const fn new(index: CellIndex, key: CellKey) -> Self {
        Self { index, key }
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Inclusive logical extent of a grid, used to size the rendered area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Leftmost column (inclusive).
    pub min_col: i32,
    /// Rightmost column (inclusive).
    pub max_col: i32,
    /// Topmost row (inclusive).
    pub min_row: i32,
    /// Bottommost row (inclusive).
    pub max_row: i32,
}

impl Bounds {
    /// Create bounds from inclusive extents.
    ///
    /// Reversed extents are normalized so the result is never degenerate.
    #[must_use]
    pub fn new(min_col: i32, max_col: i32, min_row: i32, max_row: i32) -> Self {
        Self {
            min_col: min_col.min(max_col),
            max_col: min_col.max(max_col),
            min_row: min_row.min(max_row),
            max_row: min_row.max(max_row),
        }
    }

    /// A window of `±radius` around the origin on both axes.
    #[must_use]
    pub const fn symmetric(radius: i32) -> Self {
        let r = radius.unsigned_abs() as i32;
        Self {
            min_col: -r,
            max_col: r,
            min_row: -r,
            max_row: r,
        }
    }

    /// The tight extent of a set of keys, or `None` when empty.
    #[must_use]
    pub fn enclosing<I>(keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = CellKey>,
    {
        let mut iter = keys.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            min_col: first.col,
            max_col: first.col,
            min_row: first.row,
            max_row: first.row,
        };
        for key in iter {
            bounds.min_col = bounds.min_col.min(key.col);
            bounds.max_col = bounds.max_col.max(key.col);
            bounds.min_row = bounds.min_row.min(key.row);
            bounds.max_row = bounds.max_row.max(key.row);
        }
        Some(bounds)
    }

    /// Grow every side by `margin` cells.
    #[must_use]
    pub const fn padded(self, margin: i32) -> Self {
        Self {
            min_col: self.min_col - margin,
            max_col: self.max_col + margin,
            min_row: self.min_row - margin,
            max_row: self.max_row + margin,
        }
    }

    /// Number of columns covered.
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> u32 {
        (self.max_col - self.min_col + 1) as u32
    }

    /// Number of rows covered.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> u32 {
        (self.max_row - self.min_row + 1) as u32
    }

    /// Check if a key lies inside the bounds.
    #[inline]
    #[must_use]
    pub const fn contains(&self, key: CellKey) -> bool {
        key.col >= self.min_col
            && key.col <= self.max_col
            && key.row >= self.min_row
            && key.row <= self.max_row
    }

    /// Iterate all keys in the bounds in row-major order.
    pub fn keys(&self) -> impl Iterator<Item = CellKey> + use<> {
        let (min_col, max_col) = (self.min_col, self.max_col);
        (self.min_row..=self.max_row)
            .flat_map(move |row| (min_col..=max_col).map(move |col| CellKey::new(col, row)))
    }
}

// ---------------------------------------------------------------------------
// CellSet
// ---------------------------------------------------------------------------

/// Membership-only set of grid keys used during formation authoring.
///
/// No indices are attached; the backend assigns them when the set is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSet {
    keys: AHashSet<CellKey>,
}

impl CellSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `key`. Returns `true` if the key is now present.
    pub fn toggle(&mut self, key: CellKey) -> bool {
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    /// Check membership.
    #[must_use]
    pub fn contains(&self, key: CellKey) -> bool {
        self.keys.contains(&key)
    }

    /// Remove all keys.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Number of member keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate member keys in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.keys.iter().copied()
    }

    /// Member keys in row-major order, for deterministic payloads.
    #[must_use]
    pub fn sorted_keys(&self) -> Vec<CellKey> {
        let mut keys: Vec<CellKey> = self.keys.iter().copied().collect();
        keys.sort_unstable();
        keys
    }
}

impl FromIterator<CellKey> for CellSet {
    fn from_iter<I: IntoIterator<Item = CellKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// CellField
// ---------------------------------------------------------------------------

/// A loaded formation: the persisted cells plus a coordinate lookup table.
///
/// Read-only for the duration of one view session; hit-testing resolves
/// pointer positions through [`CellField::index_at`].
#[derive(Debug, Clone, Default)]
pub struct CellField {
    cells: Vec<Cell>,
    by_key: AHashMap<CellKey, CellIndex>,
}

impl CellField {
    /// Build a field from persisted cells.
    ///
    /// If two cells share a key the later one wins the lookup slot.
    #[must_use]
    pub fn new(cells: Vec<Cell>) -> Self {
        let mut by_key = AHashMap::with_capacity(cells.len());
        for cell in &cells {
            if by_key.insert(cell.key, cell.index).is_some() {
                #[cfg(feature = "tracing")]
                tracing::debug!(key = %cell.key, "duplicate cell key in formation snapshot");
            }
        }
        Self { cells, by_key }
    }

    /// The persisted cells in load order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Look up the cell index at a grid coordinate, if the formation has a
    /// cell there.
    #[must_use]
    pub fn index_at(&self, key: CellKey) -> Option<CellIndex> {
        self.by_key.get(&key).copied()
    }

    /// Check if the formation has a cell at `key`.
    #[must_use]
    pub fn contains_key(&self, key: CellKey) -> bool {
        self.by_key.contains_key(&key)
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the formation has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate member keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.cells.iter().map(|c| c.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(pairs: &[(u32, i32, i32)]) -> CellField {
        CellField::new(
            pairs
                .iter()
                .map(|&(i, c, r)| Cell::new(CellIndex(i), CellKey::new(c, r)))
                .collect(),
        )
    }

    // --- Bounds ---

    #[test]
    fn enclosing_of_empty_is_none() {
        assert_eq!(Bounds::enclosing(std::iter::empty()), None);
    }

    #[test]
    fn enclosing_covers_extremes() {
        let keys = [
            CellKey::new(-3, 1),
            CellKey::new(4, 0),
            CellKey::new(0, -2),
            CellKey::new(1, 5),
        ];
        let bounds = Bounds::enclosing(keys).unwrap();
        assert_eq!(bounds, Bounds::new(-3, 4, -2, 5));
        assert_eq!(bounds.cols(), 8);
        assert_eq!(bounds.rows(), 8);
    }

    #[test]
    fn padded_grows_every_side() {
        let bounds = Bounds::new(0, 2, -1, 1).padded(2);
        assert_eq!(bounds, Bounds::new(-2, 4, -3, 3));
    }

    #[test]
    fn symmetric_window() {
        let bounds = Bounds::symmetric(6);
        assert_eq!(bounds, Bounds::new(-6, 6, -6, 6));
        assert_eq!(bounds.cols(), 13);
    }

    #[test]
    fn new_normalizes_reversed_extents() {
        let bounds = Bounds::new(5, -5, 3, -3);
        assert_eq!(bounds, Bounds::new(-5, 5, -3, 3));
    }

    #[test]
    fn keys_iterates_row_major() {
        let bounds = Bounds::new(0, 1, 0, 1);
        let keys: Vec<CellKey> = bounds.keys().collect();
        assert_eq!(
            keys,
            vec![
                CellKey::new(0, 0),
                CellKey::new(1, 0),
                CellKey::new(0, 1),
                CellKey::new(1, 1),
            ]
        );
    }

    // --- CellSet ---

    #[test]
    fn toggle_flips_membership() {
        let mut set = CellSet::new();
        assert!(set.toggle(CellKey::new(1, 2)));
        assert!(set.contains(CellKey::new(1, 2)));
        assert!(!set.toggle(CellKey::new(1, 2)));
        assert!(!set.contains(CellKey::new(1, 2)));
        assert!(set.is_empty());
    }

    #[test]
    fn sorted_keys_are_row_major() {
        let set: CellSet = [
            CellKey::new(2, 1),
            CellKey::new(0, 0),
            CellKey::new(-1, 1),
            CellKey::new(1, 0),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            set.sorted_keys(),
            vec![
                CellKey::new(0, 0),
                CellKey::new(1, 0),
                CellKey::new(-1, 1),
                CellKey::new(2, 1),
            ]
        );
    }

    // --- CellField ---

    #[test]
    fn index_lookup_hits_and_misses() {
        let field = field_of(&[(0, 0, 0), (1, 1, 0), (2, 0, 1)]);
        assert_eq!(field.index_at(CellKey::new(1, 0)), Some(CellIndex(1)));
        assert_eq!(field.index_at(CellKey::new(5, 5)), None);
        assert_eq!(field.len(), 3);
    }

    #[test]
    fn duplicate_key_last_wins() {
        let field = field_of(&[(0, 0, 0), (7, 0, 0)]);
        assert_eq!(field.index_at(CellKey::new(0, 0)), Some(CellIndex(7)));
    }
}

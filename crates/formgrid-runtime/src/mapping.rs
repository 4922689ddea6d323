#![forbid(unsafe_code)]

//! The bijective flyer ⇄ cell mapping with optimistic swaps.
//!
//! [`MappingStore`] holds one step's assignment snapshot as a
//! `cell index → slot` map. A swap is applied locally the moment the user
//! releases a drag, then committed remotely; the pre-swap slots are kept in
//! a pending ledger keyed by commit token so a failed commit can restore
//! exactly what the swap displaced.
//!
//! # Invariants
//!
//! 1. The mapping stays a bijection across every swap: after exchanging
//!    cells A and B, A holds B's former slot and vice versa; no other cell
//!    changes.
//! 2. A no-op swap (same cell, or either cell unmapped) changes nothing and
//!    issues no commit.
//! 3. Rollback restores the two affected cells to their exact pre-swap
//!    slots, relative to that swap's own optimistic application rather than
//!    a global snapshot, so overlapping in-flight commits roll back
//!    independently.

use ahash::AHashMap;

use formgrid_backend::{BackendError, CommitToken};
use formgrid_core::{Assignment, CellIndex, FlyerId, Roster};

/// One occupied cell: the flyer and its roster display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// The flyer occupying the cell.
    pub flyer: FlyerId,
    /// 1-based display label derived from roster order.
    pub label: u32,
}

/// Pre-swap state retained while a commit is in flight.
#[derive(Debug, Clone)]
struct PendingSwap {
    origin: CellIndex,
    target: CellIndex,
    origin_slot: Slot,
    target_slot: Slot,
}

/// How a commit outcome was applied to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapResolution {
    /// The optimistic state stands.
    Confirmed,
    /// The optimistic state was reverted; the reason is for display.
    RolledBack {
        /// The backend's reason, verbatim.
        reason: String,
    },
    /// The token matched no pending swap (e.g. resolved after a reload).
    Unknown,
}

/// One step's flyer ⇄ cell mapping.
#[derive(Debug, Clone, Default)]
pub struct MappingStore {
    slots: AHashMap<CellIndex, Slot>,
    pending: AHashMap<CommitToken, PendingSwap>,
}

impl MappingStore {
    /// Build the mapping from a roster and an assignment snapshot.
    ///
    /// Assignments naming a flyer that is not on the roster carry no display
    /// label and are dropped.
    #[must_use]
    pub fn new(roster: &Roster, assignments: &[Assignment]) -> Self {
        let mut slots = AHashMap::with_capacity(assignments.len());
        for assignment in assignments {
            match roster.label_of(&assignment.flyer) {
                Some(label) => {
                    slots.insert(
                        assignment.cell,
                        Slot {
                            flyer: assignment.flyer.clone(),
                            label,
                        },
                    );
                }
                None => {
                    tracing::debug!(flyer = %assignment.flyer, "assignment for flyer not on roster");
                }
            }
        }
        Self {
            slots,
            pending: AHashMap::new(),
        }
    }

    /// The slot at `cell`, if occupied.
    #[must_use]
    pub fn slot(&self, cell: CellIndex) -> Option<&Slot> {
        self.slots.get(&cell)
    }

    /// Check if `cell` currently holds a flyer.
    #[must_use]
    pub fn is_assigned(&self, cell: CellIndex) -> bool {
        self.slots.contains_key(&cell)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of commits awaiting a verdict.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Apply an optimistic swap and open a pending entry under `token`.
    ///
    /// Returns the two flyers to commit, in `(origin, target)` order, or
    /// `None` for a no-op (same cell, or either cell unoccupied), in which
    /// case nothing changed and no commit should be issued.
    pub fn begin_swap(
        &mut self,
        origin: CellIndex,
        target: CellIndex,
        token: CommitToken,
    ) -> Option<(FlyerId, FlyerId)> {
        if origin == target {
            return None;
        }
        let origin_slot = self.slots.get(&origin)?.clone();
        let target_slot = self.slots.get(&target)?.clone();

        self.slots.insert(origin, target_slot.clone());
        self.slots.insert(target, origin_slot.clone());
        tracing::debug!(%token, %origin, %target, "optimistic swap applied");

        let flyers = (origin_slot.flyer.clone(), target_slot.flyer.clone());
        self.pending.insert(
            token,
            PendingSwap {
                origin,
                target,
                origin_slot,
                target_slot,
            },
        );
        Some(flyers)
    }

    /// Settle the pending swap for `token` against the backend's verdict.
    ///
    /// On failure the two affected cells are restored to their recorded
    /// pre-swap slots. Tokens without a pending entry resolve to
    /// [`SwapResolution::Unknown`] and leave the store untouched.
    pub fn resolve(
        &mut self,
        token: CommitToken,
        result: &Result<(), BackendError>,
    ) -> SwapResolution {
        let Some(pending) = self.pending.remove(&token) else {
            return SwapResolution::Unknown;
        };
        match result {
            Ok(()) => {
                tracing::debug!(%token, "swap confirmed");
                SwapResolution::Confirmed
            }
            Err(error) => {
                self.slots.insert(pending.origin, pending.origin_slot);
                self.slots.insert(pending.target, pending.target_slot);
                tracing::debug!(%token, reason = error.reason(), "swap rolled back");
                SwapResolution::RolledBack {
                    reason: error.reason().to_owned(),
                }
            }
        }
    }

    /// The current mapping as assignments, sorted by cell index.
    ///
    /// Deterministic order makes before/after comparisons exact.
    #[must_use]
    pub fn assignments(&self) -> Vec<Assignment> {
        let mut assignments: Vec<Assignment> = self
            .slots
            .iter()
            .map(|(cell, slot)| Assignment::new(slot.flyer.clone(), *cell))
            .collect();
        assignments.sort_by_key(|a| a.cell);
        assignments
    }
}

#![forbid(unsafe_code)]

//! Remote mutation boundary for formgrid.
//!
//! This crate defines the contract between the interaction models and the
//! durable backend: the [`MutationBackend`] trait, the request/outcome pair
//! that crosses the boundary, and the error taxonomy. The backend is the
//! arbiter of validity: connectivity of a cell shape, roster cardinality,
//! and current flyer placement are all enforced remotely; this side only
//! transports requests and surfaces verdicts verbatim.
//!
//! Three operations exist, mirroring the server's RPC surface:
//!
//! - save a formation's cell set (server validates 4-neighbor connectivity),
//! - save a formation's view rotation,
//! - swap two flyers within a step (server re-derives the bijection; only
//!   flyer identities cross the wire, never cell indices).
//!
//! Backend calls may block; [`MutationExecutor`] runs them on a worker
//! thread and delivers [`MutationOutcome`]s back asynchronously so the UI
//! thread never waits on the network.

use std::fmt;

use formgrid_core::{CellKey, FlyerId, FormationId, StepId};

mod executor;
#[cfg(any(test, feature = "test-helpers"))]
mod scripted;

pub use executor::{ExecutorClosed, MutationExecutor};
#[cfg(any(test, feature = "test-helpers"))]
pub use scripted::{RecordedCall, ScriptedBackend};

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Why a mutation was not committed.
///
/// All variants are handled identically by the models: optimistic local
/// state reverts to its last confirmed value and the reason is surfaced to
/// the user verbatim. None are fatal; the user may retry immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The server refused a save (e.g. disconnected cell shape, roster and
    /// cell count mismatch). The message is opaque and only displayed.
    ValidationRejected(String),
    /// The server refused a swap (e.g. stale placement state).
    SwapRejected(String),
    /// The commit could not be attempted at all.
    Unavailable(String),
}

impl BackendError {
    /// The human-readable reason, whatever the variant.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::ValidationRejected(msg) | Self::SwapRejected(msg) | Self::Unavailable(msg) => msg,
        }
    }
}

impl fmt::Display for BackendError {
    // Display carries only the server's wording; the variant is routing
    // information, not part of the message.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl std::error::Error for BackendError {}

// ---------------------------------------------------------------------------
// Requests and outcomes
// ---------------------------------------------------------------------------

/// Correlation token for one in-flight commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommitToken(pub u64);

impl fmt::Display for CommitToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "commit-{}", self.0)
    }
}

/// A mutation to commit remotely.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationOp {
    /// Replace a formation's cell set.
    SaveCells {
        /// Target formation.
        formation: FormationId,
        /// The full cell set, row-major.
        cells: Vec<CellKey>,
    },
    /// Persist a formation's view rotation.
    SetViewRotation {
        /// Target formation.
        formation: FormationId,
        /// Normalized degree value in `[0, 360)`.
        degrees: f32,
    },
    /// Exchange two flyers' cells within a step.
    SwapFlyers {
        /// Target step.
        step: StepId,
        /// First flyer.
        flyer_a: FlyerId,
        /// Second flyer.
        flyer_b: FlyerId,
    },
}

impl MutationOp {
    /// The operation's kind, for outcome routing.
    #[must_use]
    pub const fn kind(&self) -> MutationKind {
        match self {
            Self::SaveCells { .. } => MutationKind::SaveCells,
            Self::SetViewRotation { .. } => MutationKind::SetViewRotation,
            Self::SwapFlyers { .. } => MutationKind::SwapFlyers,
        }
    }
}

/// Discriminant of a [`MutationOp`], carried on outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationKind {
    /// A cell-set save.
    SaveCells,
    /// A rotation save.
    SetViewRotation,
    /// A flyer swap.
    SwapFlyers,
}

/// A token-stamped mutation submitted to the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRequest {
    /// Correlation token minted by the issuing model.
    pub token: CommitToken,
    /// The mutation to commit.
    pub op: MutationOp,
}

impl MutationRequest {
    /// Create a request.
    #[must_use]
    pub const fn new(token: CommitToken, op: MutationOp) -> Self {
        Self { token, op }
    }
}

/// The backend's verdict on one request.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    /// Token of the originating request.
    pub token: CommitToken,
    /// Kind of the originating operation.
    pub kind: MutationKind,
    /// Commit result; errors carry the server's reason verbatim.
    pub result: Result<(), BackendError>,
}

impl MutationOutcome {
    /// A successful outcome.
    #[must_use]
    pub const fn ok(token: CommitToken, kind: MutationKind) -> Self {
        Self {
            token,
            kind,
            result: Ok(()),
        }
    }

    /// A failed outcome.
    #[must_use]
    pub const fn err(token: CommitToken, kind: MutationKind, error: BackendError) -> Self {
        Self {
            token,
            kind,
            result: Err(error),
        }
    }

    /// Check if the commit succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// The remote mutation surface.
///
/// Implementations may block (HTTP round trip, RPC call); the runtime only
/// ever invokes them through [`MutationExecutor`], off the UI thread.
pub trait MutationBackend {
    /// Replace the formation's cell set.
    ///
    /// The server validates 4-neighbor connectivity; a rejection reason is
    /// opaque to this side and only displayed.
    fn save_cells(&self, formation: &FormationId, cells: &[CellKey]) -> Result<(), BackendError>;

    /// Persist the formation's view rotation in degrees.
    fn set_view_rotation(
        &self,
        formation: &FormationId,
        degrees: f32,
    ) -> Result<(), BackendError>;

    /// Swap two flyers within a step.
    ///
    /// Only flyer identities are sent; the server is the source of truth
    /// for current placement and re-derives the new bijection itself.
    fn swap_flyers(
        &self,
        step: &StepId,
        flyer_a: &FlyerId,
        flyer_b: &FlyerId,
    ) -> Result<(), BackendError>;

    /// Dispatch a request to the matching operation and wrap the verdict.
    fn execute(&self, request: MutationRequest) -> MutationOutcome {
        let kind = request.op.kind();
        let result = match &request.op {
            MutationOp::SaveCells { formation, cells } => self.save_cells(formation, cells),
            MutationOp::SetViewRotation { formation, degrees } => {
                self.set_view_rotation(formation, *degrees)
            }
            MutationOp::SwapFlyers {
                step,
                flyer_a,
                flyer_b,
            } => self.swap_flyers(step, flyer_a, flyer_b),
        };
        match &result {
            Ok(()) => tracing::debug!(token = %request.token, ?kind, "mutation committed"),
            Err(err) => {
                tracing::debug!(token = %request.token, ?kind, reason = err.reason(), "mutation rejected");
            }
        }
        MutationOutcome {
            token: request.token,
            kind,
            result,
        }
    }
}

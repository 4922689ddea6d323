#![forbid(unsafe_code)]

//! A scripted in-memory backend for tests.
//!
//! Records every call and replays queued results in FIFO order; when the
//! script runs dry, calls succeed. Shared across threads behind the same
//! locks the executor uses, so it slots directly into [`MutationExecutor`]
//! tests.
//!
//! [`MutationExecutor`]: crate::MutationExecutor

use std::collections::VecDeque;
use std::sync::Mutex;

use formgrid_core::{CellKey, FlyerId, FormationId, StepId};

use crate::{BackendError, MutationBackend};

/// One recorded backend call, with owned arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    /// `save_cells` was invoked.
    SaveCells {
        /// Target formation.
        formation: FormationId,
        /// Submitted cell set.
        cells: Vec<CellKey>,
    },
    /// `set_view_rotation` was invoked.
    SetViewRotation {
        /// Target formation.
        formation: FormationId,
        /// Submitted degree value.
        degrees: f32,
    },
    /// `swap_flyers` was invoked.
    SwapFlyers {
        /// Target step.
        step: StepId,
        /// First flyer.
        flyer_a: FlyerId,
        /// Second flyer.
        flyer_b: FlyerId,
    },
}

/// Test backend: scripted verdicts, recorded calls.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<(), BackendError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedBackend {
    /// Create a backend whose calls all succeed until results are queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the verdict for the next unanswered call.
    pub fn push_result(&self, result: Result<(), BackendError>) {
        self.script
            .lock()
            .expect("script lock poisoned")
            .push_back(result);
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    fn respond(&self, call: RecordedCall) -> Result<(), BackendError> {
        self.calls.lock().expect("calls lock poisoned").push(call);
        self.script
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

impl MutationBackend for ScriptedBackend {
    fn save_cells(&self, formation: &FormationId, cells: &[CellKey]) -> Result<(), BackendError> {
        self.respond(RecordedCall::SaveCells {
            formation: formation.clone(),
            cells: cells.to_vec(),
        })
    }

    fn set_view_rotation(
        &self,
        formation: &FormationId,
        degrees: f32,
    ) -> Result<(), BackendError> {
        self.respond(RecordedCall::SetViewRotation {
            formation: formation.clone(),
            degrees,
        })
    }

    fn swap_flyers(
        &self,
        step: &StepId,
        flyer_a: &FlyerId,
        flyer_b: &FlyerId,
    ) -> Result<(), BackendError> {
        self.respond(RecordedCall::SwapFlyers {
            step: step.clone(),
            flyer_a: flyer_a.clone(),
            flyer_b: flyer_b.clone(),
        })
    }
}

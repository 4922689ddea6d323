#![forbid(unsafe_code)]

//! Worker-thread execution of mutation requests.
//!
//! The UI loop is synchronous and must never wait on the network, so
//! requests are queued to a dedicated thread and verdicts flow back through
//! a channel the host drains once per frame (or on wake). Outcomes arrive
//! in completion order; callers correlate them by token.
//!
//! # Invariants
//!
//! 1. Requests execute serially, in submission order.
//! 2. Every submitted request produces exactly one outcome, unless the
//!    executor is dropped first.
//! 3. Dropping the executor stops the worker; outstanding requests are
//!    discarded without a verdict.

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread::JoinHandle;

use crate::{MutationBackend, MutationOutcome, MutationRequest};

/// Error returned when submitting to a stopped executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorClosed;

impl fmt::Display for ExecutorClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("mutation executor is shut down")
    }
}

impl std::error::Error for ExecutorClosed {}

/// Runs backend calls on a worker thread and hands verdicts back.
pub struct MutationExecutor {
    requests: Sender<MutationRequest>,
    outcomes: Receiver<MutationOutcome>,
    worker: Option<JoinHandle<()>>,
}

impl MutationExecutor {
    /// Spawn the worker thread for `backend`.
    #[must_use]
    pub fn spawn(backend: Arc<dyn MutationBackend + Send + Sync>) -> Self {
        let (request_tx, request_rx) = channel::<MutationRequest>();
        let (outcome_tx, outcome_rx) = channel::<MutationOutcome>();

        let worker = std::thread::Builder::new()
            .name("formgrid-mutations".into())
            .spawn(move || {
                while let Ok(request) = request_rx.recv() {
                    let outcome = backend.execute(request);
                    if outcome_tx.send(outcome).is_err() {
                        break;
                    }
                }
            })
            .ok();

        if worker.is_none() {
            tracing::warn!("failed to spawn mutation worker; commits will not resolve");
        }

        Self {
            requests: request_tx,
            outcomes: outcome_rx,
            worker,
        }
    }

    /// Queue a request for execution.
    pub fn submit(&self, request: MutationRequest) -> Result<(), ExecutorClosed> {
        tracing::debug!(token = %request.token, kind = ?request.op.kind(), "mutation submitted");
        self.requests.send(request).map_err(|_| ExecutorClosed)
    }

    /// Take the next available outcome, if any. Never blocks.
    #[must_use]
    pub fn poll_outcome(&self) -> Option<MutationOutcome> {
        match self.outcomes.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drain every outcome that has arrived so far. Never blocks.
    #[must_use]
    pub fn drain_outcomes(&self) -> Vec<MutationOutcome> {
        std::iter::from_fn(|| self.poll_outcome()).collect()
    }
}

impl Drop for MutationExecutor {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        let (closed_tx, _) = channel();
        self.requests = closed_tx;
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl fmt::Debug for MutationExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationExecutor")
            .field("worker_alive", &self.worker.is_some())
            .finish()
    }
}

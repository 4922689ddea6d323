#![forbid(unsafe_code)]

//! Commands: side effects requested by the models.
//!
//! Model updates are pure state transitions that return a [`Cmd`] describing
//! what the host should do next. The host submits mutations to the executor
//! and feeds the resulting outcomes back as messages; the models never touch
//! the network themselves.

use formgrid_backend::MutationRequest;

/// A side effect requested by a model update.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// No operation.
    None,
    /// Submit a mutation to the backend executor.
    Mutate(MutationRequest),
    /// Ask the host to re-derive server-side state (counts, step summaries)
    /// after a confirmed swap.
    Refresh,
    /// Execute several commands.
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a no-op command.
    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        Self::None
    }

    /// Create a mutation command.
    #[inline]
    #[must_use]
    pub const fn mutate(request: MutationRequest) -> Self {
        Self::Mutate(request)
    }

    /// Create a refresh command.
    #[inline]
    #[must_use]
    pub const fn refresh() -> Self {
        Self::Refresh
    }

    /// Create a batch, collapsing trivial cases.
    #[must_use]
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }

    /// Check if this is the no-op command.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Collect every mutation request in this command tree.
    #[must_use]
    pub fn requests(self) -> Vec<MutationRequest> {
        match self {
            Self::None | Self::Refresh => Vec::new(),
            Self::Mutate(request) => vec![request],
            Self::Batch(cmds) => cmds.into_iter().flat_map(Self::requests).collect(),
        }
    }
}

impl Default for Cmd {
    fn default() -> Self {
        Self::None
    }
}

//! Pipeline states and their order.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Setup,
    Build,
    Deploy,
    Restart,
    Cleanup,
    Done,
    Aborted,
}

impl PipelineState {
    /// The five working phases, in execution order.
    pub const PHASES: [PipelineState; 5] = [
        PipelineState::Setup,
        PipelineState::Build,
        PipelineState::Deploy,
        PipelineState::Restart,
        PipelineState::Cleanup,
    ];

    /// State entered after this one succeeds. Terminal states stay put.
    pub fn next(self) -> PipelineState {
        match self {
            PipelineState::Setup => PipelineState::Build,
            PipelineState::Build => PipelineState::Deploy,
            PipelineState::Deploy => PipelineState::Restart,
            PipelineState::Restart => PipelineState::Cleanup,
            PipelineState::Cleanup | PipelineState::Done => PipelineState::Done,
            PipelineState::Aborted => PipelineState::Aborted,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Aborted)
    }

    /// 1-based position among [`Self::PHASES`].
    pub fn step(self) -> Option<usize> {
        Self::PHASES.iter().position(|s| *s == self).map(|i| i + 1)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Setup => "setup",
            PipelineState::Build => "build",
            PipelineState::Deploy => "deploy",
            PipelineState::Restart => "restart",
            PipelineState::Cleanup => "cleanup",
            PipelineState::Done => "done",
            PipelineState::Aborted => "aborted",
        };
        write!(f, "{}", name)
    }
}

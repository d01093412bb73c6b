use gaffer_core::fpl::PlayerId;

/// Why an optimization request produced no squad.
#[derive(Debug, thiserror::Error)]
pub enum OptimizeError {
    #[error("no feasible squad: {reason}")]
    Infeasible { reason: String },

    #[error("player {id} is not in the bootstrap data")]
    UnknownPlayer { id: PlayerId },

    #[error("invalid squad: {reason}")]
    InvalidSquad { reason: String },

    #[error("solver failed: {0}")]
    Solver(String),
}

impl OptimizeError {
    pub(crate) fn infeasible(reason: impl Into<String>) -> Self {
        OptimizeError::Infeasible {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_squad(reason: impl Into<String>) -> Self {
        OptimizeError::InvalidSquad {
            reason: reason.into(),
        }
    }
}

// Expected-points projection and squad optimization.
//
// Everything here is synchronous and performs no I/O: callers gather the
// bootstrap, fixtures and recent snapshots first (see `gaffer_core::source`)
// and hand them over by reference.

pub mod assemble;
pub mod error;
pub mod model;
pub mod optimize;
pub mod score;
pub mod solver;
pub mod strength;
pub mod xp;

pub use error::OptimizeError;
pub use model::{Bounds, Candidate, ConstraintKey, SquadModel};
pub use optimize::{OptimizeRequest, Optimizer, RankedPlayer};
pub use solver::{LpSolver, SquadSolver};
pub use xp::Estimator;

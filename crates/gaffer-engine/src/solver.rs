// Solver seam and the good_lp backend.

use std::time::Instant;

use good_lp::solvers::microlp::microlp;
use good_lp::{
    constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable,
};
use tracing::debug;

use crate::error::OptimizeError;
use crate::model::SquadModel;

/// Solves a squad model, returning one selection flag per candidate.
pub trait SquadSolver: Send + Sync {
    /// Solver name for logging.
    fn name(&self) -> &'static str;

    /// Maximise total xp subject to the model's constraints.
    fn solve(&self, model: &SquadModel) -> Result<Vec<bool>, OptimizeError>;
}

/// Mixed-integer solver backed by good_lp's pure-Rust `microlp` backend.
#[derive(Debug, Default, Clone)]
pub struct LpSolver;

impl LpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl SquadSolver for LpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, model: &SquadModel) -> Result<Vec<bool>, OptimizeError> {
        if model.candidates.is_empty() {
            return Err(OptimizeError::infeasible("no candidate players"));
        }
        if let Some(key) = model.unreachable_minimum() {
            return Err(OptimizeError::infeasible(format!(
                "not enough candidates to satisfy {key}"
            )));
        }

        let started = Instant::now();
        let mut vars = variables!();
        let picks: Vec<Variable> = model
            .candidates
            .iter()
            .map(|_| vars.add(variable().binary()))
            .collect();

        let objective: Expression = picks
            .iter()
            .zip(&model.candidates)
            .map(|(v, c)| c.xp * *v)
            .sum();

        let mut problem = vars.maximise(objective).using(microlp);

        let mut rows = 0usize;
        for (key, bounds) in &model.constraints {
            let terms: Vec<(f64, Variable)> = picks
                .iter()
                .zip(&model.candidates)
                .map(|(v, c)| (SquadModel::coefficient(c, *key), *v))
                .filter(|(coef, _)| *coef != 0.0)
                .collect();
            if terms.is_empty() {
                // Nothing to constrain; reachability was checked above.
                continue;
            }
            let lhs: Expression = terms.into_iter().map(|(coef, v)| coef * v).sum();
            let min = f64::from(bounds.min);
            let max = f64::from(bounds.max);

            if bounds.is_exact() {
                problem = problem.with(constraint!(lhs == max));
                rows += 1;
                continue;
            }
            if bounds.min > 0 {
                problem = problem.with(constraint!(lhs.clone() >= min));
                rows += 1;
            }
            problem = problem.with(constraint!(lhs <= max));
            rows += 1;
        }

        debug!(
            solver = self.name(),
            kind = ?model.kind,
            candidates = model.candidates.len(),
            rows,
            "solving squad model"
        );

        let solution = problem.solve().map_err(|e| match e {
            ResolutionError::Infeasible => {
                OptimizeError::infeasible("solver found no selection meeting every constraint")
            }
            other => OptimizeError::Solver(other.to_string()),
        })?;

        let selected: Vec<bool> = picks.iter().map(|v| solution.value(*v) > 0.5).collect();
        debug!(
            selected = selected.iter().filter(|s| **s).count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "squad model solved"
        );
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Candidate, ConstraintKey};
    use gaffer_core::config::SquadConfig;
    use gaffer_core::fpl::PositionClass;

    fn candidate(id: u32, position: PositionClass, team: u32, xp: f64) -> Candidate {
        Candidate {
            id,
            position,
            team,
            cost: 50,
            xp,
        }
    }

    /// Two keepers, five defenders, five midfielders, three forwards: one
    /// legal lineup per formation.
    fn squad() -> Vec<Candidate> {
        let mut pool = vec![
            candidate(1, PositionClass::Goalkeeper, 1, 4.0),
            candidate(2, PositionClass::Goalkeeper, 2, 3.0),
        ];
        for i in 0..5 {
            pool.push(candidate(10 + i, PositionClass::Defender, 3 + i, 1.0 + f64::from(i)));
            pool.push(candidate(20 + i, PositionClass::Midfielder, 3 + i, 2.0 + f64::from(i)));
        }
        for i in 0..3 {
            pool.push(candidate(30 + i, PositionClass::Forward, 1 + i, 5.0 - f64::from(i)));
        }
        pool
    }

    #[test]
    fn name() {
        assert_eq!(LpSolver::new().name(), "microlp");
    }

    #[test]
    fn lineup_picks_best_feasible_eleven() {
        let model = SquadModel::lineup(squad(), &SquadConfig::default());
        let selected = LpSolver::new().solve(&model).unwrap();
        assert_eq!(model.violation(&selected), None);
        assert_eq!(selected.iter().filter(|s| **s).count(), 11);
        // The better keeper starts.
        assert!(selected[0]);
        assert!(!selected[1]);
        // The weakest defender (xp 1.0) sits out in favour of midfielders.
        let weakest_def = model.candidates.iter().position(|c| c.id == 10).unwrap();
        assert!(!selected[weakest_def]);
    }

    #[test]
    fn negative_xp_players_are_left_out() {
        let mut pool = squad();
        for c in pool.iter_mut().filter(|c| c.position == PositionClass::Midfielder) {
            c.xp = -1.0;
        }
        if let Some(weak) = pool.iter_mut().find(|c| c.id == 10) {
            weak.xp = -0.5;
        }
        let model = SquadModel::lineup(pool, &SquadConfig::default());
        let selected = LpSolver::new().solve(&model).unwrap();
        let mids = model
            .candidates
            .iter()
            .zip(&selected)
            .filter(|(c, s)| **s && c.position == PositionClass::Midfielder)
            .count();
        // Minimum midfielders, four defenders: ten starters.
        assert_eq!(mids, 2);
        assert_eq!(model.row_value(ConstraintKey::Picks, &selected), 10.0);
        assert_eq!(model.violation(&selected), None);
    }

    #[test]
    fn empty_pool_is_infeasible() {
        let model = SquadModel::lineup(vec![], &SquadConfig::default());
        assert!(matches!(
            LpSolver::new().solve(&model),
            Err(OptimizeError::Infeasible { .. })
        ));
    }

    #[test]
    fn short_position_is_infeasible() {
        let pool: Vec<Candidate> = squad()
            .into_iter()
            .filter(|c| c.position != PositionClass::Forward)
            .collect();
        let model = SquadModel::lineup(pool, &SquadConfig::default());
        match LpSolver::new().solve(&model) {
            Err(OptimizeError::Infeasible { reason }) => assert!(reason.contains("FWD"), "{reason}"),
            other => panic!("expected Infeasible, got: {other:?}"),
        }
    }

    #[test]
    fn team_quota_is_enforced_by_the_solver() {
        // Five strong defenders from one club; only three may start.
        let mut pool = squad();
        for c in pool.iter_mut().filter(|c| c.position == PositionClass::Defender) {
            c.team = 9;
            c.xp += 10.0;
        }
        let model = SquadModel::lineup(pool, &SquadConfig::default());
        let selected = LpSolver::new().solve(&model).unwrap();
        assert_eq!(model.row_value(ConstraintKey::Team(9), &selected), 3.0);
        assert_eq!(model.violation(&selected), None);
    }
}

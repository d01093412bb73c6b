// Top-level optimization entry points.
//
// Wildcard mode picks fifteen from the registered pool, then picks the best
// starting eleven from those fifteen. Incremental mode only rearranges an
// existing squad: the output holds exactly the input players.

use std::collections::{HashMap, HashSet};

use gaffer_core::config::{ModelConfig, SquadConfig};
use gaffer_core::fpl::{
    Bootstrap, EntryPicks, Fixture, History, LiveEvent, Pick, Player, PlayerId, PositionClass,
    TeamId,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::assemble::assemble;
use crate::error::OptimizeError;
use crate::model::{Candidate, SquadModel};
use crate::solver::{LpSolver, SquadSolver};
use crate::xp::Estimator;

/// Inputs for one optimization call. All borrowed; nothing is fetched here.
#[derive(Debug, Clone, Copy)]
pub struct OptimizeRequest<'a> {
    pub bootstrap: &'a Bootstrap,
    /// Prior-season records for the history blend.
    pub history: Option<&'a History>,
    pub fixtures: &'a [Fixture],
    /// Recent finished gameweek snapshots.
    pub last5: Option<&'a [LiveEvent]>,
    /// Existing squad. Present selects incremental mode.
    pub picks: Option<&'a EntryPicks>,
    /// Gameweek offset from the current gameweek (1 = next).
    pub delta_event: i32,
}

impl<'a> OptimizeRequest<'a> {
    /// A wildcard request with no history, recent form or squad.
    pub fn new(bootstrap: &'a Bootstrap, fixtures: &'a [Fixture]) -> Self {
        OptimizeRequest {
            bootstrap,
            history: None,
            fixtures,
            last5: None,
            picks: None,
            delta_event: 1,
        }
    }
}

/// A player with projected points, as listed by `rank_players`.
#[derive(Debug, Clone, Serialize)]
pub struct RankedPlayer {
    pub id: PlayerId,
    pub web_name: String,
    pub position: PositionClass,
    pub team: TeamId,
    pub cost: u32,
    pub xp: f64,
}

pub struct Optimizer<S = LpSolver> {
    solver: S,
    model: ModelConfig,
    squad: SquadConfig,
}

impl Optimizer<LpSolver> {
    pub fn new(model: ModelConfig, squad: SquadConfig) -> Self {
        Optimizer::with_solver(LpSolver::new(), model, squad)
    }
}

impl<S: SquadSolver> Optimizer<S> {
    pub fn with_solver(solver: S, model: ModelConfig, squad: SquadConfig) -> Self {
        Optimizer {
            solver,
            model,
            squad,
        }
    }

    fn estimator<'a>(&self, req: &OptimizeRequest<'a>) -> Estimator<'a> {
        let mut estimator = Estimator::new(
            req.bootstrap,
            req.fixtures,
            req.bootstrap.current_gameweek(),
            self.model.clone(),
        );
        if let Some(history) = req.history {
            estimator = estimator.with_history(history);
        }
        if let Some(recent) = req.last5 {
            estimator = estimator.with_recent(recent);
        }
        estimator
    }

    fn candidate(&self, estimator: &Estimator<'_>, player: &Player, delta: i32) -> Candidate {
        Candidate {
            id: player.id,
            position: player.element_type,
            team: player.team,
            cost: player.now_cost,
            xp: estimator.estimate_horizon(player, delta, self.model.horizon),
        }
    }

    /// Run the optimizer. Incremental mode when `req.picks` is present,
    /// wildcard otherwise.
    pub fn optimize(&self, req: &OptimizeRequest<'_>) -> Result<Vec<Pick>, OptimizeError> {
        let estimator = self.estimator(req);
        let picks = match req.picks {
            Some(existing) => self.incremental(&estimator, req, existing)?,
            None => self.wildcard(&estimator, req)?,
        };
        info!(
            mode = if req.picks.is_some() { "incremental" } else { "wildcard" },
            gameweek = estimator.current_gameweek(),
            delta = req.delta_event,
            picks = picks.len(),
            total_xp = picks.iter().map(|p| p.xp).sum::<f64>(),
            "optimization complete"
        );
        Ok(picks)
    }

    /// `optimize` for callers that only understand "empty means unavailable".
    pub fn optimize_or_empty(&self, req: &OptimizeRequest<'_>) -> Vec<Pick> {
        match self.optimize(req) {
            Ok(picks) => picks,
            Err(e) => {
                warn!("optimization unavailable: {}", e);
                Vec::new()
            }
        }
    }

    fn wildcard(
        &self,
        estimator: &Estimator<'_>,
        req: &OptimizeRequest<'_>,
    ) -> Result<Vec<Pick>, OptimizeError> {
        let pool: Vec<Candidate> = req
            .bootstrap
            .elements
            .iter()
            .filter(|p| p.status.is_registered())
            .map(|p| self.candidate(estimator, p, req.delta_event))
            .collect();
        debug!(eligible = pool.len(), "wildcard pool");

        let model = SquadModel::wildcard(pool, &self.squad);
        let chosen = self.solver.solve(&model)?;
        let squad: Vec<Candidate> = model
            .candidates
            .into_iter()
            .zip(chosen)
            .filter_map(|(c, on)| on.then_some(c))
            .collect();

        self.pick_lineup(squad)
    }

    fn incremental(
        &self,
        estimator: &Estimator<'_>,
        req: &OptimizeRequest<'_>,
        existing: &EntryPicks,
    ) -> Result<Vec<Pick>, OptimizeError> {
        if existing.picks.is_empty() {
            return Err(OptimizeError::invalid_squad("squad has no players"));
        }
        let mut seen = HashSet::new();
        let mut squad = Vec::with_capacity(existing.picks.len());
        for pick in &existing.picks {
            if !seen.insert(pick.element) {
                return Err(OptimizeError::invalid_squad(format!(
                    "player {} appears twice",
                    pick.element
                )));
            }
            let player = req
                .bootstrap
                .player(pick.element)
                .ok_or(OptimizeError::UnknownPlayer { id: pick.element })?;
            squad.push(self.candidate(estimator, player, req.delta_event));
        }

        // The lineup can only bench the best player if a club is over quota.
        let mut per_team: HashMap<TeamId, u32> = HashMap::new();
        for c in &squad {
            *per_team.entry(c.team).or_insert(0) += 1;
        }
        if let Some((team, count)) = per_team
            .into_iter()
            .filter(|(_, n)| *n > self.squad.max_per_team)
            .min_by_key(|(team, _)| *team)
        {
            return Err(OptimizeError::invalid_squad(format!(
                "{count} players from team {team}, at most {} allowed",
                self.squad.max_per_team
            )));
        }
        self.pick_lineup(squad)
    }

    fn pick_lineup(&self, squad: Vec<Candidate>) -> Result<Vec<Pick>, OptimizeError> {
        let model = SquadModel::lineup(squad, &self.squad);
        let starting = self.solver.solve(&model)?;
        Ok(assemble(&model.candidates, &starting))
    }

    /// Every player with their projection, best first (lowest id on ties).
    pub fn rank_players(&self, req: &OptimizeRequest<'_>) -> Vec<RankedPlayer> {
        let estimator = self.estimator(req);
        let mut ranked: Vec<RankedPlayer> = req
            .bootstrap
            .elements
            .iter()
            .map(|p| RankedPlayer {
                id: p.id,
                web_name: p.web_name.clone(),
                position: p.element_type,
                team: p.team,
                cost: p.now_cost,
                xp: estimator.estimate_horizon(p, req.delta_event, self.model.horizon),
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.xp.partial_cmp(&a.xp)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });
        ranked
    }
}

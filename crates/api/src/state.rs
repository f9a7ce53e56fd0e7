use std::sync::Arc;

use async_trait::async_trait;
use jobs::InMemJobs;
use sched_core::{CancelToken, Solver, SolveEnvelope, SolveResult};
use solver_backtrack::BacktrackSolver;
use solver_heur::HeurSolver;

#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<InMemJobs<DispatchSolver>>,
}

/// Routes a [`SolveEnvelope`] to the backtracking or population-based solver
/// based on `params.solver`.
#[derive(Clone)]
pub struct DispatchSolver {
    backtrack: Arc<BacktrackSolver>,
    heur: Arc<HeurSolver>,
}

impl DispatchSolver {
    pub fn new() -> Self {
        Self {
            backtrack: Arc::new(BacktrackSolver::new()),
            heur: Arc::new(HeurSolver::new()),
        }
    }
}

impl Default for DispatchSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Solver for DispatchSolver {
    async fn solve(&self, env: SolveEnvelope, cancel: &CancelToken) -> anyhow::Result<SolveResult> {
        match env.params.solver {
            types::SolverKind::Backtrack => self.backtrack.solve(env, cancel).await,
            types::SolverKind::Heuristic => self.heur.solve(env, cancel).await,
        }
    }
}

impl AppState {
    pub fn new_default() -> Self {
        let jobs = InMemJobs::new(DispatchSolver::new());
        Self { jobs: Arc::new(jobs) }
    }
}

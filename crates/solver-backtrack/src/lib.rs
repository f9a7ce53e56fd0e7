mod search;

use async_trait::async_trait;
use sched_core::{CancelToken, Problem, Solver, SolveEnvelope, SolveResult};
use tracing::info;

pub use search::Outcome;

/// Systematic backtracking solver (MRV + degree + LCV). Single-threaded and
/// deterministic given its input `Instance`.
pub struct BacktrackSolver;

impl BacktrackSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BacktrackSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Solver for BacktrackSolver {
    async fn solve(&self, env: SolveEnvelope, cancel: &CancelToken) -> anyhow::Result<SolveResult> {
        info!(
            subjects = env.instance.subjects.len(),
            rooms = env.instance.rooms.len(),
            "backtracking solver received instance"
        );

        let problem = Problem::build(env.instance);
        let daily_cap = env.params.daily_cap;

        match search::search(&problem, daily_cap, cancel) {
            Outcome::Solved(placements) => {
                let report = sched_core::scoring::evaluate(&problem, &placements);
                let assignments = sched_core::to_assignments(&problem, &placements);
                Ok(SolveResult {
                    status: "solved".into(),
                    fitness: report.fitness,
                    assignments,
                    stats: serde_json::json!({
                        "method": "backtrack",
                        "lessons": problem.lessons.len(),
                        "warnings": problem.warnings,
                        "penalty": report.penalty,
                    }),
                })
            }
            Outcome::Infeasible => Ok(SolveResult {
                status: "infeasible".into(),
                fitness: 0.0,
                assignments: vec![],
                stats: serde_json::json!({
                    "method": "backtrack",
                    "lessons": problem.lessons.len(),
                    "warnings": problem.warnings,
                }),
            }),
            Outcome::Cancelled => Ok(SolveResult {
                status: "cancelled".into(),
                fitness: 0.0,
                assignments: vec![],
                stats: serde_json::json!({"method": "backtrack"}),
            }),
        }
    }
}

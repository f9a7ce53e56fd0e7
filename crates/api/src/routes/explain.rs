use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sched_core::{from_assignments, scoring::evaluate, Problem};
use types::{Assignment, Instance};

#[derive(Deserialize, ToSchema)]
pub struct ExplainIn {
    pub instance: Instance,
    pub assignments: Vec<Assignment>,
}

#[derive(Serialize, ToSchema)]
pub struct ExplainOut {
    pub fitness: f64,
    pub penalty: f64,
    pub gaps_groups: i64,
    pub gaps_instructors: i64,
    pub workload_excess: i64,
    pub count_deviation: i64,
}

#[utoipa::path(
    post,
    path = "/v1/explain",
    request_body = ExplainIn,
    responses(
    (status = 200, description = "Fitness breakdown for an instance/assignment pair", body = ExplainOut)
    )
)]
pub async fn explain(Json(input): Json<ExplainIn>) -> Json<ExplainOut> {
    let problem = Problem::build(input.instance);
    let placements = from_assignments(&problem, &input.assignments);
    let report = evaluate(&problem, &placements);
    Json(ExplainOut {
        fitness: report.fitness,
        penalty: report.penalty,
        gaps_groups: report.gaps_groups,
        gaps_instructors: report.gaps_instructors,
        workload_excess: report.workload_excess,
        count_deviation: report.count_deviation,
    })
}

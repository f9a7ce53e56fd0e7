use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sched_core::{from_assignments, materialize::materialize, Problem};
use types::SolveResult;

#[utoipa::path(
        get,
        path = "/v1/jobs/{id}",
        params(("id" = String, Path, description = "Job ID")),
        responses((status = 200, description = "Job status", body = jobs::JobStatus))
    )]
pub async fn status(State(state): State<AppState>, Path(id): Path<String>) -> Json<serde_json::Value> {
    let st = state.jobs.get(&id);
    Json(match st {
        None => serde_json::json!({"status": "not_found"}),
        Some(s) => serde_json::to_value(s).unwrap(),
    })
}

#[utoipa::path(
        get,
        path = "/v1/jobs/{id}/result",
        params(("id" = String, Path, description = "Job ID")),
        responses(
            (status = 200, description = "Solve result with materialized even/odd timetables (if ready)", body = SolveResult)
        )
    )]
pub async fn result(State(state): State<AppState>, Path(id): Path<String>) -> (StatusCode, Json<serde_json::Value>) {
    let st = state.jobs.get(&id);
    match st {
        Some(jobs::JobStatus::Solved { instance, result }) => {
            let problem = Problem::build(instance);
            let placements = from_assignments(&problem, &result.assignments);
            let timetable = materialize(&problem, &placements);
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "status": result.status,
                    "fitness": result.fitness,
                    "assignments": result.assignments,
                    "stats": result.stats,
                    "timetable": timetable,
                })),
            )
        }
        Some(jobs::JobStatus::Cancelled) => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"status": "cancelled"})),
        ),
        Some(_) => (StatusCode::OK, Json(serde_json::json!({"status": "not_ready"}))),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({"status": "not_found"}))),
    }
}

#[utoipa::path(
        post,
        path = "/v1/jobs/{id}/cancel",
        params(("id" = String, Path, description = "Job ID")),
        responses((status = 200, description = "Cancellation requested"))
    )]
pub async fn cancel(State(state): State<AppState>, Path(id): Path<String>) -> Json<serde_json::Value> {
    state.jobs.cancel(&id);
    Json(serde_json::json!({"status": "cancel_requested"}))
}

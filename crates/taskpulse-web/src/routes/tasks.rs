//! Task route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use taskpulse_core::task::{self, model::TaskStats, NewTask, TaskQuery, TaskUpdate};
use taskpulse_core::Task;

use super::error_response;
use crate::state::AppState;

type ApiResult<T> = Result<T, (StatusCode, String)>;

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = task::list_tasks(&state.db, query).map_err(error_response)?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let task = task::get_task(&state.db, id).map_err(error_response)?;
    Ok(Json(task))
}

/// Create a task; high-priority tasks are pushed to every connected client
/// after the row is written.
pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<NewTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = task::create_task(&state.db, &req).map_err(error_response)?;

    state.notify_created(&task);

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<TaskUpdate>,
) -> ApiResult<Json<Task>> {
    let task = task::update_task(&state.db, id, &req).map_err(error_response)?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    task::delete_task(&state.db, id).map_err(error_response)?;
    Ok(Json(json!({ "success": true })))
}

pub async fn complete_all(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let updated = task::complete_all(&state.db).map_err(error_response)?;
    Ok(Json(json!({ "updated": updated })))
}

pub async fn clear_completed(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let deleted = task::clear_completed(&state.db).map_err(error_response)?;
    Ok(Json(json!({ "deleted": deleted })))
}

pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<TaskStats>> {
    let stats = task::get_stats(&state.db).map_err(error_response)?;
    Ok(Json(stats))
}

//! HTTP handlers. Each one is a thin adapter over [`TaskService`]: it extracts
//! the path/body, calls the service, and maps the result to a status code.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use super::error::ApiErrorResponse;
use crate::error::TaskerError;
use crate::models::{Task, TaskInput};
use crate::reconciler::TaskService;
use crate::store::TaskStore;

pub type SharedService = Arc<TaskService<Box<dyn TaskStore>>>;

#[derive(Clone)]
pub struct AppState {
    pub service: SharedService,
}

impl AppState {
    pub fn new(service: TaskService<Box<dyn TaskStore>>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

type ApiResult<T> = Result<T, ApiErrorResponse>;

fn body(payload: Result<Json<TaskInput>, JsonRejection>) -> ApiResult<TaskInput> {
    payload.map(|Json(input)| input).map_err(|rejection| {
        tracing::debug!(%rejection, "rejected request body");
        ApiErrorResponse::from_service(TaskerError::malformed(rejection.body_text()), "invalid JSON")
    })
}

/// `GET /`
pub async fn health_check() -> Json<Value> {
    Json(json!({ "message": "hello world" }))
}

/// `GET /tasks`
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    state
        .service
        .list_tasks()
        .map(Json)
        .map_err(|e| ApiErrorResponse::from_service(e, "failed to fetch tasks"))
}

/// `GET /tasks/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    state
        .service
        .get_task(&id)
        .map(Json)
        .map_err(|e| ApiErrorResponse::from_service(e, "failed to fetch task"))
}

/// `POST /tasks`
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let input = body(payload)?;
    let task = state
        .service
        .create_task(&input)
        .map_err(|e| ApiErrorResponse::from_service(e, "failed to save task"))?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /tasks/{id}`
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let input = body(payload)?;
    state
        .service
        .update_task(&id, &input)
        .map(Json)
        .map_err(|e| ApiErrorResponse::from_service(e, "failed to update task"))
}

/// `DELETE /tasks/{id}`
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .service
        .delete_task(&id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| ApiErrorResponse::from_service(e, "failed to delete task"))
}

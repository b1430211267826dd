use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::AuthUser,
    error::{ApiResponse, AppError},
    state::AppState,
    tasks::{
        dto::{CreateTaskRequest, TaskEnvelope, TaskListResponse, UpdateTaskRequest},
        pagination::{ListQuery, PageRequest},
        services,
    },
    validation::ValidJson,
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", post(create_task).get(list_tasks))
        .route("/tasks/", put(missing_task_id).delete(missing_task_id))
        .route("/tasks/:id", put(update_task).delete(delete_task))
}

#[instrument(skip(state, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidJson(payload): ValidJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TaskEnvelope>>), AppError> {
    let task = services::create(state.tasks.as_ref(), user_id, payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(TaskEnvelope { task: task.into() })),
    ))
}

#[instrument(skip(state, query))]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<TaskListResponse>>, AppError> {
    let Query(query) = query.map_err(|e| {
        warn!(error = %e, "rejected query string");
        AppError::bad_request("Invalid query string")
    })?;
    let page = PageRequest::parse(&query)?;

    let (tasks, pagination) = services::list(state.tasks.as_ref(), user_id, page).await?;
    Ok(Json(ApiResponse::success(TaskListResponse {
        tasks: tasks.into_iter().map(Into::into).collect(),
        pagination,
    })))
}

#[instrument(skip(state, payload))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<UpdateTaskRequest>,
) -> Result<Json<ApiResponse<TaskEnvelope>>, AppError> {
    let task_id = services::parse_task_id(&id)?;
    let task = services::update(state.tasks.as_ref(), user_id, task_id, payload.into()).await?;
    Ok(Json(ApiResponse::success(TaskEnvelope { task: task.into() })))
}

#[instrument(skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let task_id = services::parse_task_id(&id)?;
    services::delete(state.tasks.as_ref(), user_id, task_id).await?;
    Ok(Json(ApiResponse::ack("Task deleted successfully")))
}

/// `PUT/DELETE /tasks/` with an empty ID segment.
pub async fn missing_task_id(AuthUser(_): AuthUser) -> AppError {
    AppError::bad_request("Task ID is required")
}

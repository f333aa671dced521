//! Task API endpoints
//!
//! RESTful API for task CRUD operations.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Path, Query, Request, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tb_core::task::{NewTask, Task, TaskPatch, TaskQuery, TaskStatus};
use tb_core::{Error, Violation};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date.to_rfc3339(),
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<Violation>>,
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

/// JSON body extractor whose rejections keep the error-body contract
///
/// Axum's stock `Json` rejection replies in plain text; callers are promised
/// a JSON body with an `error` message on every failure, so malformed bodies
/// and wrong content types are mapped to the regular 400 shape here.
pub struct BodyJson<T>(pub T);

impl<S, T> FromRequest<S> for BodyJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ErrorReply;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(%rejection, "rejected request body");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Invalid JSON body".to_string(),
                    details: None,
                }),
            )
        })?;
        Ok(Self(value))
    }
}

/// Map a core error to its HTTP reply
///
/// Store-side failures are reported as a generic 500; the underlying message
/// is only exposed in development mode.
fn error_response(err: Error, dev_mode: bool) -> ErrorReply {
    match err {
        Error::Validation(details) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(details),
            }),
        ),
        Error::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Task {} not found", id),
                details: None,
            }),
        ),
        err @ (Error::Store(_) | Error::Io(_) | Error::Serialization(_)) => {
            tracing::error!(error = %err, "store operation failed");
            let message = if dev_mode {
                err.to_string()
            } else {
                "Internal server error".to_string()
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: message,
                    details: None,
                }),
            )
        }
    }
}

/// Path ids are opaque; anything that is not a UUID names a task that
/// cannot exist, so it reads as not-found rather than a bad request.
fn parse_id(raw: &str) -> Result<Uuid, ErrorReply> {
    Uuid::parse_str(raw).map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Task {} not found", raw),
                details: None,
            }),
        )
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/tasks - Create a new task
async fn create_task(
    State(state): State<AppState>,
    BodyJson(payload): BodyJson<NewTask>,
) -> Result<(StatusCode, Json<TaskResponse>), ErrorReply> {
    let created = state
        .service()
        .create(payload)
        .await
        .map_err(|e| error_response(e, state.dev_mode()))?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(created))))
}

/// GET /api/tasks - List tasks, optionally filtered and sorted
async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Vec<TaskResponse>>, ErrorReply> {
    let tasks = state
        .service()
        .list(query)
        .await
        .map_err(|e| error_response(e, state.dev_mode()))?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// GET /api/tasks/:id - Get a single task
async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ErrorReply> {
    let id = parse_id(&id)?;
    let task = state
        .service()
        .get(id)
        .await
        .map_err(|e| error_response(e, state.dev_mode()))?;

    Ok(Json(TaskResponse::from(task)))
}

/// PUT /api/tasks/:id - Partially update a task
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    BodyJson(patch): BodyJson<TaskPatch>,
) -> Result<Json<TaskResponse>, ErrorReply> {
    let id = parse_id(&id)?;
    let updated = state
        .service()
        .update(id, patch)
        .await
        .map_err(|e| error_response(e, state.dev_mode()))?;

    Ok(Json(TaskResponse::from(updated)))
}

/// DELETE /api/tasks/:id - Delete a task
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ErrorReply> {
    let id = parse_id(&id)?;
    state
        .service()
        .delete(id)
        .await
        .map_err(|e| error_response(e, state.dev_mode()))?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}

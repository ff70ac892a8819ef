//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use exercise_tracker_core::domain::Exercise;
use exercise_tracker_core::ports::PortError;
use exercise_tracker_core::query::{parse_date_or_today, query_log, render_day};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_user_handler,
        list_users_handler,
        add_exercise_handler,
        get_log_handler,
    ),
    components(
        schemas(
            CreateUserRequest,
            UserResponse,
            AddExerciseRequest,
            ExerciseResponse,
            LogEntry,
            LogResponse,
            ErrorBody,
        )
    ),
    tags(
        (name = "Exercise Tracker API", description = "API endpoints for registering users and logging exercises.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: Option<String>,
}

/// The `{ username, _id }` pair returned on registration and in the user list.
#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub username: String,
    #[serde(rename = "_id")]
    pub id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AddExerciseRequest {
    pub description: Option<String>,
    /// Accepted as a JSON number or a numeric string; coerced before use.
    #[schema(value_type = Option<String>)]
    pub duration: Option<serde_json::Value>,
    /// Optional `YYYY-MM-DD`; a missing or unparsable value becomes today (UTC).
    pub date: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ExerciseResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    /// Human-readable day string, e.g. "Thu Jan 05 2023".
    pub date: String,
    pub duration: i64,
    pub description: String,
}

#[derive(Deserialize)]
pub struct LogParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LogEntry {
    pub description: String,
    pub duration: i64,
    pub date: String,
}

#[derive(Serialize, ToSchema)]
pub struct LogResponse {
    pub username: String,
    pub count: usize,
    #[serde(rename = "_id")]
    pub id: String,
    pub log: Vec<LogEntry>,
}

/// All error responses carry a human-readable message in this shape.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

type HandlerError = (StatusCode, Json<ErrorBody>);

fn client_error(message: &str) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

/// Maps store failures onto the wire taxonomy: a missing user is 404, and
/// anything else is a generic 500 with the detail logged, never leaked.
fn map_port_error(e: PortError) -> HandlerError {
    match e {
        PortError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: "user not found".to_string(),
            }),
        ),
        PortError::Unexpected(detail) => {
            error!("Store operation failed: {}", detail);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "internal server error".to_string(),
                }),
            )
        }
    }
}

/// The original service coerces duration with `Number()`, so both `30` and
/// `"30"` are accepted. Fractions are truncated.
fn coerce_duration(raw: Option<&serde_json::Value>) -> Option<i64> {
    match raw? {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

fn render_entry(e: &Exercise) -> LogEntry {
    LogEntry {
        description: e.description.clone(),
        duration: e.duration,
        date: render_day(e.date),
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Register a new user.
///
/// Usernames are not required to be unique; every registration creates a
/// fresh user with a fresh id.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User registered", body = UserResponse),
        (status = 400, description = "Missing username", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, HandlerError> {
    let username = req
        .username
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| client_error("username is required"))?;

    let user = state
        .store
        .create_user(username)
        .await
        .map_err(map_port_error)?;

    Ok(Json(UserResponse {
        username: user.username,
        id: user.id,
    }))
}

/// List every registered user in registration order.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All registered users", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, HandlerError> {
    let users = state.store.list_users().await.map_err(map_port_error)?;
    Ok(Json(
        users
            .into_iter()
            .map(|u| UserResponse {
                username: u.username,
                id: u.id,
            })
            .collect(),
    ))
}

/// Log an exercise against a user.
///
/// The date is permissive: absent or unparsable input silently becomes today
/// (UTC). Description and a numeric duration are required; nothing is written
/// when validation fails.
#[utoipa::path(
    post,
    path = "/api/users/{id}/exercises",
    request_body = AddExerciseRequest,
    responses(
        (status = 200, description = "Exercise logged", body = ExerciseResponse),
        (status = 400, description = "Missing description or non-numeric duration", body = ErrorBody),
        (status = 404, description = "Unknown user id", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    params(
        ("id" = String, Path, description = "The id of the user to log against.")
    )
)]
pub async fn add_exercise_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AddExerciseRequest>,
) -> Result<Json<ExerciseResponse>, HandlerError> {
    let description = req
        .description
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| client_error("description is required"))?
        .to_string();

    let duration = coerce_duration(req.duration.as_ref())
        .ok_or_else(|| client_error("duration (number) is required"))?;

    let date = parse_date_or_today(req.date.as_deref());

    let exercise = Exercise {
        description: description.clone(),
        duration,
        date,
    };
    let user = state
        .store
        .append_exercise(&id, exercise)
        .await
        .map_err(map_port_error)?;

    Ok(Json(ExerciseResponse {
        id: user.id,
        username: user.username,
        date: render_day(date),
        duration,
        description,
    }))
}

/// Retrieve a user's exercise log.
///
/// `from`/`to` must be strict `YYYY-MM-DD` to act as inclusive bounds; a
/// malformed bound is simply not applied. `limit` caps the result after the
/// ascending date sort and is ignored unless it is a number greater than
/// zero. An empty log is a valid result, not an error.
#[utoipa::path(
    get,
    path = "/api/users/{id}/logs",
    responses(
        (status = 200, description = "The filtered, sorted, capped log", body = LogResponse),
        (status = 404, description = "Unknown user id", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    params(
        ("id" = String, Path, description = "The id of the user whose log to read."),
        ("from" = Option<String>, Query, description = "Inclusive lower bound, YYYY-MM-DD."),
        ("to" = Option<String>, Query, description = "Inclusive upper bound, YYYY-MM-DD."),
        ("limit" = Option<String>, Query, description = "Maximum number of entries to return.")
    )
)]
pub async fn get_log_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<LogParams>,
) -> Result<Json<LogResponse>, HandlerError> {
    let user = state.store.find_user(&id).await.map_err(map_port_error)?;
    let exercises = state
        .store
        .exercises_for_user(&id)
        .await
        .map_err(map_port_error)?;

    let log: Vec<LogEntry> = query_log(
        &exercises,
        params.from.as_deref(),
        params.to.as_deref(),
        params.limit.as_deref(),
    )
    .iter()
    .map(render_entry)
    .collect();

    Ok(Json(LogResponse {
        username: user.username,
        count: log.len(),
        id: user.id,
        log,
    }))
}

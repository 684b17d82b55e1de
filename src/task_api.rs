// src/task_api.rs

use std::sync::LazyLock;

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use log::{debug, info};
use regex::Regex;
use serde_json::Value;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::{
    parse_due_date, sort_by_due_date, CreateTaskRequest, DeleteCompletedResponse, DeleteTaskQuery,
    ListTasksQuery, UpdateTaskRequest,
};

pub const ALLOWED_METHODS: &str = "GET, POST, DELETE, PATCH";

const INVALID_REQUEST: &str = "Invalid request data";
const TEXT_REQUIRED: &str = "Task text is required";

static TASK_ID_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("task id pattern is valid"));

/// Mounts `/api/tasks` with one route per supported method.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/tasks")
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                debug!("Rejected task payload: {}", err);
                ApiError::Validation(INVALID_REQUEST).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                debug!("Rejected task query: {}", err);
                ApiError::Validation(INVALID_REQUEST).into()
            }))
            .route(web::get().to(list_tasks))
            .route(web::post().to(create_task))
            .route(web::patch().to(update_task))
            .route(web::delete().to(delete_tasks))
            .default_service(web::to(method_not_allowed)),
    );
}

/// GET /api/tasks
/// Lists every task by id, or by due date with `?sort=due_date`.
pub async fn list_tasks(
    data: web::Data<AppState>,
    query: web::Query<ListTasksQuery>,
) -> Result<HttpResponse, ApiError> {
    let by_due_date = match query.sort.as_deref() {
        None => false,
        Some("due_date") => true,
        Some(_) => return Err(ApiError::Validation(INVALID_REQUEST)),
    };

    let mut tasks = data.store.list_tasks().await?;
    if by_due_date {
        sort_by_due_date(&mut tasks);
    }
    Ok(HttpResponse::Ok().json(tasks))
}

/// POST /api/tasks
pub async fn create_task(
    data: web::Data<AppState>,
    payload: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let CreateTaskRequest { text, due_date } = payload.into_inner();
    let text = text
        .filter(|text| !text.is_empty())
        .ok_or(ApiError::Validation(TEXT_REQUIRED))?;
    let due_date = due_date_from(due_date.as_deref())?;

    let task = data.store.create_task(&text, due_date).await?;
    info!("Task created: {}", task.id);
    Ok(HttpResponse::Created().json(task))
}

/// PATCH /api/tasks
///
/// A body carrying `text` or `due_date` rewrites both fields; otherwise a
/// boolean `completed` toggles completion.
pub async fn update_task(
    data: web::Data<AppState>,
    payload: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = payload
        .task_id()
        .ok_or(ApiError::Validation(INVALID_REQUEST))?;
    let UpdateTaskRequest {
        text,
        due_date,
        completed,
        ..
    } = payload.into_inner();

    let updated = if text.is_some() || due_date.is_some() {
        let text = text
            .flatten()
            .filter(|text| !text.is_empty())
            .ok_or(ApiError::Validation(TEXT_REQUIRED))?;
        let due_date = due_date_from(due_date.flatten().as_deref())?;
        data.store.update_task_fields(id, &text, due_date).await?
    } else if let Some(completed) = completed.as_ref().and_then(Value::as_bool) {
        data.store.update_task_completion(id, completed).await?
    } else {
        return Err(ApiError::Validation(INVALID_REQUEST));
    };

    let task = updated.ok_or(ApiError::NotFound)?;
    debug!("Task updated: {}", task.id);
    Ok(HttpResponse::Ok().json(task))
}

/// DELETE /api/tasks[?id=N]
/// With an id removes that task, without one removes every completed task.
pub async fn delete_tasks(
    data: web::Data<AppState>,
    query: web::Query<DeleteTaskQuery>,
) -> Result<HttpResponse, ApiError> {
    match query.id.as_deref().filter(|id| !id.is_empty()) {
        Some(raw_id) => {
            let id = parse_task_id(raw_id).ok_or(ApiError::Validation("Invalid task ID"))?;
            let task = data.store.delete_task(id).await?.ok_or(ApiError::NotFound)?;
            info!("Task deleted: {}", task.id);
            Ok(HttpResponse::Ok().json(task))
        }
        None => {
            let removed = data.store.delete_completed_tasks().await?;
            info!("Removed {} completed tasks", removed.len());
            Ok(HttpResponse::Ok().json(DeleteCompletedResponse {
                message: "All completed tasks removed".to_string(),
                count: removed.len(),
            }))
        }
    }
}

pub async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::MethodNotAllowed(req.method().to_string()))
}

/// Reads the leading integer of a query value, ignoring anything after it,
/// so `"12abc"` is task 12 while `"abc"` is no id at all.
fn parse_task_id(raw: &str) -> Option<i64> {
    TASK_ID_PREFIX
        .captures(raw)
        .and_then(|caps| caps[1].parse().ok())
}

fn due_date_from(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    match raw {
        None | Some("") => Ok(None),
        Some(raw) => parse_due_date(raw)
            .map(Some)
            .ok_or(ApiError::Validation("Invalid due date")),
    }
}

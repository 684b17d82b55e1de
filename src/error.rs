// src/error.rs

use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::task_api::ALLOWED_METHODS;

/// Failures raised by the data access layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unsupported database url scheme: {0}")]
    UnsupportedUrl(String),
    #[error("failed to connect to the database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("failed to create the tasks schema: {0}")]
    Migrate(#[source] sqlx::Error),
    #[error("failed to {operation}: {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    pub(crate) fn query(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| StoreError::Query { operation, source }
    }
}

/// Everything a task endpoint can answer with besides success.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("Task not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Method {0} Not Allowed")]
    MethodNotAllowed(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(message) => {
                HttpResponse::BadRequest().json(json!({ "error": message }))
            }
            ApiError::NotFound => HttpResponse::NotFound().json(json!({ "error": "Task not found" })),
            ApiError::Store(e) => {
                error!("API error: {}", e);
                HttpResponse::InternalServerError().json(json!({ "error": "Internal server error" }))
            }
            ApiError::MethodNotAllowed(_) => HttpResponse::MethodNotAllowed()
                .insert_header((header::ALLOW, ALLOWED_METHODS))
                .body(self.to_string()),
        }
    }
}

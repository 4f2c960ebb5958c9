use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use items_store::StoreError;
use items_types::{ItemId, TypeError};

/// One shape-validation failure, located the way clients expect:
/// `["body", "name"]`, `["path", "item_id"]`, `["query"]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldIssue {
    pub fn new<I, S>(loc: I, msg: impl Into<String>, kind: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            loc: loc.into_iter().map(Into::into).collect(),
            msg: msg.into(),
            kind: kind.into(),
        }
    }
}

/// Body of a 422 response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationBody {
    pub detail: Vec<FieldIssue>,
}

/// Body of every business-fault response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub custom: bool,
}

#[derive(Debug, Error)]
pub enum ServerError {
    /// Path, query, or body failed its declared shape. Rendered as 422.
    #[error("request validation failed")]
    Validation(Vec<FieldIssue>),

    #[error("Item not found")]
    ItemNotFound(ItemId),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Not Found")]
    RouteNotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn validation(issue: FieldIssue) -> Self {
        Self::Validation(vec![issue])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ItemNotFound(_) | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::UnknownAction(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Store(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::ItemNotFound(id),
            other => Self::Store(other),
        }
    }
}

impl From<TypeError> for ServerError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::UnknownAction(raw) => Self::UnknownAction(raw),
            TypeError::EmptyField(field) => Self::validation(FieldIssue::new(
                ["body", field],
                "String should have at least 1 character",
                "string_too_short",
            )),
            // Only path ids carry a lower bound.
            TypeError::OutOfRange { min, .. } => Self::validation(FieldIssue::new(
                ["path", "item_id"],
                format!("Input should be greater than or equal to {min}"),
                "greater_than_equal",
            )),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::Validation(detail) => (status, Json(ValidationBody { detail })).into_response(),
            fault => {
                if status.is_server_error() {
                    tracing::error!(error = %fault, "request failed");
                }
                let body = ErrorBody {
                    message: fault.to_string(),
                    custom: true,
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

//! HTTP mapping for [`Error`] and extractors that report bad bodies, paths and query
//! strings in the same `{code, message}` shape as every other failure.

use crate::errors::Error;
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl Error {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidAmount { .. } | Self::CategoryInvalid { .. } | Self::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::EditTooSoon => StatusCode::FORBIDDEN,
            Self::RecordNotFound { .. } | Self::NotConfigured { .. } => StatusCode::NOT_FOUND,
            Self::DuplicateCategory { .. } | Self::UserExists => StatusCode::CONFLICT,
            Self::Config { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::EnvVar(_)
            | Self::PasswordHash(_)
            | Self::Token(_)
            | Self::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!("Request failed: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation {
            message: rejection.body_text(),
        }
    }
}

/// `Json` whose rejection is an [`Error`].
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation {
            message: rejection.body_text(),
        }
    }
}

/// `Path` whose rejection is an [`Error`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation {
            message: rejection.body_text(),
        }
    }
}

/// `Query` whose rejection is an [`Error`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);

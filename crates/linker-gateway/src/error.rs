use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use linker_core::{ErrorClass, LinkerError, MessageCatalog};
use thiserror::Error;

use crate::model::ErrorBody;

pub type Result<T> = std::result::Result<T, GatewayError>;

pub const BAD_REQUEST_CODE: &str = "bad_request";

/// An error response: HTTP status plus the `{message, error}` body.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GatewayError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

pub fn status_for(class: ErrorClass) -> StatusCode {
    match class {
        ErrorClass::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorClass::NotFound => StatusCode::NOT_FOUND,
        ErrorClass::AlreadyExists => StatusCode::CONFLICT,
        ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl GatewayError {
    pub fn from_linker(err: &LinkerError, catalog: &MessageCatalog) -> Self {
        let kind = err.kind();
        Self {
            status: status_for(kind.class()),
            code: kind.code(),
            message: catalog.for_error(err).to_owned(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: BAD_REQUEST_CODE,
            message: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for GatewayError {
    fn from(rejection: QueryRejection) -> Self {
        GatewayError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.message,
            error: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_statuses() {
        let catalog = MessageCatalog::api();

        let cases = [
            (LinkerError::InvalidUsername { min: 8 }, StatusCode::BAD_REQUEST),
            (LinkerError::EmptyTopic, StatusCode::BAD_REQUEST),
            (LinkerError::UserNotFound, StatusCode::NOT_FOUND),
            (LinkerError::AliasNotFound, StatusCode::NOT_FOUND),
            (LinkerError::TopicAlreadyExists, StatusCode::CONFLICT),
            (
                LinkerError::Internal("db down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(GatewayError::from_linker(&err, &catalog).status(), status);
        }
    }

    #[test]
    fn body_uses_catalog_message_and_kind_code() {
        let err = GatewayError::from_linker(&LinkerError::TopicNotFound, &MessageCatalog::api());

        assert_eq!(err.to_string(), "unknown topic");
        assert_eq!(err.code, "topic_not_found");
    }
}

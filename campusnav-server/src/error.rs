use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP clients as `{ "error": ... }`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    BadGateway(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<campusnav_core::Error> for ApiError {
    fn from(err: campusnav_core::Error) -> Self {
        use campusnav_core::Error;

        let message = err.to_string();
        match err {
            Error::InvalidData(_) => ApiError::BadRequest(message),
            Error::DestinationNotFound | Error::UnknownNode(_) => ApiError::NotFound(message),
            Error::NoStartNode | Error::NoPath { .. } => ApiError::Unprocessable(message),
            Error::IoError(_) | Error::JsonError(_) => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(%status, error = %self, "request failed");
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_failures_map_to_distinct_statuses() {
        let cases = [
            (campusnav_core::Error::InvalidData("x".into()), 400),
            (campusnav_core::Error::DestinationNotFound, 404),
            (campusnav_core::Error::NoStartNode, 422),
            (
                campusnav_core::Error::NoPath {
                    from: "a".into(),
                    to: "b".into(),
                },
                422,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status().as_u16(), status);
        }
    }
}

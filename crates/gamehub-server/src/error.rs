use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gamehub_core::Error;
use gamehub_storage::StorageError;
use tracing::error;

pub(crate) const DATABASE_ERROR: &str = "Database error";

/// Handler error: one fixed status and a plain-text message per kind
#[derive(Debug)]
pub struct AppError(pub Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), self.0.to_string()).into_response()
    }
}

/// Collapse any store failure into the generic internal error
pub(crate) fn store_error(err: StorageError) -> Error {
    error!(error = %err, "catalog store failure");
    Error::internal(DATABASE_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::bad_request("Unable to parse form"), StatusCode::BAD_REQUEST),
            (Error::not_found("Game not found"), StatusCode::NOT_FOUND),
            (Error::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED),
            (Error::internal(DATABASE_ERROR), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError(err).into_response().status(), status);
        }
    }
}

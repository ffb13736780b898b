use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    BadRequest(String),
    Unauthorized(String),
    Forbidden,
    InternalServerError(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::Forbidden => write!(f, "Forbidden"),
            Self::InternalServerError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Storage(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Storage(e) if e.is_duplicate() => StatusCode::CONFLICT,
            Self::Storage(StorageError::InvalidInput(_) | StorageError::Import { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = match &self {
            Self::Storage(e) if status_code != StatusCode::INTERNAL_SERVER_ERROR => {
                json!({
                    "error": e.to_string()
                })
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::BadRequest(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::Unauthorized(_) => {
                json!({
                    "error": "Unauthorized"
                })
            }
            Self::Forbidden => {
                json!({
                    "error": "Forbidden"
                })
            }
            Self::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                json!({
                    "error": "An internal error occurred"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;
    use storage::error::Resource;

    #[test]
    fn storage_errors_map_to_client_statuses() {
        let cases = [
            (
                WebError::from(StorageError::NotFound(Resource::Run)),
                StatusCode::NOT_FOUND,
            ),
            (
                WebError::from(StorageError::ParticipantNotFoundForRun {
                    competition_id: 1,
                    dossard: 2,
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                WebError::from(StorageError::DuplicateRun {
                    dossard: 1,
                    run_number: 1,
                }),
                StatusCode::CONFLICT,
            ),
            (
                WebError::from(StorageError::Import {
                    row: 3,
                    reason: "bad".into(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                WebError::from(StorageError::Workbook("io".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (WebError::Forbidden, StatusCode::FORBIDDEN),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected, "{error}");
        }
    }
}

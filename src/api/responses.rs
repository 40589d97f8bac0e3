/*!
 * Error bodies of the HTTP boundary.
 *
 * Validation problems become a 422 with one entry per violated constraint.
 * Dependency failures become a 503 or 500 with a fixed message; provider
 * details stay in the logs.
 */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::errors::{StoreError, TranslationError};
use crate::translation::{FieldError, FieldErrorKind};

/// One entry of a 422 `detail` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetail {
    /// Location of the offending value, e.g. `["query", "text"]`
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: FieldErrorKind,
}

impl From<&FieldError> for ValidationDetail {
    fn from(error: &FieldError) -> Self {
        Self {
            loc: vec!["query".to_string(), error.field.clone()],
            msg: error.message.clone(),
            kind: error.kind,
        }
    }
}

/// Errors returned by API handlers
#[derive(Debug)]
pub enum ApiError {
    /// The request violated one or more constraints
    Validation(Vec<FieldError>),
    /// The translation service failed
    Translation(TranslationError),
    /// The cache store could not answer
    Store(StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Translation(error) => match error {
                TranslationError::InvalidInput(_) | TranslationError::InvalidLanguage(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                TranslationError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                TranslationError::TranslationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<TranslationError> for ApiError {
    fn from(error: TranslationError) -> Self {
        Self::Translation(error)
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        Self::Store(error)
    }
}

fn validation_body(problems: &[FieldError]) -> serde_json::Value {
    let detail: Vec<ValidationDetail> = problems.iter().map(ValidationDetail::from).collect();
    json!({ "detail": detail })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            Self::Validation(problems) => validation_body(problems),
            Self::Translation(TranslationError::InvalidInput(message)) => validation_body(&[FieldError::new(
                "text",
                message.clone(),
                FieldErrorKind::InvalidInput,
            )]),
            Self::Translation(TranslationError::InvalidLanguage(code)) => validation_body(&[FieldError::new(
                "target_lang",
                format!("Unsupported target language: '{}'", code),
                FieldErrorKind::InvalidLanguage,
            )]),
            Self::Translation(TranslationError::ServiceUnavailable(_)) => {
                json!({ "detail": "Translation service is temporarily unavailable" })
            }
            Self::Translation(TranslationError::TranslationFailed(_)) => {
                json!({ "detail": "Translation failed" })
            }
            Self::Store(_) => json!({ "detail": "Cache store is unavailable" }),
        };

        (status, Json(body)).into_response()
    }
}

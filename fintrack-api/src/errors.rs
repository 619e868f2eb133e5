use actix_web::HttpResponse;
use fintrack_ai::ExtractionError;
use fintrack_extractors::{NormalizeError, ResponseParseError, StatementError};
use fintrack_types::ErrorResponse;

/// Request-boundary error taxonomy. Every pipeline stage failure is
/// mapped into one of these before it reaches the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("AI parsing failed: {message}")]
    ParseFailure { message: String, raw: String },

    #[error("AI service is overloaded: {detail}")]
    ServiceExhausted { detail: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl actix_web::error::ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(msg) => HttpResponse::BadRequest().json(ErrorResponse {
                message: msg.clone(),
                error: None,
            }),
            ApiError::Unauthorized(msg) => HttpResponse::Unauthorized().json(ErrorResponse {
                message: msg.clone(),
                error: None,
            }),
            ApiError::NotFound(msg) => HttpResponse::NotFound().json(ErrorResponse {
                message: msg.clone(),
                error: None,
            }),
            ApiError::ParseFailure { message, raw } => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "message": "AI parsing failed",
                    "error": message,
                    "ai_response": raw,
                }))
            }
            ApiError::ServiceExhausted { detail } => {
                HttpResponse::ServiceUnavailable().json(ErrorResponse {
                    message: "AI service is overloaded. Please try again later.".to_string(),
                    error: Some(detail.clone()),
                })
            }
            ApiError::Internal(err) => {
                tracing::error!("Unexpected error: {:#}", err);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    message: "Server error".to_string(),
                    error: Some(err.to_string()),
                })
            }
        }
    }
}

impl From<StatementError> for ApiError {
    fn from(err: StatementError) -> Self {
        match err {
            StatementError::UnsupportedFormat(_) => ApiError::Validation(err.to_string()),
            // unreadable or corrupt uploads are fatal, never retried
            other => ApiError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::ServiceExhausted { detail, .. } => {
                ApiError::ServiceExhausted { detail }
            }
        }
    }
}

impl From<ResponseParseError> for ApiError {
    fn from(err: ResponseParseError) -> Self {
        let raw = err.raw_response().to_string();
        ApiError::ParseFailure {
            message: err.to_string(),
            raw,
        }
    }
}

impl From<NormalizeError> for ApiError {
    fn from(err: NormalizeError) -> Self {
        // uncoercible AI output fails the whole request as unexpected
        ApiError::Internal(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::error::ResponseError;
    use actix_web::http::StatusCode;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        let cases = [
            (
                ApiError::Validation("missing file".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Unauthorized("Invalid token.".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::NotFound("Transaction not found".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::ParseFailure {
                    message: "no block".to_string(),
                    raw: "freeform".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::ServiceExhausted {
                    detail: "503".to_string(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.error_response().status(), expected);
        }
    }

    #[test]
    fn parse_failure_reports_raw_model_text() {
        let err: ApiError = ResponseParseError::MissingBlock {
            raw: "no transactions here".to_string(),
        }
        .into();

        match err {
            ApiError::ParseFailure { raw, .. } => assert_eq!(raw, "no transactions here"),
            other => panic!("expected ParseFailure, got {other:?}"),
        }
    }

    #[test]
    fn exhausted_extraction_becomes_service_unavailable() {
        let err: ApiError = ExtractionError::ServiceExhausted {
            attempts: 3,
            detail: "connection refused".to_string(),
        }
        .into();

        match err {
            ApiError::ServiceExhausted { detail } => assert_eq!(detail, "connection refused"),
            other => panic!("expected ServiceExhausted, got {other:?}"),
        }
    }
}

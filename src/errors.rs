use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Merge incomplete")]
    MergeIncomplete {
        merged_id: Uuid,
        source_ids: Vec<Uuid>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn confirmation_required() -> Self {
        AppError::Conflict("add ?confirm=true to perform this deletion".to_string())
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::Precondition(msg) => AppError::Conflict(msg),
            DomainError::NotFound(what) => AppError::NotFound(what),
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Remote(msg) => AppError::Internal(msg),
            DomainError::MergeIncomplete {
                merged_id,
                source_ids,
            } => AppError::MergeIncomplete {
                merged_id,
                source_ids,
            },
        }
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::MergeIncomplete { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            // Remote failure details stay in the log.
            AppError::Internal(msg) => {
                log::error!("Request failed: {}", msg);
                serde_json::json!({ "error": "Internal server error" })
            }
            AppError::MergeIncomplete {
                merged_id,
                source_ids,
            } => serde_json::json!({
                "error": self.to_string(),
                "merged_id": merged_id,
                "source_ids": source_ids,
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

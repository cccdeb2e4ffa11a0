use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, RecommenderError>;

/// Every public pipeline operation fails in exactly one of two ways: the
/// caller sent something invalid, or the system itself broke. Integration
/// and initialization failures are folded into the second kind at the
/// pipeline boundary so callers never see raw client errors.
#[derive(Error, Debug)]
pub enum RecommenderError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Recommendation failed: {0}")]
    Internal(String),
}

impl RecommenderError {
    /// Boundary rule applied where the pipeline returns: validation faults
    /// pass through untouched, everything else is logged with its full
    /// error chain and wrapped.
    pub fn from_pipeline(err: anyhow::Error) -> Self {
        match err.downcast::<RecommenderError>() {
            Ok(fault) => fault,
            Err(err) => {
                error!("recommendation pipeline failed: {err:#}");
                RecommenderError::Internal(err.to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for RecommenderError {
    fn error_response(&self) -> HttpResponse {
        match self {
            // Validation messages name the violated constraint so the
            // caller can correct the input.
            RecommenderError::InvalidInput(_) => HttpResponse::BadRequest().json(ErrorResponse {
                error: self.to_string(),
            }),
            // System faults stay generic here; the detail went to the log.
            RecommenderError::Internal(_) => {
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Internal server error".to_string(),
                })
            }
        }
    }
}

impl From<std::io::Error> for RecommenderError {
    fn from(err: std::io::Error) -> Self {
        RecommenderError::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for RecommenderError {
    fn from(err: anyhow::Error) -> Self {
        RecommenderError::from_pipeline(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn validation_faults_pass_through_the_boundary_verbatim() {
        let fault = RecommenderError::InvalidInput("Query too short".into());
        let wrapped = RecommenderError::from_pipeline(anyhow::Error::new(fault));

        match wrapped {
            RecommenderError::InvalidInput(msg) => assert_eq!(msg, "Query too short"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn unexpected_errors_are_wrapped_as_internal() {
        let wrapped = RecommenderError::from_pipeline(anyhow!("connection refused"));

        match wrapped {
            RecommenderError::Internal(msg) => assert!(msg.contains("connection refused")),
            other => panic!("expected Internal, got {other:?}"),
        }
    }

    #[test]
    fn internal_faults_survive_the_boundary_unchanged() {
        let fault = RecommenderError::Internal("catalog gone".into());
        let wrapped = RecommenderError::from_pipeline(anyhow::Error::new(fault));

        match wrapped {
            RecommenderError::Internal(msg) => assert_eq!(msg, "catalog gone"),
            other => panic!("expected Internal, got {other:?}"),
        }
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(anyhow::Error),

    /// Upstream dependency failed. Carries the status reported by the upstream
    /// when it sent one, otherwise 503.
    #[error("Upstream unavailable: {1}")]
    UpstreamUnavailable(StatusCode, String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::UpstreamUnavailable(status, _) => *status,
            AppError::InternalError(_) | AppError::DatabaseError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

/// One rejected input field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Flattens nested validator errors into `parent.child` / `list[2]` paths.
pub fn field_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    collect_violations(errors, None, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect_violations(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(p) => format!("{}.{}", p, field),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for err in errs {
                    out.push(FieldViolation {
                        field: path.clone(),
                        code: err.code.to_string(),
                        message: err
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", path)),
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_violations(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    let item_path = format!("{}[{}]", path, index);
                    collect_violations(inner, Some(&item_path), out);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            violations: Vec<FieldViolation>,
        }

        let status = self.status();
        let (error_message, details, violations) = match self {
            AppError::ValidationError(err) => (
                "Validation error".to_string(),
                None,
                field_violations(&err),
            ),
            AppError::BadRequest(err) => (err.to_string(), None, Vec::new()),
            AppError::NotFound(err) => (err.to_string(), None, Vec::new()),
            AppError::Unauthorized(err) => (err.to_string(), None, Vec::new()),
            AppError::UpstreamUnavailable(_, detail) => (detail, None, Vec::new()),
            AppError::InternalError(err) => {
                tracing::error!(error = ?err, "Internal server error");
                ("Internal server error".to_string(), None, Vec::new())
            }
            AppError::DatabaseError(err) => {
                tracing::error!(error = %err, "Database error");
                ("Database error".to_string(), Some(err.to_string()), Vec::new())
            }
            AppError::ConfigError(err) => (
                "Configuration error".to_string(),
                Some(err.to_string()),
                Vec::new(),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
                details,
                violations,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn upstream_status_is_forwarded() {
        let err = AppError::UpstreamUnavailable(StatusCode::TOO_MANY_REQUESTS, "slow down".into());
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.into_response().status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn validation_errors_become_field_violations() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "latitude",
            ValidationError::new("range").with_message("latitude must be between -90 and 90".into()),
        );
        errors.add("name", ValidationError::new("length"));

        let violations = field_violations(&errors);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, "latitude");
        assert_eq!(violations[0].code, "range");
        assert_eq!(violations[0].message, "latitude must be between -90 and 90");
        assert_eq!(violations[1].field, "name");
        assert_eq!(violations[1].message, "name is invalid");
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let err = AppError::Unauthorized(anyhow::anyhow!("Invalid token"));
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}

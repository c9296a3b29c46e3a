use axum::http::StatusCode;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Game with BGG ID {0} not found")]
    NotFound(i64),

    /// Transport or parse failure talking to BoardGameGeek. `status` is set only
    /// when the upstream answered with an HTTP error status of its own.
    #[error("{detail}")]
    Upstream {
        status: Option<StatusCode>,
        detail: String,
        #[source]
        source: anyhow::Error,
    },
}

impl CatalogError {
    pub fn upstream(detail: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        let source = source.into();
        let status = source
            .downcast_ref::<reqwest::Error>()
            .and_then(|e| e.status());
        CatalogError::Upstream {
            status,
            detail: detail.into(),
            source,
        }
    }

    /// Status the failure should surface with.
    pub fn status(&self) -> StatusCode {
        match self {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Upstream { status, .. } => {
                status.unwrap_or(StatusCode::SERVICE_UNAVAILABLE)
            }
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => {
                AppError::NotFound(anyhow::anyhow!("Game with BGG ID {} not found", id))
            }
            err @ CatalogError::Upstream { .. } => {
                AppError::UpstreamUnavailable(err.status(), err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_failures_default_to_503() {
        let err = CatalogError::upstream("bad xml", anyhow::anyhow!("unexpected end of stream"));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);

        let app: AppError = err.into();
        assert_eq!(app.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn not_found_maps_to_404() {
        let app: AppError = CatalogError::NotFound(99999).into();
        assert_eq!(app.status(), StatusCode::NOT_FOUND);
        assert!(app.to_string().contains("99999"));
    }
}

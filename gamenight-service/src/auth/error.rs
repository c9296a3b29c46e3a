use service_core::error::AppError;
use thiserror::Error;

/// Reasons a caller is not authenticated.
///
/// The message of each variant is what the caller sees in the 401 body.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No authorization header")]
    NoAuthorizationHeader,

    #[error("No token provided")]
    NoTokenProvided,

    #[error("Missing credential")]
    MissingCredential,

    #[error("Invalid credential")]
    InvalidCredential,

    #[error("Invalid token")]
    InvalidToken,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Unauthorized(anyhow::anyhow!(err.to_string()))
    }
}

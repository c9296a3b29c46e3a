use crate::auth::{AuthError, AuthUser, Identity};
use crate::dtos::VerifyTokenRequest;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// Exchanges an identity-provider token for the identity it vouches for.
pub async fn verify_token(
    State(state): State<AppState>,
    Json(req): Json<VerifyTokenRequest>,
) -> Result<Json<Identity>, AppError> {
    let token = req.token.unwrap_or_default();

    let identity = state
        .gate
        .verifier()
        .verify(&token)
        .await
        .map_err(|e| match e {
            AuthError::MissingCredential => AuthError::NoTokenProvided,
            _ => AuthError::InvalidToken,
        })?;

    Ok(Json(identity))
}

pub async fn me(AuthUser(identity): AuthUser) -> Json<Identity> {
    Json(identity)
}

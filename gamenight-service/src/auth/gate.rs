use super::{AuthError, Identity, TokenVerifier};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// Returns whatever follows the exact `"Bearer "` prefix.
///
/// The scheme match is case-sensitive with a single space. `"Bearer "` yields
/// `Some("")`; deciding that an empty token is unusable is left to the caller.
pub fn extract_bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix(BEARER_PREFIX)
}

/// Guards protected routes by verifying the request's bearer token.
#[derive(Clone)]
pub struct AuthGate {
    verifier: TokenVerifier,
}

impl AuthGate {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Resolves the caller's identity from request headers.
    ///
    /// Verifier failures all surface as [`AuthError::InvalidToken`], whatever
    /// the verifier's own reason was.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let raw = headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::NoAuthorizationHeader)?;

        let token = raw
            .to_str()
            .ok()
            .and_then(extract_bearer_token)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::NoTokenProvided)?;

        self.verifier.verify(token).await.map_err(|e| {
            tracing::debug!(reason = %e, "Bearer token rejected");
            AuthError::InvalidToken
        })
    }
}

/// Rejects the request with 401 unless it carries a verifiable bearer token.
/// On success the [`Identity`] is stored in the request extensions.
pub async fn auth_middleware(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = gate.authenticate(req.headers()).await?;

    tracing::Span::current().record("user_id", identity.subject_id.as_str());
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Extractor for the identity attached by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts.extensions.get::<Identity>().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Identity missing from request extensions"
            ))
        })?;

        Ok(AuthUser(identity.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token_after_scheme() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
    }

    #[test]
    fn other_schemes_yield_nothing() {
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token("bearer abc123"), None);
        assert_eq!(extract_bearer_token("Bearer"), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[test]
    fn bare_scheme_yields_empty_token() {
        assert_eq!(extract_bearer_token("Bearer "), Some(""));
    }

    #[test]
    fn only_first_space_is_consumed() {
        assert_eq!(extract_bearer_token("Bearer  abc"), Some(" abc"));
    }
}

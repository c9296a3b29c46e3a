use super::{AuthError, Identity};
use async_trait::async_trait;
use std::sync::Arc;

/// Claims an identity provider vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderClaims {
    pub subject_id: String,
    pub email: Option<String>,
}

/// External collaborator that validates a credential and decodes its claims.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_credential(&self, credential: &str) -> Result<ProviderClaims, anyhow::Error>;
}

/// Turns an opaque bearer credential into an [`Identity`].
///
/// Provider failures are collapsed into [`AuthError::InvalidCredential`]; the
/// underlying error is logged and never returned to the caller. No retries.
#[derive(Clone)]
pub struct TokenVerifier {
    provider: Arc<dyn IdentityProvider>,
}

impl TokenVerifier {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub async fn verify(&self, credential: &str) -> Result<Identity, AuthError> {
        if credential.trim().is_empty() {
            return Err(AuthError::MissingCredential);
        }

        let claims = self
            .provider
            .verify_credential(credential)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Identity provider rejected credential");
                AuthError::InvalidCredential
            })?;

        Ok(Identity {
            subject_id: claims.subject_id,
            email: claims.email.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        email: Option<String>,
    }

    #[async_trait]
    impl IdentityProvider for CountingProvider {
        async fn verify_credential(&self, credential: &str) -> Result<ProviderClaims, anyhow::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if credential == "good" {
                Ok(ProviderClaims {
                    subject_id: "user-1".to_string(),
                    email: self.email.clone(),
                })
            } else {
                Err(anyhow::anyhow!("signature mismatch for {}", credential))
            }
        }
    }

    fn verifier(email: Option<&str>) -> (TokenVerifier, Arc<CountingProvider>) {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            email: email.map(str::to_string),
        });
        (TokenVerifier::new(provider.clone()), provider)
    }

    #[tokio::test]
    async fn blank_credential_is_rejected_without_calling_provider() {
        let (verifier, provider) = verifier(None);

        for credential in ["", "   ", "\t\n"] {
            assert_eq!(
                verifier.verify(credential).await,
                Err(AuthError::MissingCredential)
            );
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_error_is_not_leaked() {
        let (verifier, provider) = verifier(None);

        let err = verifier.verify("forged").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredential);
        assert!(!err.to_string().contains("signature mismatch"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn email_defaults_to_empty() {
        let (verifier, _) = verifier(None);
        let identity = verifier.verify("good").await.unwrap();
        assert_eq!(identity.subject_id, "user-1");
        assert_eq!(identity.email, "");
    }

    #[tokio::test]
    async fn email_is_passed_through() {
        let (verifier, _) = verifier(Some("player@example.com"));
        let identity = verifier.verify("good").await.unwrap();
        assert_eq!(identity.email, "player@example.com");
    }
}

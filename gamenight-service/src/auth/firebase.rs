//! Firebase ID-token verification.
//!
//! Tokens are RS256 JWTs signed by one of Google's rotating `securetoken` keys.
//! The published JWK set is kept in memory and refetched when a token names a
//! key id we have not seen yet. Refetches are serialized and at most one
//! happens per refresh cooldown, however many unknown key ids arrive.

use super::verifier::{IdentityProvider, ProviderClaims};
use crate::config::FirebaseConfig;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

const ISSUER_PREFIX: &str = "https://securetoken.google.com/";
pub const DEFAULT_REFRESH_COOLDOWN: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    email: Option<String>,
}

#[derive(Clone)]
pub struct FirebaseIdentityProvider {
    client: Client,
    project_id: String,
    jwks_url: String,
    keys: Arc<RwLock<Option<JwkSet>>>,
    /// Time of the last fetch attempt. Held for the whole refresh.
    last_refresh: Arc<Mutex<Option<Instant>>>,
    refresh_cooldown: Duration,
}

impl FirebaseIdentityProvider {
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            client: Client::new(),
            project_id: config.project_id.clone(),
            jwks_url: config.jwks_url.clone(),
            keys: Arc::new(RwLock::new(None)),
            last_refresh: Arc::new(Mutex::new(None)),
            refresh_cooldown: DEFAULT_REFRESH_COOLDOWN,
        }
    }

    /// Minimum gap between two key set fetches triggered by unknown key ids.
    pub fn with_refresh_cooldown(mut self, cooldown: Duration) -> Self {
        self.refresh_cooldown = cooldown;
        self
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.project_id.as_str()]);
        validation.set_issuer(&[format!("{}{}", ISSUER_PREFIX, self.project_id)]);
        validation
    }

    async fn refresh_keys(&self) -> Result<(), anyhow::Error> {
        tracing::debug!(url = %self.jwks_url, "Fetching identity provider signing keys");

        let keys: JwkSet = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .context("signing key request failed")?
            .error_for_status()
            .context("signing key endpoint returned an error")?
            .json()
            .await
            .context("signing key response is not a JWK set")?;

        tracing::info!(count = keys.keys.len(), "Identity provider signing keys loaded");
        *self.keys.write().await = Some(keys);
        Ok(())
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, anyhow::Error> {
        if let Some(key) = self.cached_key(kid).await? {
            return Ok(key);
        }

        let mut last = self.last_refresh.lock().await;

        // Someone else may have refreshed while we queued.
        if let Some(key) = self.cached_key(kid).await? {
            return Ok(key);
        }

        if let Some(previous) = *last {
            if previous.elapsed() < self.refresh_cooldown {
                tracing::debug!(kid, "Unknown signing key id, refresh on cooldown");
                return Err(anyhow!("no signing key with id {}", kid));
            }
        }

        // Failed attempts also start the cooldown.
        *last = Some(Instant::now());
        self.refresh_keys().await?;

        self.cached_key(kid)
            .await?
            .ok_or_else(|| anyhow!("no signing key with id {}", kid))
    }

    async fn cached_key(&self, kid: &str) -> Result<Option<DecodingKey>, anyhow::Error> {
        let guard = self.keys.read().await;
        match guard.as_ref().and_then(|set| set.find(kid)) {
            Some(jwk) => Ok(Some(DecodingKey::from_jwk(jwk)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn verify_credential(&self, credential: &str) -> Result<ProviderClaims, anyhow::Error> {
        let header = decode_header(credential).context("malformed token header")?;
        if header.alg != Algorithm::RS256 {
            return Err(anyhow!("unexpected signing algorithm {:?}", header.alg));
        }
        let kid = header.kid.ok_or_else(|| anyhow!("token header has no key id"))?;

        let key = self.decoding_key(&kid).await?;
        let data = decode::<FirebaseClaims>(credential, &key, &self.validation())
            .context("token signature or claims rejected")?;

        if data.claims.sub.is_empty() {
            return Err(anyhow!("token has an empty subject"));
        }

        Ok(ProviderClaims {
            subject_id: data.claims.sub,
            email: data.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> FirebaseIdentityProvider {
        FirebaseIdentityProvider::new(&FirebaseConfig {
            project_id: "gamenight-test".to_string(),
            // Unroutable on purpose: these tests must fail before any fetch.
            jwks_url: "http://127.0.0.1:9/jwks".to_string(),
        })
    }

    #[tokio::test]
    async fn rejects_garbage() {
        assert!(provider().verify_credential("not-a-jwt").await.is_err());
    }

    #[tokio::test]
    async fn rejects_hs256_tokens() {
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(Algorithm::HS256),
            &serde_json::json!({ "sub": "user-1", "aud": "gamenight-test" }),
            &jsonwebtoken::EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        let err = provider().verify_credential(&token).await.unwrap_err();
        assert!(err.to_string().contains("unexpected signing algorithm"));
    }

    #[test]
    fn issuer_is_bound_to_project() {
        let validation = provider().validation();
        let issuers = validation.iss.unwrap();
        assert!(issuers.contains("https://securetoken.google.com/gamenight-test"));
    }
}

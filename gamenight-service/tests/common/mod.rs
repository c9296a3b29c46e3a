#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use gamenight_service::auth::{AuthGate, IdentityProvider, ProviderClaims, TokenVerifier};
use gamenight_service::catalog::{BggClient, RankIndex};
use gamenight_service::config::{
    CatalogConfig, Environment, FirebaseConfig, GameNightConfig, MongoConfig, RankIndexConfig,
    SecurityConfig,
};
use gamenight_service::services::MongoDb;
use gamenight_service::{build_router, AppState};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const VALID_TOKEN: &str = "valid-firebase-token";
pub const TEST_USER_ID: &str = "test-user-123";
pub const TEST_EMAIL: &str = "test@example.com";
pub const MONGODB_URI: &str = "mongodb://localhost:27017";

/// Accepts exactly [`VALID_TOKEN`].
pub struct FakeProvider;

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn verify_credential(&self, credential: &str) -> Result<ProviderClaims, anyhow::Error> {
        if credential == VALID_TOKEN {
            Ok(ProviderClaims {
                subject_id: TEST_USER_ID.to_string(),
                email: Some(TEST_EMAIL.to_string()),
            })
        } else {
            Err(anyhow::anyhow!("token rejected by fake provider"))
        }
    }
}

pub fn fake_gate() -> AuthGate {
    AuthGate::new(TokenVerifier::new(Arc::new(FakeProvider)))
}

pub fn test_config(bgg_base_url: &str, min_interval_ms: u64) -> GameNightConfig {
    GameNightConfig {
        common: CoreConfig { port: 0 },
        environment: Environment::Dev,
        service_name: "gamenight-service-test".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        mongodb: MongoConfig {
            uri: MONGODB_URI.to_string(),
            database: format!("gamenight_test_{}", Uuid::new_v4().simple()),
        },
        firebase: FirebaseConfig {
            project_id: "gamenight-test".to_string(),
            jwks_url: "http://127.0.0.1:9/jwks".to_string(),
        },
        catalog: CatalogConfig {
            base_url: bgg_base_url.to_string(),
            min_interval_ms,
            api_token: None,
        },
        rank_index: RankIndexConfig {
            candidate_paths: vec![],
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:4200".to_string()],
        },
    }
}

/// Router over the real handlers with a fake identity provider.
///
/// The MongoDB client is created lazily, so routes that never touch the
/// database work without a server.
pub async fn test_router(config: GameNightConfig, ranks: RankIndex) -> (Router, MongoDb) {
    let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
        .await
        .expect("Failed to create MongoDB client");
    let catalog = BggClient::new(&config.catalog);
    let state = AppState::new(config, db.clone(), fake_gate(), catalog, Arc::new(ranks));
    (build_router(state), db)
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn drop_database(db: &MongoDb) {
    db.database().drop(None).await.ok();
}

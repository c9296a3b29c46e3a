use crate::auth::{auth_middleware, AuthGate, FirebaseIdentityProvider, TokenVerifier};
use crate::catalog::{BggClient, RankIndex};
use crate::config::GameNightConfig;
use crate::handlers::{auth, events, games, health, locations};
use crate::services::{EventRepository, GameRepository, LocationRepository, MongoDb};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::{make_request_span, request_id_middleware, REQUEST_ID_HEADER},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Everything handlers need, composed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: GameNightConfig,
    pub db: MongoDb,
    pub gate: AuthGate,
    pub catalog: BggClient,
    pub ranks: Arc<RankIndex>,
    pub games: GameRepository,
    pub locations: LocationRepository,
    pub events: EventRepository,
}

impl AppState {
    /// Wires repositories over `db` around the given collaborators.
    pub fn new(
        config: GameNightConfig,
        db: MongoDb,
        gate: AuthGate,
        catalog: BggClient,
        ranks: Arc<RankIndex>,
    ) -> Self {
        Self {
            games: GameRepository::new(&db),
            locations: LocationRepository::new(&db),
            events: EventRepository::new(&db),
            config,
            db,
            gate,
            catalog,
            ranks,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/games", get(games::list_games))
        .route("/games/stats", get(games::collection_stats))
        .route("/games/search", get(games::search_ranks))
        .route("/games/ranks/:id", get(games::get_rank))
        .route("/games/bgg/search", get(games::search_bgg))
        .route("/games/bgg/game/:bgg_id", get(games::bgg_details))
        .route("/games/import/:bgg_id", post(games::import_game))
        .route(
            "/games/:id",
            get(games::get_game)
                .patch(games::update_game)
                .delete(games::delete_game),
        )
        .route(
            "/locations",
            get(locations::list_locations).post(locations::create_location),
        )
        .route("/locations/bounds", get(locations::locations_in_bounds))
        .route(
            "/locations/:id",
            get(locations::get_location)
                .patch(locations::update_location)
                .delete(locations::delete_location),
        )
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route_layer(from_fn_with_state(state.gate.clone(), auth_middleware));

    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics_endpoint))
        .route("/auth/verify", post(auth::verify_token));

    let cors = cors_layer(&state.config.security.allowed_origins);

    public
        .merge(protected)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<axum::body::Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    state: AppState,
}

impl Application {
    pub async fn build(config: GameNightConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database).await?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let provider = Arc::new(FirebaseIdentityProvider::new(&config.firebase));
        let gate = AuthGate::new(TokenVerifier::new(provider));

        let catalog = BggClient::new(&config.catalog);
        tracing::info!(
            base_url = %config.catalog.base_url,
            min_interval_ms = config.catalog.min_interval_ms,
            "BGG client initialized"
        );

        let ranks = Arc::new(RankIndex::load(&config.rank_index.candidate_paths));

        let state = AppState::new(config.clone(), db, gate, catalog, ranks);
        let router = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &MongoDb {
        &self.state.db
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!(port = self.port, "gamenight-service listening");
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

use secrecy::Secret;
use serde::Deserialize;
use service_core::config::{self as core_config, get_env, get_env_parsed, split_list};
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BGG_API_BASE_URL: &str = "https://boardgamegeek.com/xmlapi2";
pub const DEFAULT_FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
pub const RANK_FILE_NAME: &str = "bgg_ranks_02_26.csv";

#[derive(Debug, Clone, Deserialize)]
pub struct GameNightConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub mongodb: MongoConfig,
    pub firebase: FirebaseConfig,
    pub catalog: CatalogConfig,
    pub rank_index: RankIndexConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Dev),
            "prod" | "production" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub jwks_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub base_url: String,
    /// Minimum gap between two outbound BoardGameGeek requests.
    pub min_interval_ms: u64,
    pub api_token: Option<Secret<String>>,
}

impl CatalogConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankIndexConfig {
    /// Probed in order; the first existing file is loaded.
    pub candidate_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

impl GameNightConfig {
    pub fn load() -> Result<Self, AppError> {
        // Handles .env and the APP__ prefix
        let common = core_config::Config::load()?;

        let environment: Environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "dev".to_string())
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let is_prod = environment == Environment::Prod;

        let rank_paths = match env::var("RANK_INDEX_PATHS") {
            Ok(raw) => split_list(&raw).into_iter().map(PathBuf::from).collect(),
            Err(_) => default_rank_paths(),
        };

        Ok(GameNightConfig {
            common,
            environment,
            service_name: get_env("SERVICE_NAME", Some("gamenight-service"), false)?,
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("gamenight-hub"), is_prod)?,
            },
            firebase: FirebaseConfig {
                project_id: get_env("FIREBASE_PROJECT_ID", Some("gamenight-hub"), is_prod)?,
                jwks_url: get_env("FIREBASE_JWKS_URL", Some(DEFAULT_FIREBASE_JWKS_URL), false)?,
            },
            catalog: CatalogConfig {
                base_url: get_env("BGG_API_BASE_URL", Some(DEFAULT_BGG_API_BASE_URL), false)?,
                min_interval_ms: get_env_parsed("BGG_MIN_INTERVAL_MS", Some("5000"), false)?,
                api_token: env::var("BGG_API_TOKEN")
                    .ok()
                    .filter(|s| !s.is_empty())
                    .map(Secret::new),
            },
            rank_index: RankIndexConfig {
                candidate_paths: rank_paths,
            },
            security: SecurityConfig {
                allowed_origins: split_list(&get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:4200"),
                    is_prod,
                )?),
            },
        })
    }
}

/// Working-directory relative locations first, then the crate's own data dir.
pub fn default_rank_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("data").join(RANK_FILE_NAME),
        PathBuf::from("gamenight-service")
            .join("data")
            .join(RANK_FILE_NAME),
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("data")
            .join(RANK_FILE_NAME),
    ]
}

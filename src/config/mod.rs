use crate::error::{RecError, RecResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub dataset: DatasetConfig,
    pub model: ModelConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub log_level: String,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> RecResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| RecError::Validation(format!("Invalid server address: {}", e)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub path: String,
    pub similarity_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    DecisionTree,
    RandomForest,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::DecisionTree, ModelKind::RandomForest];

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::DecisionTree => "Decision Tree",
            ModelKind::RandomForest => "Random Forest",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub seed: u64,
    pub test_ratio: f64,
    pub n_estimators: usize,
    pub recommendable_threshold: f64,
    pub active: ModelKind,
    pub max_results: usize,
    pub similar_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_seconds: i64,
    pub purge_interval_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                workers: num_cpus::get(),
                log_level: "info".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://instance/users.db".to_string(),
                max_connections: 5,
            },
            dataset: DatasetConfig {
                path: "anime.csv".to_string(),
                similarity_path: "similarity.json".to_string(),
            },
            model: ModelConfig::default(),
            session: SessionConfig {
                cookie_name: "anirec_session".to_string(),
                ttl_seconds: 86_400,
                purge_interval_seconds: 300,
            },
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_ratio: 0.2,
            n_estimators: 100,
            recommendable_threshold: 7.5,
            active: ModelKind::RandomForest,
            max_results: 10,
            similar_count: 5,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> RecResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("ANIREC").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn load(path: &str) -> RecResult<Self> {
        if !Path::new(path).exists() {
            tracing::info!("Config file {} not found, using defaults and environment", path);
        }
        Self::from_file(path)
    }
}

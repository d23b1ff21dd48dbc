pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod web;

pub use config::Config;
pub use error::{Outcome, RecError, RecResult};
pub use models::*;

use services::dataset::AnimeCatalog;
use services::recommendation::RecommendationService;
use services::sessions::SessionManager;
use services::similarity::SimilarityService;
use services::training::TrainingService;
use services::users::{SqliteUserStore, UserService};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Read-only request context, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub recommendation_service: Option<Arc<RecommendationService>>,
    pub similarity_service: Option<Arc<SimilarityService>>,
    pub user_service: Arc<UserService>,
    pub session_manager: Arc<SessionManager>,
}

impl AppState {
    pub async fn new(config: Config) -> RecResult<Self> {
        let config = Arc::new(config);

        let store = SqliteUserStore::connect(&config.database).await?;
        let user_service = Arc::new(UserService::new(Arc::new(store)));

        let engine_config = config.clone();
        let (recommendation_service, similarity_service) =
            tokio::task::spawn_blocking(move || build_recommenders(&engine_config))
                .await
                .map_err(|e| RecError::Internal(e.to_string()))?;

        let state = Self::from_parts(config, recommendation_service, similarity_service, user_service);
        let every = std::time::Duration::from_secs(state.config.session.purge_interval_seconds.max(1));
        state.session_manager.clone().spawn_purge_task(every);
        Ok(state)
    }

    pub fn from_parts(
        config: Arc<Config>,
        recommendation_service: Option<Arc<RecommendationService>>,
        similarity_service: Option<Arc<SimilarityService>>,
        user_service: Arc<UserService>,
    ) -> Self {
        let session_manager = Arc::new(SessionManager::new(config.session.clone()));
        Self {
            config,
            recommendation_service,
            similarity_service,
            user_service,
            session_manager,
        }
    }
}

pub fn build_recommenders(
    config: &Config,
) -> (Option<Arc<RecommendationService>>, Option<Arc<SimilarityService>>) {
    let catalog = match AnimeCatalog::load(&config.dataset.path) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            error!("Error loading dataset, recommendations disabled: {}", e);
            return (None, None);
        }
    };

    let recommendation_service = TrainingService::new(config.model.clone())
        .train(&catalog)
        .and_then(|models| RecommendationService::new(catalog.clone(), &models, &config.model))
        .map(Arc::new);
    let recommendation_service = match recommendation_service {
        Ok(service) => {
            info!("Dataset loaded & models trained, serving with {}", service.model_name());
            Some(service)
        }
        Err(e) => {
            error!("Error training models, recommendations disabled: {}", e);
            None
        }
    };

    let top_k = config.model.similar_count;
    let similarity_service = match SimilarityService::load(catalog.clone(), &config.dataset.similarity_path, top_k) {
        Ok(service) => service,
        Err(e) => {
            warn!("Similarity lookup disabled: {}", e);
            SimilarityService::disabled(catalog, top_k)
        }
    };

    (recommendation_service, Some(Arc::new(similarity_service)))
}

pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

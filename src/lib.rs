pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::Mutex;

use crate::config::{Config, StorageBackend};
use crate::database::{FileStore, KeyValueStore, MemoryStore, PgStore};
use crate::error::Result;
use crate::middleware::rate_limit::RateLimiter;
use crate::models::exercise::ReflectionExercise;
use crate::models::question::QuestionBank;
use crate::services::{
    coach_client::CoachClient,
    coaching_service::CoachingOverlay,
    exercise_service::{ExerciseService, EXERCISE_PROGRESS_KEY},
    scoring_service::ScoringModel,
    trade_history_service::{TradeHistoryService, TRADE_HISTORY_KEY},
    tracker_service::AssessmentTracker,
};

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<Mutex<AssessmentTracker>>,
    pub coach_client: CoachClient,
    pub scoring_model: ScoringModel,
    pub coach_limiter: RateLimiter,
    pub trade_history: TradeHistoryService,
    pub exercises: ExerciseService,
}

impl AppState {
    /// `store` backs the per-feature blobs next to the tracker's own
    /// assessment progress.
    pub fn new(
        tracker: AssessmentTracker,
        store: Arc<dyn KeyValueStore>,
        coach_client: CoachClient,
        scoring_model: ScoringModel,
        coach_rps: u32,
    ) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
            coach_client,
            scoring_model,
            coach_limiter: RateLimiter::new(coach_rps),
            trade_history: TradeHistoryService::new(store.clone(), TRADE_HISTORY_KEY),
            exercises: ExerciseService::new(
                store,
                EXERCISE_PROGRESS_KEY,
                ReflectionExercise::builtin(),
            ),
        }
    }

    /// Wires the store, question bank, tracker and backend client
    /// described by `config`.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = open_store(config).await?;

        let bank = match &config.question_bank_path {
            Some(path) => QuestionBank::from_json_file(path).await?,
            None => QuestionBank::builtin(),
        };

        let tracker = AssessmentTracker::hydrate(
            Arc::new(bank),
            store.clone(),
            config.storage_key.clone(),
            CoachingOverlay::new(config.coaching_message_delay),
        )
        .await?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        let coach_client = CoachClient::new(
            config.coach_api_url.clone(),
            config.coach_api_key.clone(),
            http_client,
        );

        Ok(Self::new(
            tracker,
            store,
            coach_client,
            config.scoring_model,
            config.coach_rps,
        ))
    }
}

async fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.storage_backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::new(config.storage_dir.clone())),
        StorageBackend::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                error::Error::Config("DATABASE_URL is required for postgres storage".to_string())
            })?;
            let pool = database::pool::create_pool(url).await?;
            database::pool::run_migrations(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
    };
    tracing::info!(backend = ?config.storage_backend, "Progress store ready");
    Ok(store)
}

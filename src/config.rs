use crate::error::{Error, Result};
use crate::services::scoring_service::ScoringModel;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

pub const DEFAULT_STORAGE_KEY: &str = "trader_assessment_progress";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    Postgres,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "postgres" => Ok(Self::Postgres),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub scoring_model: ScoringModel,
    pub storage_backend: StorageBackend,
    pub storage_dir: PathBuf,
    pub database_url: Option<String>,
    pub storage_key: String,
    pub question_bank_path: Option<PathBuf>,
    pub coach_api_url: Url,
    pub coach_api_key: Option<String>,
    pub coaching_message_delay: Duration,
    pub coach_rps: u32,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let storage_backend: StorageBackend = get_env_or("STORAGE_BACKEND", StorageBackend::File)?;
        let database_url = env::var("DATABASE_URL").ok();
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(Error::Config(
                "DATABASE_URL is required when STORAGE_BACKEND=postgres".to_string(),
            ));
        }

        let coach_api_url = get_env("COACH_API_URL")?;
        let coach_api_url = Url::parse(&coach_api_url)
            .map_err(|e| Error::Config(format!("Invalid value for COACH_API_URL: {}", e)))?;

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            scoring_model: get_env_parse("SCORING_MODEL")?,
            storage_backend,
            storage_dir: PathBuf::from(get_env_or("STORAGE_DIR", "./data".to_string())?),
            database_url,
            storage_key: get_env_or("STORAGE_KEY", DEFAULT_STORAGE_KEY.to_string())?,
            question_bank_path: env::var("QUESTION_BANK_PATH").ok().map(PathBuf::from),
            coach_api_url,
            coach_api_key: env::var("COACH_API_KEY").ok().filter(|k| !k.is_empty()),
            coaching_message_delay: Duration::from_millis(get_env_or(
                "COACHING_MESSAGE_DELAY_MS",
                2500u64,
            )?),
            coach_rps: get_env_or("COACH_RPS", 10u32)?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

fn get_env_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(_) => get_env_parse(name),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

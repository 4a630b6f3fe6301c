use std::env;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub search_radius_km: f64,
    pub candidate_cap: usize,
    pub wave_size: usize,
    pub wave_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub worker_count: usize,
    pub task_queue_size: usize,
    pub token_ttl_secs: u64,
    pub event_buffer_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            search_radius_km: parse_or_default("SEARCH_RADIUS_KM", 50.0)?,
            candidate_cap: parse_or_default("CANDIDATE_CAP", 100)?,
            wave_size: parse_or_default("WAVE_SIZE", 3)?,
            wave_timeout_ms: parse_or_default("WAVE_TIMEOUT_MS", 8_000)?,
            poll_interval_ms: parse_or_default("POLL_INTERVAL_MS", 200)?,
            worker_count: parse_or_default("WORKER_COUNT", 20)?,
            task_queue_size: parse_or_default("TASK_QUEUE_SIZE", 256)?,
            token_ttl_secs: parse_or_default("TOKEN_TTL_SECS", 300)?,
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
        })
    }

    pub fn wave_timeout(&self) -> Duration {
        Duration::from_millis(self.wave_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}

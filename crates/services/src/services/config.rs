//! Environment-backed application configuration.

use std::{env, time::Duration};

use db::models::plant::WaterFrequency;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// Reminder interval per watering-frequency tier.
///
/// Demo-friendly defaults: low every 60s, normal every 30s,
/// high every 15s.
#[derive(Debug, Clone)]
pub struct WateringSchedule {
    pub low: Duration,
    pub normal: Duration,
    pub high: Duration,
}

impl Default for WateringSchedule {
    fn default() -> Self {
        Self {
            low: Duration::from_secs(60),
            normal: Duration::from_secs(30),
            high: Duration::from_secs(15),
        }
    }
}

impl WateringSchedule {
    pub fn interval_for(&self, frequency: WaterFrequency) -> Duration {
        match frequency {
            WaterFrequency::Low => self.low,
            WaterFrequency::Normal => self.normal,
            WaterFrequency::High => self.high,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Owner ids granted the admin role on first sight.
    pub admin_owner_ids: Vec<String>,
    pub schedule: WateringSchedule,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://plantminder.db".to_string());
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
                var: "PORT",
                value: raw,
            })?,
            Err(_) => 3000,
        };
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;

        let admin_owner_ids = env::var("ADMIN_OWNER_IDS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let mut schedule = WateringSchedule::default();
        if let Some(secs) = read_secs("REMINDER_LOW_SECS")? {
            schedule.low = secs;
        }
        if let Some(secs) = read_secs("REMINDER_NORMAL_SECS")? {
            schedule.normal = secs;
        }
        if let Some(secs) = read_secs("REMINDER_HIGH_SECS")? {
            schedule.high = secs;
        }

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            admin_owner_ids,
            schedule,
        })
    }
}

fn read_secs(var: &'static str) -> Result<Option<Duration>, ConfigError> {
    match env::var(var) {
        Ok(raw) => {
            let secs: u64 = raw
                .parse()
                .map_err(|_| ConfigError::InvalidVar { var, value: raw })?;
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(_) => Ok(None),
    }
}

//! GymScout configuration system.
//!
//! Every field has a serde default and an out-of-range fallback: a bad value
//! in config.toml downgrades to the default with a warning, never an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::UpdateStrategy;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GymScoutConfig {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub providers: ProviderConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl GymScoutConfig {
    /// Load config from the default path (~/.gymscout/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::GymScoutError::Config(format!("Failed to read config: {e}"))
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|e| {
            crate::error::GymScoutError::Config(format!("Failed to parse config: {e}"))
        })?;
        config.schedule.sanitize();
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the GymScout home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gymscout")
    }
}

/// When and how the enrichment cycle triggers.
///
/// Trigger fields are signed so a negative value in config.toml parses and
/// then falls back in `sanitize`, instead of failing the whole load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Hour of day the cycle triggers (0-23).
    #[serde(default = "default_trigger_hour")]
    pub trigger_hour: i64,
    /// Minute the cycle triggers (0-59).
    #[serde(default = "default_trigger_minute")]
    pub trigger_minute: i64,
    /// Named pipeline strategy ("enhanced", "basic", "multisource", "advanced").
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default = "bool_true")]
    pub enabled: bool,
    /// Days between cycles (1-365).
    #[serde(default = "default_interval_days")]
    pub interval_days: i64,
}

fn default_trigger_hour() -> i64 { 6 }
fn default_trigger_minute() -> i64 { 0 }
fn default_strategy() -> String { "enhanced".into() }
fn bool_true() -> bool { true }
fn default_interval_days() -> i64 { 3 }

/// Longest accepted cycle interval.
pub const MAX_INTERVAL_DAYS: i64 = 365;

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            trigger_hour: default_trigger_hour(),
            trigger_minute: default_trigger_minute(),
            strategy: default_strategy(),
            enabled: true,
            interval_days: default_interval_days(),
        }
    }
}

impl ScheduleConfig {
    /// Clamp out-of-range values back to defaults. Bad config is never fatal.
    pub fn sanitize(&mut self) {
        if !(0..=23).contains(&self.trigger_hour) {
            tracing::warn!("trigger_hour {} out of range, using default", self.trigger_hour);
            self.trigger_hour = default_trigger_hour();
        }
        if !(0..=59).contains(&self.trigger_minute) {
            tracing::warn!("trigger_minute {} out of range, using default", self.trigger_minute);
            self.trigger_minute = default_trigger_minute();
        }
        if !(1..=MAX_INTERVAL_DAYS).contains(&self.interval_days) {
            tracing::warn!("interval_days {} out of range, using default", self.interval_days);
            self.interval_days = default_interval_days();
        }
    }

    /// Parsed strategy; unknown names fall back to the default.
    pub fn strategy(&self) -> UpdateStrategy {
        UpdateStrategy::parse_or_default(&self.strategy)
    }

    pub fn set_strategy(&mut self, strategy: UpdateStrategy) {
        self.strategy = strategy.to_string();
    }

    /// "H:MM" display form of the trigger time.
    pub fn schedule_label(&self) -> String {
        format!("{}:{:02}", self.trigger_hour, self.trigger_minute)
    }
}

/// Partial schedule update — `None` fields keep their current value,
/// out-of-range fields are ignored with a warning.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleConfigPatch {
    pub trigger_hour: Option<i64>,
    pub trigger_minute: Option<i64>,
    pub strategy: Option<String>,
    pub enabled: Option<bool>,
    pub interval_days: Option<i64>,
}

impl ScheduleConfigPatch {
    pub fn apply(&self, config: &mut ScheduleConfig) {
        if let Some(hour) = self.trigger_hour {
            if (0..=23).contains(&hour) {
                config.trigger_hour = hour;
            } else {
                tracing::warn!("Ignoring invalid trigger_hour {hour}");
            }
        }
        if let Some(minute) = self.trigger_minute {
            if (0..=59).contains(&minute) {
                config.trigger_minute = minute;
            } else {
                tracing::warn!("Ignoring invalid trigger_minute {minute}");
            }
        }
        if let Some(strategy) = &self.strategy {
            config.strategy = UpdateStrategy::parse_or_default(strategy).to_string();
        }
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        if let Some(days) = self.interval_days {
            if (1..=MAX_INTERVAL_DAYS).contains(&days) {
                config.interval_days = days;
            } else {
                tracing::warn!("Ignoring invalid interval_days {days}");
            }
        }
    }
}

/// Place-data provider credentials and tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Kakao Local REST API key (env: KAKAO_REST_API_KEY).
    #[serde(default)]
    pub kakao_api_key: String,
    /// Naver Open API client id (env: NAVER_CLIENT_ID).
    #[serde(default)]
    pub naver_client_id: String,
    /// Naver Open API client secret (env: NAVER_CLIENT_SECRET).
    #[serde(default)]
    pub naver_client_secret: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Base URL overrides — empty means the provider's production endpoint.
    #[serde(default)]
    pub kakao_base_url: String,
    #[serde(default)]
    pub naver_base_url: String,
    #[serde(default)]
    pub scrape_base_url: String,
    /// Minimum gap between successive query batches for one gym, in ms.
    #[serde(default = "default_query_gap_ms")]
    pub query_gap_ms: u64,
}

fn default_timeout_secs() -> u64 { 10 }
fn default_query_gap_ms() -> u64 { 500 }

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kakao_api_key: String::new(),
            naver_client_id: String::new(),
            naver_client_secret: String::new(),
            timeout_secs: default_timeout_secs(),
            kakao_base_url: String::new(),
            naver_base_url: String::new(),
            scrape_base_url: String::new(),
            query_gap_ms: default_query_gap_ms(),
        }
    }
}

/// Gym database location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database path; empty means ~/.gymscout/gyms.db.
    #[serde(default)]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { db_path: String::new() }
    }
}

impl StoreConfig {
    pub fn resolved_path(&self) -> PathBuf {
        if self.db_path.is_empty() {
            GymScoutConfig::home_dir().join("gyms.db")
        } else {
            PathBuf::from(&self.db_path)
        }
    }
}

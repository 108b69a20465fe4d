//! Application configuration
//!
//! Contains the configuration structures for the Solace host and the
//! conversions into the core crate's configuration types.

mod loader;

pub use loader::load_config;

use serde::{Deserialize, Serialize};
use solace_core::OrchestratorConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorAppConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Text generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model override; empty uses the provider default
    #[serde(default)]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Upper bound on one generator call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_max_tokens() -> u32 {
    1000
}
fn default_temperature() -> f32 {
    0.7
}
fn default_timeout_secs() -> u64 {
    20
}

/// Orchestrator configuration (exposed to TOML)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorAppConfig {
    /// Utterances handed to the generator as history
    #[serde(default = "default_history_for_prompt")]
    pub history_for_prompt: usize,
    /// Recommendations attached to a single turn
    #[serde(default = "default_max_turn_recommendations")]
    pub max_turn_recommendations: usize,
    /// Minutes assumed when the user did not say
    #[serde(default = "default_available_minutes")]
    pub default_available_minutes: u32,
    /// Keep generating replies once a session is handed off
    #[serde(default = "default_true")]
    pub reply_after_handoff: bool,
    /// Run the three extractors concurrently
    #[serde(default = "default_true")]
    pub concurrent_extractors: bool,
}

impl Default for OrchestratorAppConfig {
    fn default() -> Self {
        Self {
            history_for_prompt: default_history_for_prompt(),
            max_turn_recommendations: default_max_turn_recommendations(),
            default_available_minutes: default_available_minutes(),
            reply_after_handoff: true,
            concurrent_extractors: true,
        }
    }
}

fn default_history_for_prompt() -> usize {
    10
}
fn default_max_turn_recommendations() -> usize {
    3
}
fn default_available_minutes() -> u32 {
    30
}
fn default_true() -> bool {
    true
}

/// Session storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Sqlite,
    Redis,
}

/// Storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// SQLite database file; empty uses the platform data directory
    #[serde(default)]
    pub sqlite_path: String,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// Write a session journal next to the SQLite sessions
    #[serde(default = "default_true")]
    pub journal: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            sqlite_path: String::new(),
            redis_url: default_redis_url(),
            session_ttl_secs: default_session_ttl_secs(),
            journal: true,
        }
    }
}

impl StorageConfig {
    /// Resolved SQLite path
    pub fn sqlite_path(&self) -> PathBuf {
        if self.sqlite_path.is_empty() {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("solace")
                .join("solace.db")
        } else {
            PathBuf::from(&self.sqlite_path)
        }
    }
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}
fn default_session_ttl_secs() -> u64 {
    1800
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// Daily-rotated log file; empty logs to stderr only
    #[serde(default)]
    pub file: String,
}

impl AppConfig {
    /// Core orchestrator settings
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        let o = &self.orchestrator;
        OrchestratorConfig::default()
            .with_history_for_prompt(o.history_for_prompt)
            .with_max_turn_recommendations(o.max_turn_recommendations)
            .with_default_available_minutes(o.default_available_minutes)
            .with_reply_after_handoff(o.reply_after_handoff)
            .with_concurrent_extractors(o.concurrent_extractors)
            .with_generation_timeout(Duration::from_secs(self.llm.timeout_secs))
    }
}

pub mod lexicon;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub assistant: AssistantConfig,
    pub ranking: RankingConfig,
    pub tagging: TaggingConfig,
    pub lexicon: LexiconSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_rate_limit: u64,
    pub max_request_body_size: usize,
}

/// Limits for the free-text assistant pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Candidates fetched by the strong and weak tiers
    pub candidate_limit: usize,
    /// Recipes fetched by the unconditional "recent" tier
    pub recent_limit: usize,
    /// Suggestions returned after safety filtering
    pub suggestion_limit: usize,
    /// Suggestions returned when nothing survived the filter
    pub fallback_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    pub default_limit: usize,
    pub max_limit: usize,
    pub max_pantry_items: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggingConfig {
    pub batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LexiconSettings {
    /// YAML lexicon file; the built-in lexicon is used when unset
    pub path: Option<PathBuf>,
}

fn env_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("Invalid {name} value"))),
        Err(_) => Ok(default),
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            candidate_limit: 60,
            recent_limit: 40,
            suggestion_limit: 12,
            fallback_limit: 8,
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_limit: 12,
            max_limit: 50,
            max_pantry_items: 50,
        }
    }
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self { batch_size: 200 }
    }
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/cookmate.db?mode=rwc".to_string());
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let assistant_defaults = AssistantConfig::default();
        let ranking_defaults = RankingConfig::default();

        Ok(Settings {
            database: DatabaseConfig {
                url: database_url,
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10)?,
                min_connections: env_or("DATABASE_MIN_CONNECTIONS", 1)?,
                connection_timeout_seconds: env_or("DATABASE_CONNECTION_TIMEOUT", 30)?,
                idle_timeout_seconds: env_or("DATABASE_IDLE_TIMEOUT", 600)?,
            },
            server: ServerConfig {
                host,
                port: env_or("PORT", 4000)?,
                api_rate_limit: env_or("API_RATE_LIMIT", 50)?,
                max_request_body_size: env_or("MAX_REQUEST_BODY_SIZE", 1_048_576)?,
            },
            assistant: AssistantConfig {
                candidate_limit: env_or(
                    "ASSISTANT_CANDIDATE_LIMIT",
                    assistant_defaults.candidate_limit,
                )?,
                recent_limit: env_or("ASSISTANT_RECENT_LIMIT", assistant_defaults.recent_limit)?,
                suggestion_limit: env_or(
                    "ASSISTANT_SUGGESTION_LIMIT",
                    assistant_defaults.suggestion_limit,
                )?,
                fallback_limit: env_or(
                    "ASSISTANT_FALLBACK_LIMIT",
                    assistant_defaults.fallback_limit,
                )?,
            },
            ranking: RankingConfig {
                default_limit: env_or("RANKING_DEFAULT_LIMIT", ranking_defaults.default_limit)?,
                max_limit: env_or("RANKING_MAX_LIMIT", ranking_defaults.max_limit)?,
                max_pantry_items: env_or("MAX_PANTRY_ITEMS", ranking_defaults.max_pantry_items)?,
            },
            tagging: TaggingConfig {
                batch_size: env_or("TAGGING_BATCH_SIZE", TaggingConfig::default().batch_size)?,
            },
            lexicon: LexiconSettings {
                path: std::env::var("LEXICON_PATH").ok().map(PathBuf::from),
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.server.api_rate_limit == 0 {
            return Err(Error::Config("API rate limit must be non-zero".to_string()));
        }

        if self.tagging.batch_size == 0 {
            return Err(Error::Config(
                "Tagging batch size must be non-zero".to_string(),
            ));
        }

        if self.ranking.default_limit == 0 || self.ranking.default_limit > self.ranking.max_limit
        {
            return Err(Error::Config(format!(
                "Ranking default limit must be between 1 and {}",
                self.ranking.max_limit
            )));
        }

        if self.assistant.candidate_limit == 0 || self.assistant.recent_limit == 0 {
            return Err(Error::Config(
                "Assistant candidate limits must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    Settings {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connection_timeout_seconds: 30,
            idle_timeout_seconds: 600,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 4000,
            api_rate_limit: 100,
            max_request_body_size: 1_048_576,
        },
        assistant: AssistantConfig::default(),
        ranking: RankingConfig::default(),
        tagging: TaggingConfig::default(),
        lexicon: LexiconSettings::default(),
    }
}

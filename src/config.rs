use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::recommend::RecommendationStrategy;
use crate::scoring::ScoringWeights;
use crate::sources::YouTubeConfig;

/// Configuration for the SkillPilot discovery pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Video provider settings
    pub youtube: YouTubeConfig,

    /// Candidate scoring weights
    pub scoring: ScoringWeights,

    /// Course assembly pacing
    pub pipeline: PipelineConfig,

    /// External course catalog aggregation
    pub catalog: CatalogConfig,

    /// Project recommendation engine
    pub recommendations: RecommendationConfig,

    /// Plan and enrollment storage
    pub storage: StorageConfig,

    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Listings requested per search intent
    pub max_results_per_search: usize,

    /// Pause between consecutive intent searches (ms)
    pub search_interval_ms: u64,

    /// Pause between consecutive sections (ms)
    pub section_interval_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_results_per_search: 3,
            search_interval_ms: 200,
            section_interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Courses requested from each source per page
    pub per_source_limit: usize,

    /// Pause between consecutive sources (ms)
    pub source_interval_ms: u64,

    /// HTTP request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Replacement for the embedded fallback dataset
    pub fallback_path: Option<PathBuf>,

    /// Sources to query, by name
    pub enabled_sources: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            per_source_limit: 15,
            source_interval_ms: 2000,
            request_timeout_seconds: 10,
            fallback_path: None,
            enabled_sources: vec!["coursera".to_string(), "geeksforgeeks".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Non-general projects must score above this
    pub min_match_score: u8,

    pub max_suggestions: usize,

    pub strategy: RecommendationStrategy,

    /// Share of the expertise-tier score in the blended strategy
    pub tier_weight: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            min_match_score: 10,
            max_suggestions: 3,
            strategy: RecommendationStrategy::Similarity,
            tier_weight: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of the JSON plan store
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./skillpilot-data"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found, else the environment
    pub fn load() -> Result<Self> {
        let config_paths = ["skillpilot.toml", "config/skillpilot.toml"];

        for path in &config_paths {
            if Path::new(path).exists() {
                match Self::load_from(path) {
                    Ok(mut config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        config.apply_env_keys();
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_keys();

        if let Ok(data_dir) = std::env::var("SKILLPILOT_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(log_level) = std::env::var("SKILLPILOT_LOG_LEVEL") {
            config.logging.log_level = log_level;
        }

        if let Ok(fallback) = std::env::var("SKILLPILOT_CATALOG_FALLBACK") {
            config.catalog.fallback_path = Some(PathBuf::from(fallback));
        }

        Ok(config)
    }

    /// Fill API keys from the environment when none are configured
    fn apply_env_keys(&mut self) {
        if !self.youtube.api_keys.is_empty() {
            return;
        }

        if let Ok(keys) = std::env::var("SKILLPILOT_YOUTUBE_API_KEYS") {
            self.youtube.api_keys = parse_key_list(&keys);
        }

        if self.youtube.api_keys.is_empty() {
            if let Ok(key) = std::env::var("YOUTUBE_API_KEY") {
                self.youtube.api_keys = parse_key_list(&key);
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;

        if self.pipeline.max_results_per_search == 0 {
            return Err(invalid("pipeline.max_results_per_search", "must be greater than 0"));
        }

        if self.youtube.request_timeout_seconds == 0 {
            return Err(invalid("youtube.request_timeout_seconds", "must be greater than 0"));
        }

        if self.catalog.per_source_limit == 0 {
            return Err(invalid("catalog.per_source_limit", "must be greater than 0"));
        }

        if self.catalog.request_timeout_seconds == 0 {
            return Err(invalid("catalog.request_timeout_seconds", "must be greater than 0"));
        }

        if self.recommendations.max_suggestions == 0 {
            return Err(invalid("recommendations.max_suggestions", "must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&self.recommendations.tier_weight) {
            return Err(invalid("recommendations.tier_weight", "must be within [0, 1]"));
        }

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "SkillPilot Discovery Configuration:\n\
            - YouTube API Keys: {}\n\
            - Results per Search: {}\n\
            - Section Interval: {}ms\n\
            - Catalog Sources: {}\n\
            - Recommendation Strategy: {:?}\n\
            - Data Directory: {}\n\
            - Caching Enabled: {}",
            self.youtube.api_keys.len(),
            self.pipeline.max_results_per_search,
            self.pipeline.section_interval_ms,
            self.catalog.enabled_sources.join(", "),
            self.recommendations.strategy,
            self.storage.data_dir.display(),
            self.youtube.enable_cache
        )
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn parse_key_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_api_keys(mut self, keys: Vec<String>) -> Self {
        self.config.youtube.api_keys = keys;
        self
    }

    pub fn with_scoring_weights(mut self, weights: ScoringWeights) -> Self {
        self.config.scoring = weights;
        self
    }

    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.config.storage.data_dir = dir;
        self
    }

    pub fn with_strategy(mut self, strategy: RecommendationStrategy) -> Self {
        self.config.recommendations.strategy = strategy;
        self
    }

    pub fn with_fallback_path(mut self, path: PathBuf) -> Self {
        self.config.catalog.fallback_path = Some(path);
        self
    }

    /// Zero out every courtesy delay
    pub fn without_delays(mut self) -> Self {
        self.config.pipeline.search_interval_ms = 0;
        self.config.pipeline.section_interval_ms = 0;
        self.config.catalog.source_interval_ms = 0;
        self
    }

    pub fn enable_caching(mut self, enable: bool) -> Self {
        self.config.youtube.enable_cache = enable;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config
            .validate()
            .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Server configuration
//!
//! Built once at startup from the environment (after loading `.env`) and
//! handed to each component constructor.

use slidecast_client::{CompletionOptions, RetryPolicy};
use slidecast_render::RenderConfig;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Chat-completion service settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL; requests go to `{base_url}/chat/completions`
    pub base_url: String,

    /// Bearer token; the synthesis endpoints refuse to run without it
    pub api_key: Option<String>,

    pub model: String,

    /// Sampling and timeout for the storyboard call
    pub storyboard: CompletionOptions,

    /// Sampling and timeout for the code call
    pub code: CompletionOptions,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com".to_string(),
            api_key: None,
            model: "deepseek-chat".to_string(),
            storyboard: CompletionOptions {
                temperature: 0.7,
                timeout: Duration::from_secs(90),
            },
            code: CompletionOptions {
                temperature: 0.5,
                timeout: Duration::from_secs(120),
            },
        }
    }
}

/// Where published videos live and how they are addressed
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub artifact_dir: PathBuf,
    /// URL path prefix under which `artifact_dir` is served
    pub public_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("static/generated_videos"),
            public_prefix: "/static/generated_videos".to_string(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,

    /// PostgreSQL content store; `None` selects the in-memory store
    pub database_url: Option<String>,

    /// JSON file of materials loaded into the in-memory store at startup
    pub seed_file: Option<PathBuf>,

    pub llm: LlmConfig,
    pub retry: RetryPolicy,
    pub render: RenderConfig,
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            database_url: None,
            seed_file: None,
            llm: LlmConfig::default(),
            retry: RetryPolicy::default(),
            render: RenderConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - SLIDECAST_BIND_ADDR (default: 0.0.0.0:8080)
    /// - DATABASE_URL (default: in-memory store)
    /// - MATERIALS_SEED_FILE (in-memory store only)
    /// - LLM_BASE_URL, LLM_API_KEY, LLM_MODEL
    /// - LLM_STORYBOARD_TEMPERATURE, LLM_CODE_TEMPERATURE
    /// - LLM_STORYBOARD_TIMEOUT, LLM_CODE_TIMEOUT (seconds)
    /// - LLM_MAX_RETRIES, LLM_INITIAL_BACKOFF_MS, LLM_MAX_BACKOFF_MS
    /// - RENDER_COMMAND, RENDER_SCENE_CLASS, RENDER_TIMEOUT, RENDER_WORK_ROOT
    /// - ARTIFACT_DIR, ARTIFACT_PUBLIC_PREFIX
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let llm = LlmConfig {
            base_url: env_string("LLM_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.llm.base_url),
            api_key: env_string("LLM_API_KEY"),
            model: env_string("LLM_MODEL").unwrap_or(defaults.llm.model),
            storyboard: CompletionOptions {
                temperature: env_parse("LLM_STORYBOARD_TEMPERATURE")
                    .unwrap_or(defaults.llm.storyboard.temperature),
                timeout: env_parse("LLM_STORYBOARD_TIMEOUT")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.llm.storyboard.timeout),
            },
            code: CompletionOptions {
                temperature: env_parse("LLM_CODE_TEMPERATURE")
                    .unwrap_or(defaults.llm.code.temperature),
                timeout: env_parse("LLM_CODE_TIMEOUT")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.llm.code.timeout),
            },
        };

        let retry = RetryPolicy {
            max_retries: env_parse("LLM_MAX_RETRIES").unwrap_or(defaults.retry.max_retries),
            initial_backoff: env_parse("LLM_INITIAL_BACKOFF_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry.initial_backoff),
            max_backoff: env_parse("LLM_MAX_BACKOFF_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry.max_backoff),
        };

        let storage = StorageConfig {
            artifact_dir: env_string("ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage.artifact_dir),
            public_prefix: env_string("ARTIFACT_PUBLIC_PREFIX")
                .map(|prefix| prefix.trim_end_matches('/').to_string())
                .unwrap_or(defaults.storage.public_prefix),
        };

        Self {
            bind_addr: env_string("SLIDECAST_BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: env_string("DATABASE_URL"),
            seed_file: env_string("MATERIALS_SEED_FILE").map(PathBuf::from),
            llm,
            retry,
            render: RenderConfig::from_env(),
            storage,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            anyhow::bail!("bind_addr '{}' is not a valid socket address", self.bind_addr);
        }

        if !self.llm.base_url.starts_with("http://") && !self.llm.base_url.starts_with("https://") {
            anyhow::bail!("LLM base URL must start with http:// or https://");
        }

        if self.llm.model.trim().is_empty() {
            anyhow::bail!("LLM model cannot be empty");
        }

        for (name, options) in [("storyboard", &self.llm.storyboard), ("code", &self.llm.code)] {
            if !(0.0..=2.0).contains(&options.temperature) {
                anyhow::bail!("{} temperature must be between 0 and 2", name);
            }
            if options.timeout.is_zero() {
                anyhow::bail!("{} timeout must be greater than 0", name);
            }
        }

        if self.retry.max_backoff < self.retry.initial_backoff {
            anyhow::bail!("max backoff cannot be shorter than the initial backoff");
        }

        if !self.storage.public_prefix.starts_with('/') || self.storage.public_prefix.len() < 2 {
            anyhow::bail!("artifact public prefix must be an absolute path other than '/'");
        }

        self.render.validate()
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.llm.model, "deepseek-chat");
        assert_eq!(config.llm.storyboard.temperature, 0.7);
        assert_eq!(config.llm.code.timeout, Duration::from_secs(120));
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.storage.public_prefix, "/static/generated_videos");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.bind_addr = "not an address".to_string();
        assert!(config.validate().is_err());
        config.bind_addr = "127.0.0.1:9000".to_string();

        config.llm.base_url = "api.deepseek.com".to_string();
        assert!(config.validate().is_err());
        config.llm.base_url = "http://localhost:11434/v1".to_string();

        config.llm.code.temperature = 2.5;
        assert!(config.validate().is_err());
        config.llm.code.temperature = 0.0;

        config.llm.storyboard.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
        config.llm.storyboard.timeout = Duration::from_secs(1);

        config.storage.public_prefix = "/".to_string();
        assert!(config.validate().is_err());
        config.storage.public_prefix = "/videos".to_string();

        config.render.command = Vec::new();
        assert!(config.validate().is_err());
        config.render.command = vec!["manim".to_string()];

        assert!(config.validate().is_ok());
    }
}

//! Configuration for factcheck.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (credentials, FACTCHECK_MODEL, FACTCHECK_ENGINE_URL,
//!    FACTCHECK_SOURCE_TIMEOUT_SECS); a `.env` file fills in any that are unset
//! 2. Config file (FACTCHECK_CONFIG, else .factcheck/config.yaml in the current
//!    directory or a parent, else ~/.factcheck/config.yaml)
//! 3. Defaults
//!
//! Settings are resolved once at startup and handed to the sources and the
//! engine client. Nothing in the pipeline reads the environment itself.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const ENV_CONFIG: &str = "FACTCHECK_CONFIG";
pub const ENV_MODEL: &str = "FACTCHECK_MODEL";
pub const ENV_ENGINE_URL: &str = "FACTCHECK_ENGINE_URL";
pub const ENV_SOURCE_TIMEOUT: &str = "FACTCHECK_SOURCE_TIMEOUT_SECS";
pub const ENV_OPENROUTER_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_NEWS_KEY: &str = "NEWSAPI_KEY";
pub const ENV_FACT_CHECK_KEY: &str = "GOOGLE_FACTCHECK_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Missing credential: set the {0} environment variable")]
    MissingCredential(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub sources: SourcesSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineSection {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesSection {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
    #[serde(default)]
    pub wikipedia: EndpointSection,
    #[serde(default)]
    pub wikidata: EndpointSection,
    #[serde(default)]
    pub news: EndpointSection,
    #[serde(default)]
    pub fact_check: EndpointSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointSection {
    pub endpoint: Option<String>,
    pub limit: Option<usize>,
}

/// Reasoning engine connection settings
#[derive(Clone)]
pub struct EngineSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
    pub api_key: Option<String>,
}

/// One provider endpoint and how many results to take from it
#[derive(Clone)]
pub struct EndpointSettings {
    pub endpoint: String,
    pub limit: usize,
    pub api_key: Option<String>,
}

/// Evidence provider settings
#[derive(Clone)]
pub struct SourceSettings {
    /// Per-call timeout applied to every provider request
    pub timeout: Duration,
    pub user_agent: String,
    pub wikipedia: EndpointSettings,
    pub wikidata: EndpointSettings,
    pub news: EndpointSettings,
    pub fact_check: EndpointSettings,
}

/// Resolved configuration
#[derive(Clone)]
pub struct Settings {
    pub engine: EngineSettings,
    pub sources: SourceSettings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

pub const DEFAULT_ENGINE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_WIKIPEDIA_URL: &str = "https://en.wikipedia.org/w/api.php";
pub const DEFAULT_WIKIDATA_URL: &str = "https://query.wikidata.org/sparql";
pub const DEFAULT_NEWS_URL: &str = "https://newsapi.org/v2/everything";
pub const DEFAULT_FACT_CHECK_URL: &str =
    "https://factchecktools.googleapis.com/v1alpha1/claims:search";

fn default_user_agent() -> String {
    format!(
        "factcheck/{} (claim verification; +https://crates.io/crates/factcheck)",
        env!("CARGO_PKG_VERSION")
    )
}

impl Default for Settings {
    fn default() -> Self {
        Self::build(ConfigFile::default(), None, |_| None, None)
    }
}

impl Settings {
    /// Load settings from the process environment and any discovered config file
    pub fn load() -> Result<Self, ConfigError> {
        let config_file = std::env::var(ENV_CONFIG)
            .ok()
            .map(PathBuf::from)
            .or_else(find_config_file);

        let file = match config_file {
            Some(ref path) => load_config_file(path)?,
            None => ConfigFile::default(),
        };

        let settings = Self::resolve(file, config_file, |key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Merge a parsed config file with environment lookups and defaults
    ///
    /// Blank variables count as unset; a variable that is set but cannot
    /// be parsed is an error rather than silently ignored.
    pub fn resolve<F>(
        file: ConfigFile,
        config_file: Option<PathBuf>,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let source_timeout = env(ENV_SOURCE_TIMEOUT)
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|_| {
                    ConfigError::Invalid(format!(
                        "{} must be a whole number of seconds, got {:?}",
                        ENV_SOURCE_TIMEOUT, raw
                    ))
                })
            })
            .transpose()?;

        Ok(Self::build(file, config_file, env, source_timeout))
    }

    fn build<F>(
        file: ConfigFile,
        config_file: Option<PathBuf>,
        env: F,
        source_timeout: Option<u64>,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {

        let engine = EngineSettings {
            base_url: env(ENV_ENGINE_URL)
                .or(file.engine.base_url)
                .unwrap_or_else(|| DEFAULT_ENGINE_URL.to_string()),
            model: env(ENV_MODEL)
                .or(file.engine.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: file.engine.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            timeout: Duration::from_secs(
                file.engine
                    .timeout_seconds
                    .unwrap_or(DEFAULT_ENGINE_TIMEOUT_SECS),
            ),
            api_key: env(ENV_OPENROUTER_KEY),
        };

        let source_timeout = source_timeout
            .or(file.sources.timeout_seconds)
            .unwrap_or(DEFAULT_SOURCE_TIMEOUT_SECS);

        let endpoint = |section: EndpointSection, url: &str, limit: usize, key: Option<String>| {
            EndpointSettings {
                endpoint: section.endpoint.unwrap_or_else(|| url.to_string()),
                limit: section.limit.unwrap_or(limit),
                api_key: key,
            }
        };

        let sources = SourceSettings {
            timeout: Duration::from_secs(source_timeout),
            user_agent: file.sources.user_agent.unwrap_or_else(default_user_agent),
            wikipedia: endpoint(file.sources.wikipedia, DEFAULT_WIKIPEDIA_URL, 4, None),
            wikidata: endpoint(file.sources.wikidata, DEFAULT_WIKIDATA_URL, 10, None),
            news: endpoint(file.sources.news, DEFAULT_NEWS_URL, 3, env(ENV_NEWS_KEY)),
            fact_check: endpoint(
                file.sources.fact_check,
                DEFAULT_FACT_CHECK_URL,
                10,
                env(ENV_FACT_CHECK_KEY),
            ),
        };

        Self {
            engine,
            sources,
            config_file,
        }
    }

    /// Reject values no request could succeed with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.engine.temperature) {
            return Err(ConfigError::Invalid(format!(
                "engine.temperature must be within 0.0..=2.0, got {}",
                self.engine.temperature
            )));
        }
        if self.engine.timeout.is_zero() {
            return Err(ConfigError::Invalid("engine.timeout_seconds must be > 0".into()));
        }
        if self.sources.timeout.is_zero() {
            return Err(ConfigError::Invalid("sources.timeout_seconds must be > 0".into()));
        }
        for (name, section) in [
            ("wikipedia", &self.sources.wikipedia),
            ("wikidata", &self.sources.wikidata),
            ("news", &self.sources.news),
            ("fact_check", &self.sources.fact_check),
        ] {
            if section.limit == 0 {
                return Err(ConfigError::Invalid(format!("sources.{}.limit must be > 0", name)));
            }
        }
        Ok(())
    }

    /// Ensure every credential a full check needs is present
    pub fn require_credentials(&self) -> Result<(), ConfigError> {
        if self.engine.api_key.is_none() {
            return Err(ConfigError::MissingCredential(ENV_OPENROUTER_KEY));
        }
        self.require_source_credentials()
    }

    /// Ensure the keyed evidence providers can authenticate
    pub fn require_source_credentials(&self) -> Result<(), ConfigError> {
        if self.sources.news.api_key.is_none() {
            return Err(ConfigError::MissingCredential(ENV_NEWS_KEY));
        }
        if self.sources.fact_check.api_key.is_none() {
            return Err(ConfigError::MissingCredential(ENV_FACT_CHECK_KEY));
        }
        Ok(())
    }
}

/// Keys are never printed in full
pub fn mask_credential(key: &Option<String>) -> String {
    match key {
        Some(k) if k.chars().count() > 8 => format!("{}…", k.chars().take(4).collect::<String>()),
        Some(_) => "set".to_string(),
        None => "<unset>".to_string(),
    }
}

impl fmt::Debug for EngineSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSettings")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("api_key", &mask_credential(&self.api_key))
            .finish()
    }
}

impl fmt::Debug for EndpointSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointSettings")
            .field("endpoint", &self.endpoint)
            .field("limit", &self.limit)
            .field("api_key", &mask_credential(&self.api_key))
            .finish()
    }
}

impl fmt::Debug for SourceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceSettings")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("wikipedia", &self.wikipedia)
            .field("wikidata", &self.wikidata)
            .field("news", &self.news)
            .field("fact_check", &self.fact_check)
            .finish()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("engine", &self.engine)
            .field("sources", &self.sources)
            .field("config_file", &self.config_file)
            .finish()
    }
}

/// Load `.env` from the current directory or a parent
///
/// Only sets variables that are not already in the environment.
pub fn load_env_file() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}

/// Load a specific env file, with the same no-override rule
pub fn load_env_file_from(path: &Path) -> bool {
    dotenv::from_path(path).is_ok()
}

/// Find config file by searching current directory and parents, then home
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let config_path = current.join(".factcheck").join("config.yaml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    dirs::home_dir()
        .map(|home| home.join(".factcheck").join("config.yaml"))
        .filter(|path| path.exists())
}

/// Load and parse config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

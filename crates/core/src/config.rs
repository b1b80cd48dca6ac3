use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::embed::{EmbedOptions, DEFAULT_BASE_URL};
use crate::i18n::{self, Localizer, DEFAULT_LANGUAGE};
use crate::simulator::UNCERTAINTY_PROBABILITY;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AppConfig {
    pub embed: EmbedConfig,
    pub localization: LocalizationConfig,
    pub simulator: SimulatorConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmbedConfig {
    pub base_url: String,
    /// Falls back to `<base_url>/widget.js`.
    pub script_src: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocalizationConfig {
    pub default_language: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulatorConfig {
    pub uncertainty_probability: f64,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoreConfig {
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub embed_base_url: Option<String>,
    pub default_language: Option<String>,
    pub simulator_seed: Option<u64>,
    pub store_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            embed: EmbedConfig { base_url: DEFAULT_BASE_URL.to_string(), script_src: None },
            localization: LocalizationConfig { default_language: DEFAULT_LANGUAGE.to_string() },
            simulator: SimulatorConfig {
                uncertainty_probability: UNCERTAINTY_PROBABILITY,
                seed: None,
            },
            store: StoreConfig { path: PathBuf::from("chatdock-bots.json") },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("chatdock.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// Embed settings joined with the configured default language.
    pub fn embed_options(&self) -> EmbedOptions {
        let mut options = EmbedOptions::new(&self.embed.base_url);
        if let Some(script_src) = &self.embed.script_src {
            options.script_src = script_src.clone();
        }
        options.localizer = self.localizer();
        options
    }

    pub fn localizer(&self) -> Localizer {
        Localizer::new(&self.localization.default_language)
    }

    fn apply_patch(&mut self, patch: FilePatch) {
        if let Some(embed) = patch.embed {
            if let Some(base_url) = embed.base_url {
                self.embed.base_url = base_url;
            }
            if let Some(script_src) = embed.script_src {
                self.embed.script_src = Some(script_src);
            }
        }

        if let Some(localization) = patch.localization {
            if let Some(default_language) = localization.default_language {
                self.localization.default_language = default_language;
            }
        }

        if let Some(simulator) = patch.simulator {
            if let Some(probability) = simulator.uncertainty_probability {
                self.simulator.uncertainty_probability = probability;
            }
            if let Some(seed) = simulator.seed {
                self.simulator.seed = Some(seed);
            }
        }

        if let Some(store) = patch.store {
            if let Some(path) = store.path {
                self.store.path = path;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("CHATDOCK_EMBED_BASE_URL") {
            self.embed.base_url = value;
        }
        if let Some(value) = read_env("CHATDOCK_EMBED_SCRIPT_SRC") {
            self.embed.script_src = Some(value);
        }

        let language = read_env("CHATDOCK_LOCALIZATION_DEFAULT_LANGUAGE")
            .or_else(|| read_env("CHATDOCK_DEFAULT_LANGUAGE"));
        if let Some(value) = language {
            self.localization.default_language = value;
        }

        if let Some(value) = read_env("CHATDOCK_SIMULATOR_UNCERTAINTY_PROBABILITY") {
            self.simulator.uncertainty_probability =
                parse_f64("CHATDOCK_SIMULATOR_UNCERTAINTY_PROBABILITY", &value)?;
        }
        if let Some(value) = read_env("CHATDOCK_SIMULATOR_SEED") {
            self.simulator.seed = Some(parse_u64("CHATDOCK_SIMULATOR_SEED", &value)?);
        }

        if let Some(value) = read_env("CHATDOCK_STORE_PATH") {
            self.store.path = PathBuf::from(value);
        }

        let log_level =
            read_env("CHATDOCK_LOGGING_LEVEL").or_else(|| read_env("CHATDOCK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("CHATDOCK_LOGGING_FORMAT").or_else(|| read_env("CHATDOCK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.embed_base_url {
            self.embed.base_url = base_url;
        }
        if let Some(default_language) = overrides.default_language {
            self.localization.default_language = default_language;
        }
        if let Some(seed) = overrides.simulator_seed {
            self.simulator.seed = Some(seed);
        }
        if let Some(store_path) = overrides.store_path {
            self.store.path = store_path;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_embed(&self.embed)?;
        validate_localization(&self.localization)?;
        validate_simulator(&self.simulator)?;
        validate_store(&self.store)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("chatdock.toml"), PathBuf::from("config/chatdock.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<FilePatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<FilePatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("http://") || value.starts_with("https://")
}

fn validate_embed(embed: &EmbedConfig) -> Result<(), ConfigError> {
    if !is_http_url(&embed.base_url) {
        return Err(ConfigError::Validation(
            "embed.base_url must start with http:// or https://".to_string(),
        ));
    }

    if let Some(script_src) = &embed.script_src {
        if !is_http_url(script_src) {
            return Err(ConfigError::Validation(
                "embed.script_src must start with http:// or https://".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_localization(localization: &LocalizationConfig) -> Result<(), ConfigError> {
    let language = localization.default_language.trim();
    if i18n::is_supported(language) {
        return Ok(());
    }
    Err(ConfigError::Validation(format!(
        "localization.default_language `{language}` is not supported (expected one of {})",
        i18n::supported_languages().join("|")
    )))
}

fn validate_simulator(simulator: &SimulatorConfig) -> Result<(), ConfigError> {
    let probability = simulator.uncertainty_probability;
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(ConfigError::Validation(
            "simulator.uncertainty_probability must be in range 0.0..=1.0".to_string(),
        ));
    }
    Ok(())
}

fn validate_store(store: &StoreConfig) -> Result<(), ConfigError> {
    if store.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("store.path must not be empty".to_string()));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FilePatch {
    embed: Option<EmbedPatch>,
    localization: Option<LocalizationPatch>,
    simulator: Option<SimulatorPatch>,
    store: Option<StorePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct EmbedPatch {
    base_url: Option<String>,
    script_src: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LocalizationPatch {
    default_language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SimulatorPatch {
    uncertainty_probability: Option<f64>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct StorePatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

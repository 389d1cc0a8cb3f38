use crate::errors::ConfigError;
use crate::summarize::{EngineConfig, DEFAULT_API_BASE};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = ".textsummarizer.json";

#[derive(Debug, Clone, Parser)]
#[command(name = "textsummarizer", version)]
#[command(about = "Generate summaries from text files, directories, or stdin", long_about = None)]
pub struct AppConfig {
    /// Settings file (defaults to ~/.textsummarizer.json)
    #[arg(long, global = true, env = "TEXTSUMMARIZER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Use local sentence truncation even when AI summarization is configured
    #[arg(long, global = true)]
    pub no_ai: bool,

    #[arg(long, global = true)]
    pub model: Option<String>,

    #[arg(long, global = true)]
    pub temperature: Option<f32>,

    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,

    /// API key; falls back to OPENAI_API_KEY
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    #[arg(long, global = true, env = "OPENAI_BASE_URL", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Summarize one file, or stdin when INPUT is "-"
    Summarize {
        input: String,
        #[command(flatten)]
        length: LengthArg,
    },
    /// Summarize every file in a directory matching a pattern
    Batch {
        directory: PathBuf,
        #[arg(short, long, default_value = crate::batch::DEFAULT_PATTERN)]
        pattern: String,
        #[command(flatten)]
        length: LengthArg,
        /// Write a Markdown report instead of printing
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Summarize an explicit list of files
    Files {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        length: LengthArg,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show or change persisted settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Clone, Args)]
pub struct LengthArg {
    /// Target summary length in characters
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub length: Option<u32>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    Show,
    Set { key: String, value: String },
}

impl AppConfig {
    pub fn from_env_and_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.api_base).map_err(|_| "Invalid OPENAI_BASE_URL format".to_string())?;
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err("temperature must be between 0 and 2".into());
            }
        }
        Ok(())
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_settings_path)
    }

    /// Persisted settings with command-line overrides applied on top.
    pub fn engine_config(&self, settings: &Settings) -> EngineConfig {
        EngineConfig {
            use_remote: settings.use_ai && !self.no_ai,
            model: self.model.clone().unwrap_or_else(|| settings.model.clone()),
            temperature: self.temperature.unwrap_or(settings.temperature),
            max_output_tokens: self.max_tokens.unwrap_or(settings.max_tokens),
            credential: self.api_key.clone(),
            api_base: self.api_base.clone(),
        }
    }
}

fn default_settings_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_FILE)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub default_length: u32,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub use_ai: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_length: 200,
            model: "gpt-3.5-turbo".into(),
            temperature: 0.5,
            max_tokens: 150,
            use_ai: true,
        }
    }
}

impl Settings {
    /// Loads settings merged over defaults, key by key. A missing file is
    /// normal; an unreadable file or a bad value is logged and ignored.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not load settings, using defaults");
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let stored: serde_json::Map<String, Value> = serde_json::from_str(&raw)?;
        let mut settings = Self::default();
        for (key, value) in &stored {
            if let Err(e) = settings.merge(key, value) {
                tracing::warn!(path = %path.display(), error = %e, "ignoring stored setting");
            }
        }
        Ok(settings)
    }

    fn merge(&mut self, key: &str, value: &Value) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "default_length" => {
                self.default_length = value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .filter(|n| *n > 0)
                    .ok_or_else(invalid)?
            }
            "model" => self.model = value.as_str().ok_or_else(invalid)?.to_string(),
            "temperature" => self.temperature = value.as_f64().ok_or_else(invalid)? as f32,
            "max_tokens" => {
                self.max_tokens = value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(invalid)?
            }
            "use_ai" => self.use_ai = value.as_bool().ok_or_else(invalid)?,
            other => tracing::debug!(key = other, "ignoring unknown setting"),
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json + "\n").map_err(io_err)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "default_length" => {
                self.default_length = value.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(invalid)?
            }
            "model" => self.model = value.to_string(),
            "temperature" => self.temperature = value.parse().map_err(|_| invalid())?,
            "max_tokens" => self.max_tokens = value.parse().map_err(|_| invalid())?,
            "use_ai" => self.use_ai = value.parse().map_err(|_| invalid())?,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

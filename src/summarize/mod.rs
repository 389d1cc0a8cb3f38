use crate::errors::{InputError, SummarizeError};
use std::path::Path;

pub trait Summarizer: Send + Sync {
    fn name(&self) -> &'static str;
    fn summarize(&self, text: &str, target_length: usize) -> Result<String, SummarizeError>;
}

mod extractive;
#[cfg(feature = "summarizer-openai")]
mod openai;

pub use extractive::ExtractiveSummarizer;

/// Environment variable consulted when no credential is passed explicitly.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub use_remote: bool,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub credential: Option<String>,
    pub api_base: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveMode {
    Remote,
    Local,
}

/// Produces bounded summaries. The remote strategy, when present, is tried
/// first on every call; the local strategy always backs it.
pub struct Engine {
    remote: Option<Box<dyn Summarizer>>,
    local: ExtractiveSummarizer,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let env_credential = std::env::var(API_KEY_ENV).ok();
        Self::resolve(config, env_credential)
    }

    fn resolve(config: EngineConfig, env_credential: Option<String>) -> Self {
        if !config.use_remote {
            return Self::local_only();
        }
        let credential = config
            .credential
            .clone()
            .filter(|c| !c.trim().is_empty())
            .or_else(|| env_credential.filter(|c| !c.trim().is_empty()));
        let Some(api_key) = credential else {
            tracing::warn!(
                env = API_KEY_ENV,
                "no API key available, using local summarization"
            );
            return Self::local_only();
        };
        match build_remote(&config, api_key) {
            Some(remote) => Self::with_remote(remote),
            None => Self::local_only(),
        }
    }

    fn local_only() -> Self {
        Self {
            remote: None,
            local: ExtractiveSummarizer,
        }
    }

    fn with_remote(remote: Box<dyn Summarizer>) -> Self {
        Self {
            remote: Some(remote),
            local: ExtractiveSummarizer,
        }
    }

    pub fn mode(&self) -> EffectiveMode {
        if self.remote.is_some() {
            EffectiveMode::Remote
        } else {
            EffectiveMode::Local
        }
    }

    pub fn summarize(&self, text: &str, target_length: usize) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        // a file's final newline is not part of its last sentence
        let text = text.trim_end_matches(['\r', '\n']);
        if let Some(remote) = &self.remote {
            match remote.summarize(text, target_length) {
                Ok(summary) => return summary,
                Err(e) => tracing::warn!(
                    backend = remote.name(),
                    error = %e,
                    "remote summarization failed, falling back to local summary"
                ),
            }
        }
        self.local.truncate(text, target_length)
    }

    pub fn summarize_source(&self, path: &Path, target_length: usize) -> Result<String, InputError> {
        let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => InputError::NotFound(path.to_path_buf()),
            _ => InputError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Ok(self.summarize(&text, target_length))
    }
}

#[cfg(feature = "summarizer-openai")]
fn build_remote(config: &EngineConfig, api_key: String) -> Option<Box<dyn Summarizer>> {
    Some(Box::new(openai::OpenAiSummarizer::new(
        config.api_base.clone(),
        api_key,
        config.model.clone(),
        config.temperature,
        config.max_output_tokens,
    )))
}

#[cfg(not(feature = "summarizer-openai"))]
fn build_remote(_config: &EngineConfig, _api_key: String) -> Option<Box<dyn Summarizer>> {
    tracing::warn!("built without remote summarization support, using local summarization");
    None
}

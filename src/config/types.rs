use crate::{Error, Result};
use std::{str::FromStr, time::Duration};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub inference: InferenceConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InferenceConfig {
    pub provider: Provider,
    pub base_url: String,
    pub model: String,
    pub completions_path: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub stop: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: String,
    pub session_storage_path: String,
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogsConfig {
    pub level: String,
}

/// Wire contract spoken by the inference server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Provider {
    /// `POST /generate`, answer in the `response` field.
    #[default]
    Ollama,
    /// `POST /completions`, answer in `choices[0].text`.
    OpenAi,
}

impl Provider {
    pub fn default_completions_path(self) -> &'static str {
        match self {
            Self::Ollama => "/generate",
            Self::OpenAi => "/completions",
        }
    }

    /// Path listing the models the server can run.
    pub fn models_path(self) -> &'static str {
        match self {
            Self::Ollama => "/tags",
            Self::OpenAi => "/models",
        }
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "ollama" => Ok(Self::Ollama),
            "openai" | "open_ai" | "lm_studio" => Ok(Self::OpenAi),
            other => Err(Error::config(format!(
                "Unknown inference provider: '{}'. Valid providers: ollama, openai",
                other
            ))),
        }
    }
}

impl InferenceConfig {
    /// Full URL of the completion endpoint, e.g. `http://localhost:11434/api/generate`.
    pub fn endpoint(&self) -> String {
        let path = self
            .completions_path
            .as_deref()
            .unwrap_or_else(|| self.provider.default_completions_path());
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Full URL of the model listing, e.g. `http://localhost:11434/api/tags`.
    pub fn models_endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.provider.models_path()
        )
    }

    /// Model identifier sent upstream; an unset `MODEL_NAME` falls back to
    /// `mistral`.
    pub fn model_or_default(&self) -> &str {
        if self.model.trim().is_empty() {
            DEFAULT_MODEL
        } else {
            &self.model
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl ServerConfig {
    /// Listening port; an empty `SERVER_PORT` means 3000.
    pub fn listen_port(&self) -> Result<u16> {
        let port = self.port.trim();
        if port.is_empty() {
            return Ok(DEFAULT_PORT);
        }
        port.parse()
            .map_err(|_| Error::config(format!("Invalid SERVER_PORT: '{}'", port)))
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub const DEFAULT_MODEL: &str = "mistral";
pub const DEFAULT_PORT: u16 = 3000;

pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

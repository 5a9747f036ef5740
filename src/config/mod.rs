mod types;

pub use types::*;

use crate::{Error, Result};
use std::{collections::HashMap, env, path::Path, str::FromStr};
use tracing::debug;

/// Loads configuration from the process environment, falling back to values
/// from a dotenv file (`.env`, or `DOTENV_PATH` when set).
pub fn load() -> Result<Config> {
    let env_path = env::var("DOTENV_PATH").unwrap_or_else(|_| ".env".to_string());
    load_from(env_path)
}

pub fn load_from(env_path: impl AsRef<Path>) -> Result<Config> {
    let env_path = env_path.as_ref();
    debug!("Loading dotenv file from: {}", env_path.display());

    let file_vars = read_env_file(env_path)?;

    // Real environment variables win over dotenv values.
    Config::from_lookup(|key| env::var(key).ok().or_else(|| file_vars.get(key).cloned()))
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => {
            debug!("No dotenv file at {}, using environment only", path.display());
            return Ok(HashMap::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item?;
        vars.insert(key, value);
    }
    Ok(vars)
}

impl Config {
    /// Builds a configuration from an arbitrary variable lookup. Absent core
    /// settings become empty strings; optional tuning settings are validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        let get_opt = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let inference = InferenceConfig {
            provider: get("INFERENCE_PROVIDER").parse()?,
            base_url: get("LM_STUDIO_URL"),
            model: get("MODEL_NAME"),
            completions_path: get_opt("COMPLETIONS_PATH"),
            temperature: parse_temperature(get_opt("TEMPERATURE"))?,
            max_tokens: parse_opt("MAX_TOKENS", get_opt("MAX_TOKENS"))?,
            stop: get_opt("STOP_SEQUENCES").map(|raw| split_list(&raw)),
            timeout_secs: parse_opt("INFERENCE_TIMEOUT_SECS", get_opt("INFERENCE_TIMEOUT_SECS"))?,
        };

        let server = ServerConfig {
            host: get_opt("SERVER_HOST").unwrap_or_else(default_host),
            port: get("SERVER_PORT"),
            session_storage_path: get("SESSION_STORAGE_PATH"),
            logs: LogsConfig {
                level: get_opt("LOG_LEVEL").unwrap_or_else(default_log_level),
            },
        };

        Ok(Config { inference, server })
    }
}

fn parse_opt<T: FromStr>(key: &str, raw: Option<String>) -> Result<Option<T>> {
    raw.map(|value| {
        value
            .trim()
            .parse()
            .map_err(|_| Error::config(format!("Invalid value for {}: '{}'", key, value)))
    })
    .transpose()
}

/// serde_json writes non-finite floats as `null`, so they never reach the
/// inference server intact.
fn parse_temperature(raw: Option<String>) -> Result<Option<f64>> {
    match parse_opt::<f64>("TEMPERATURE", raw)? {
        Some(t) if !t.is_finite() => Err(Error::config(format!(
            "Invalid value for TEMPERATURE: '{}' is not a finite number",
            t
        ))),
        other => Ok(other),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

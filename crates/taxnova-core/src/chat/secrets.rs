//! API key and prompt overrides from an env file or the environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::models::config::ChatConfig;

const INITIAL_RESPONSE_VAR: &str = "INITIAL_RESPONSE";
const CHAT_CONTEXT_VAR: &str = "CHAT_CONTEXT";

/// Where the secrets were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    EnvFile(PathBuf),
    Environment,
}

/// Secrets needed to talk to the chat service.
#[derive(Clone)]
pub struct Secrets {
    pub api_key: String,
    /// Overrides `ChatConfig::initial_response`.
    pub initial_response: Option<String>,
    /// Overrides `ChatConfig::system_context`.
    pub chat_context: Option<String>,
    pub source: SecretSource,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("api_key", &"<redacted>")
            .field("initial_response", &self.initial_response)
            .field("chat_context", &self.chat_context)
            .field("source", &self.source)
            .finish()
    }
}

impl Secrets {
    /// Read the configured env file, falling back to the process environment.
    ///
    /// The env file is used only if it exists and defines the API key;
    /// otherwise every value comes from the environment.
    pub fn load(config: &ChatConfig) -> Result<Self, ConfigError> {
        let file_values = read_env_file(&config.env_file)?;
        Self::resolve(config, file_values, |name| std::env::var(name).ok())
    }

    /// Pick the secret source given parsed env-file values and an environment lookup.
    pub fn resolve(
        config: &ChatConfig,
        file_values: Option<HashMap<String, String>>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(values) = file_values {
            if let Some(api_key) = non_empty(values.get(&config.api_key_var).cloned()) {
                debug!("Using secrets from {}", config.env_file.display());
                return Ok(Self {
                    api_key,
                    initial_response: non_empty(values.get(INITIAL_RESPONSE_VAR).cloned()),
                    chat_context: non_empty(values.get(CHAT_CONTEXT_VAR).cloned()),
                    source: SecretSource::EnvFile(config.env_file.clone()),
                });
            }
            warn!(
                "{} does not define {}, falling back to the environment",
                config.env_file.display(),
                config.api_key_var
            );
        }

        let api_key = non_empty(env(&config.api_key_var))
            .ok_or_else(|| ConfigError::MissingApiKey(config.api_key_var.clone()))?;

        debug!("Using secrets from the environment");
        Ok(Self {
            api_key,
            initial_response: non_empty(env(INITIAL_RESPONSE_VAR)),
            chat_context: non_empty(env(CHAT_CONTEXT_VAR)),
            source: SecretSource::Environment,
        })
    }

    /// Greeting to open a session with.
    pub fn initial_response<'a>(&'a self, config: &'a ChatConfig) -> &'a str {
        self.initial_response.as_deref().unwrap_or(&config.initial_response)
    }

    /// System context to prepend to requests.
    pub fn chat_context<'a>(&'a self, config: &'a ChatConfig) -> &'a str {
        self.chat_context.as_deref().unwrap_or(&config.system_context)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn read_env_file(path: &Path) -> Result<Option<HashMap<String, String>>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let to_error = |reason: String| ConfigError::EnvFile {
        path: path.display().to_string(),
        reason,
    };

    let mut values = HashMap::new();
    for item in dotenvy::from_path_iter(path).map_err(|e| to_error(e.to_string()))? {
        let (key, value) = item.map_err(|e| to_error(e.to_string()))?;
        values.insert(key, value);
    }
    Ok(Some(values))
}

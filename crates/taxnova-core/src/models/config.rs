//! Configuration structures for the assistant.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::chat::Theme;
use super::tax::TaxDuePolicy;
use crate::error::{ConfigError, Result};

/// Main configuration for TaxNova.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxnovaConfig {
    /// Chat service configuration.
    pub chat: ChatConfig,

    /// Tax estimation configuration.
    pub tax: TaxConfig,

    /// Simulated filing configuration.
    pub filing: FilingConfig,

    /// Transcript export configuration.
    pub export: ExportConfig,

    /// Reference links shown to the user.
    pub resources: ResourcesConfig,

    /// Presentation settings.
    pub ui: UiConfig,
}

/// Chat-completion service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// OpenAI-compatible chat completions endpoint.
    pub endpoint: String,

    /// Model name sent with every request.
    pub model: String,

    /// Name of the secret holding the API key.
    pub api_key_var: String,

    /// Local env file consulted before the process environment.
    pub env_file: PathBuf,

    /// System message prepended to every request.
    pub system_context: String,

    /// Greeting that opens every session.
    pub initial_response: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama3-8b-8192".to_string(),
            api_key_var: "GROQ_API_KEY".to_string(),
            env_file: PathBuf::from(".env"),
            system_context: "You are a tax assistant helping users navigate tax finalization. \
                             Offer guidance on tax forms, deductions, credits, and filing deadlines."
                .to_string(),
            initial_response: "Hello! I'm here to help with tax finalization.".to_string(),
        }
    }
}

/// Tax estimation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// How tax due is reported when withheld tax exceeds liability.
    pub due_policy: TaxDuePolicy,
}

/// How the simulated filer produces reference identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReferenceMode {
    /// Always return the same identifier.
    Constant { id: String },
    /// Prefix followed by the current UTC time as `YYYYmmddHHMMSS`.
    Timestamp { prefix: String },
}

impl Default for ReferenceMode {
    fn default() -> Self {
        ReferenceMode::Constant {
            id: "ITR123456789".to_string(),
        }
    }
}

/// Simulated filing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilingConfig {
    /// Reference identifier generation.
    pub reference: ReferenceMode,

    /// Status reported on every receipt.
    pub status: String,

    /// Message reported on every receipt.
    pub message: String,
}

impl Default for FilingConfig {
    fn default() -> Self {
        Self {
            reference: ReferenceMode::default(),
            status: "Success".to_string(),
            message: "Your ITR has been successfully filed!".to_string(),
        }
    }
}

/// Transcript export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Fixed output file name; overwritten on every export.
    pub file_name: PathBuf,

    /// Document title embedded in the PDF.
    pub title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: PathBuf::from("Tax_Assistant_Chat.pdf"),
            title: "Tax Assistant Chat".to_string(),
        }
    }
}

/// A titled external link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub title: String,
    pub url: String,
}

impl ResourceLink {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Reference links configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    pub links: Vec<ResourceLink>,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            links: vec![
                ResourceLink::new(
                    "Income Tax e-Filing Portal",
                    "https://www.incometax.gov.in/iec/foportal/",
                ),
                ResourceLink::new("Tax Slabs and Deductions", "https://www.incometaxindia.gov.in/"),
            ],
        }
    }
}

/// Presentation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Theme a new session starts with.
    pub theme: Theme,
}

impl TaxnovaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ConfigError::Invalid(format!("{}: {}", path.display(), e)).into())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

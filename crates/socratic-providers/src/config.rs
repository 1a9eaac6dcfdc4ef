//! Service configuration and provider factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use socratic_core::relay::RelaySettings;
use socratic_core::traits::LlmProvider;

use crate::anthropic::AnthropicProvider;
use crate::mock::MockProvider;

/// Which LLM provider the relay talks to.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Anthropic {
        #[serde(default = "default_api_key")]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    /// Canned replies; no network access.
    Mock {
        /// Reply for every call instead of the built-in demo replies.
        #[serde(default)]
        reply: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Anthropic {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Anthropic")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Mock { reply } => {
                f.debug_struct("Mock").field("reply", reply).finish()
            }
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Anthropic {
            api_key: default_api_key(),
            base_url: None,
        }
    }
}

fn default_api_key() -> String {
    "${ANTHROPIC_API_KEY}".to_string()
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Origins allowed to make cross-origin requests.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5000".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origins: default_cors_origins(),
        }
    }
}

/// Top-level socratic configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocraticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub relay: RelaySettings,
}

impl SocraticConfig {
    /// Problems that would stop the service from working.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if let ProviderConfig::Anthropic { api_key, .. } = &self.provider {
            if api_key.trim().is_empty() {
                problems.push(
                    "anthropic provider has no API key (set ANTHROPIC_API_KEY)".to_string(),
                );
            }
        }
        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            problems.push(format!("invalid bind address: {}", self.server.bind));
        }
        if self.relay.model.trim().is_empty() {
            problems.push("relay model is empty".to_string());
        }
        problems
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    expand_vars(s, |name| std::env::var(name).ok())
}

/// Single left-to-right pass; substituted values are never rescanned.
fn expand_vars(s: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&lookup(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Anthropic { api_key, base_url } => ProviderConfig::Anthropic {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Mock { reply } => ProviderConfig::Mock {
            reply: reply.clone(),
        },
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order when no path is given:
/// 1. `socratic.toml` in the current directory
/// 2. `~/.config/socratic/config.toml`
///
/// `${VAR}` references are expanded first, then the `ANTHROPIC_API_KEY`
/// and `SOCRATIC_BIND` environment overrides are applied verbatim.
pub fn load_config_from(path: Option<&Path>) -> Result<SocraticConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("socratic.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SocraticConfig::default(),
    };

    config.provider = resolve_provider_config(&config.provider);
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    Ok(config)
}

fn apply_env_overrides(config: &mut SocraticConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = lookup("ANTHROPIC_API_KEY") {
        if let ProviderConfig::Anthropic { api_key, .. } = &mut config.provider {
            *api_key = key;
        }
    }
    if let Some(bind) = lookup("SOCRATIC_BIND") {
        config.server.bind = bind;
    }
}

/// Parse a TOML string into a config without touching the environment.
pub fn parse_config_str(content: &str) -> Result<SocraticConfig> {
    Ok(toml::from_str::<SocraticConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("socratic"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>> {
    match config {
        ProviderConfig::Anthropic { api_key, base_url } => {
            Ok(Arc::new(AnthropicProvider::new(api_key, base_url.clone())?))
        }
        ProviderConfig::Mock { reply } => Ok(match reply {
            Some(reply) => Arc::new(MockProvider::with_fixed_response(reply)),
            None => Arc::new(MockProvider::demo()),
        }),
    }
}

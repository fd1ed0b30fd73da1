//! Configuration loading and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use drivequiz_core::traits::{QuestionGenerator, DEFAULT_TEMPERATURE};

use crate::deepseek::DeepSeekProvider;
use crate::openai::{OpenAiProvider, DEFAULT_MODEL};

/// Configuration for a single question-generation provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    DeepSeek {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::DeepSeek {
                api_key: _,
                base_url,
            } => f
                .debug_struct("DeepSeek")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

/// Top-level drivequiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveQuizConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used by `generate` when none is given.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model used by `generate` when none is given.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Question bank file; the bundled bank is used when unset.
    #[serde(default)]
    pub bank_path: Option<PathBuf>,
    /// Where answer history and preferences are kept.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

impl Default for DriveQuizConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: default_temperature(),
            bank_path: None,
            storage_path: None,
        }
    }
}

impl DriveQuizConfig {
    /// The configured storage path, or the per-user default.
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(default_storage_path)
    }
}

/// `~/.local/share/drivequiz/storage.json`, or the working directory without `HOME`.
pub fn default_storage_path() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("drivequiz")
            .join("storage.json"),
        Err(_) => PathBuf::from("drivequiz-storage.json"),
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied verbatim and never scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
        ProviderConfig::DeepSeek { api_key, base_url } => ProviderConfig::DeepSeek {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `drivequiz.toml` in the current directory
/// 2. `~/.config/drivequiz/config.toml`
///
/// Environment variable overrides: `DRIVEQUIZ_OPENAI_KEY`, `DRIVEQUIZ_DEEPSEEK_KEY`.
pub fn load_config() -> Result<DriveQuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<DriveQuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("drivequiz.toml");
        if local.exists() {
            Some(local)
        } else {
            config_dir()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            toml::from_str::<DriveQuizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => DriveQuizConfig::default(),
    };

    // Apply env var overrides
    if let Ok(key) = std::env::var("DRIVEQUIZ_OPENAI_KEY") {
        config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let Some(ProviderConfig::OpenAI { api_key, .. }) = config.providers.get_mut("openai") {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("DRIVEQUIZ_DEEPSEEK_KEY") {
        config
            .providers
            .entry("deepseek".into())
            .or_insert(ProviderConfig::DeepSeek {
                api_key: String::new(),
                base_url: None,
            });
        if let Some(ProviderConfig::DeepSeek { api_key, .. }) =
            config.providers.get_mut("deepseek")
        {
            *api_key = key;
        }
    }

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("drivequiz"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn QuestionGenerator>> {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Ok(Box::new(OpenAiProvider::new(
            api_key,
            base_url.clone(),
            org_id.clone(),
        )?)),
        ProviderConfig::DeepSeek { api_key, base_url } => {
            Ok(Box::new(DeepSeekProvider::new(api_key, base_url.clone())?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_DRIVEQUIZ_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_DRIVEQUIZ_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_DRIVEQUIZ_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars"), "no vars");
        assert_eq!(resolve_env_vars("open ${unterminated"), "open ${unterminated");
        std::env::remove_var("_DRIVEQUIZ_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_expand_values() {
        std::env::set_var("_DRIVEQUIZ_SELF_REF", "${_DRIVEQUIZ_SELF_REF}");
        assert_eq!(
            resolve_env_vars("key=${_DRIVEQUIZ_SELF_REF}!"),
            "key=${_DRIVEQUIZ_SELF_REF}!"
        );
        std::env::remove_var("_DRIVEQUIZ_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = DriveQuizConfig::default();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.default_model, "gpt-3.5-turbo");
        assert_eq!(config.temperature, 0.7);
        assert!(config.bank_path.is_none());
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
default_provider = "deepseek"
default_model = "deepseek-chat"
storage_path = "/tmp/drivequiz.json"

[providers.openai]
type = "openai"
api_key = "sk-openai"

[providers.deepseek]
type = "deepseek"
api_key = "sk-deepseek"
base_url = "https://api.deepseek.com"
"#;
        let config: DriveQuizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert!(matches!(
            config.providers.get("deepseek"),
            Some(ProviderConfig::DeepSeek { .. })
        ));
        assert_eq!(config.default_provider, "deepseek");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.storage_path(), PathBuf::from("/tmp/drivequiz.json"));
    }

    #[test]
    fn debug_masks_api_key() {
        let config = ProviderConfig::DeepSeek {
            api_key: "sk-secret".into(),
            base_url: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drivequiz.toml");
        std::fs::write(
            &path,
            "bank_path = \"bank.json\"\n\n[providers.openai]\ntype = \"openai\"\napi_key = \"k\"\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.bank_path, Some(PathBuf::from("bank.json")));
        assert!(config.providers.contains_key("openai"));

        assert!(load_config_from(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn create_each_provider() {
        let openai = create_provider(&ProviderConfig::OpenAI {
            api_key: "k".into(),
            base_url: None,
            org_id: None,
        })
        .unwrap();
        assert_eq!(openai.name(), "openai");

        let deepseek = create_provider(&ProviderConfig::DeepSeek {
            api_key: "k".into(),
            base_url: None,
        })
        .unwrap();
        assert_eq!(deepseek.name(), "deepseek");
        assert!(!deepseek.available_models().is_empty());
    }
}

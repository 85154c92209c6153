//! Quiz configuration and provider factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use matriq_core::puzzle::Puzzle;
use matriq_core::session::SessionConfig;
use matriq_core::traits::PuzzleProvider;

use crate::gemini::GeminiProvider;
use crate::mock::MockProvider;

/// Configuration for the puzzle backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    /// Local sample puzzles; no network.
    Offline,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
                model,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
            ProviderConfig::Offline => f.debug_struct("Offline").finish(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Offline
    }
}

/// Top-level matriq configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Puzzle backend.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Questions per session.
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    /// Per-question time budget in seconds.
    #[serde(default = "default_time_per_question")]
    pub time_per_question_secs: u32,
    /// Output directory for result artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_question_count() -> usize {
    10
}
fn default_time_per_question() -> u32 {
    30
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./matriq-results")
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            question_count: default_question_count(),
            time_per_question_secs: default_time_per_question(),
            output_dir: default_output_dir(),
        }
    }
}

impl QuizConfig {
    /// Session construction parameters derived from this config.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            question_count: self.question_count,
            time_per_question_secs: self.time_per_question_secs,
            fallback: Puzzle::fallback(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            model: model.as_ref().map(|m| resolve_env_vars(m)),
        },
        ProviderConfig::Offline => ProviderConfig::Offline,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `matriq.toml` in the current directory
/// 2. `~/.config/matriq/config.toml`
///
/// Environment variable override: `MATRIQ_GEMINI_KEY`.
pub fn load_config() -> Result<QuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("matriq.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizConfig::default(),
    };

    // Apply env var override
    if let Ok(key) = std::env::var("MATRIQ_GEMINI_KEY") {
        config.provider = match config.provider {
            ProviderConfig::Gemini {
                base_url, model, ..
            } => ProviderConfig::Gemini {
                api_key: key,
                base_url,
                model,
            },
            ProviderConfig::Offline => ProviderConfig::Gemini {
                api_key: key,
                base_url: None,
                model: None,
            },
        };
    }

    config.provider = resolve_provider_config(&config.provider);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("matriq"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn PuzzleProvider>> {
    match config {
        ProviderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => {
            anyhow::ensure!(
                !api_key.is_empty(),
                "gemini provider requires an api_key (set MATRIQ_GEMINI_KEY or matriq.toml)"
            );
            Ok(Box::new(GeminiProvider::new(
                api_key,
                base_url.clone(),
                model.clone(),
            )))
        }
        ProviderConfig::Offline => Ok(Box::new(MockProvider::default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_MATRIQ_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_MATRIQ_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_MATRIQ_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_MATRIQ_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizConfig::default();
        assert_eq!(config.question_count, 10);
        assert_eq!(config.time_per_question_secs, 30);
        assert!(matches!(config.provider, ProviderConfig::Offline));
    }

    #[test]
    fn parse_gemini_config() {
        let toml_str = r#"
question_count = 5
time_per_question_secs = 20

[provider]
type = "gemini"
api_key = "sk-test"
model = "gemini-2.5-flash"
"#;
        let config: QuizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.question_count, 5);
        assert_eq!(config.time_per_question_secs, 20);
        assert!(matches!(
            config.provider,
            ProviderConfig::Gemini { .. }
        ));
    }

    #[test]
    fn debug_masks_api_key() {
        let config = ProviderConfig::Gemini {
            api_key: "very-secret".into(),
            base_url: None,
            model: None,
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn session_config_mirrors_quiz_config() {
        let config = QuizConfig {
            question_count: 3,
            time_per_question_secs: 12,
            ..QuizConfig::default()
        };
        let session = config.session_config();
        assert_eq!(session.question_count, 3);
        assert_eq!(session.time_per_question_secs, 12);
        session.fallback.validate().unwrap();
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("no-such-config.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn create_gemini_without_key_fails() {
        let config = ProviderConfig::Gemini {
            api_key: String::new(),
            base_url: None,
            model: None,
        };
        assert!(create_provider(&config).is_err());
    }

    #[test]
    fn create_offline_provider() {
        let provider = create_provider(&ProviderConfig::Offline).unwrap();
        assert_eq!(provider.name(), "mock");
    }
}
